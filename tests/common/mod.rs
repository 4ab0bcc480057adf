//! Helpers for driving the `ttmlxalloc` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Path to the sample trace checked in next to the trace module.
pub const SAMPLE_TRACE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/trace/testdata/sample.tt");

/// A `ttmlxalloc` command with logging and colors pinned off.
pub fn ttmlxalloc_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ttmlxalloc"));
    cmd.env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

/// Run `ttmlxalloc` with `args`, feeding `input` on stdin.
pub fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = ttmlxalloc_command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn ttmlxalloc");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .expect("Failed to write to stdin");

    child.wait_with_output().expect("Failed to read output")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

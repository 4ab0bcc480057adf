//! Scan a Homa time trace for mlx page allocations and releases.
//!
//! The Mellanox driver logs a record for every page it allocates or releases
//! when the per-channel page cache over- or underflows. By default this prints
//! statistics about how many pages are handled per batch and what they cost.
//! With `--verbose` it prints the trace itself, with each run of page records
//! collapsed into a single line.
//!
//! # Usage
//!
//! ```bash
//! ttmlxalloc trace.tt
//! ttmlxalloc --verbose trace.tt | less
//! ttmlxalloc < trace.tt
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use mlxalloc_trace::styling::{eprintln, error_message, hint_message};
use mlxalloc_trace::trace::{self, Reducer};

#[derive(Parser)]
#[command(name = "ttmlxalloc")]
#[command(version, about = "Summarize mlx page allocation batches in a time trace")]
#[command(after_help = "Reads standard input when FILE is omitted or `-`.")]
struct Cli {
    /// Print the trace with page alloc/release runs collapsed instead of statistics
    #[arg(long)]
    verbose: bool,

    /// Time trace file
    file: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}", error_message(format!("{e:#}")));
        process::exit(1);
    }
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            log::debug!("Reading time trace from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Error reading {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!(
                    "{}",
                    hint_message("Reading time trace from standard input (Ctrl-D to finish)")
                );
            }
            log::debug!("Reading time trace from stdin");
            Ok(Box::new(stdin.lock()))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input = open_input(cli.file.as_deref())?;
    let mut out = BufWriter::new(io::stdout().lock());
    let mut reducer = Reducer::new();

    for (index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Error reading line {}", index + 1))?;
        let annotations = reducer.process_line(&line)?;
        if cli.verbose {
            for annotation in &annotations {
                writeln!(out, "{}", trace::render_annotation(annotation))?;
            }
        }
    }

    if !cli.verbose {
        let summary = reducer.finish();
        log::debug!(
            "{} alloc batches, {} free batches, {} RPCs",
            summary.alloc_batches.len(),
            summary.free_batches.len(),
            summary.request_count
        );
        write!(out, "{}", trace::render(&trace::analyze(&summary)))?;
    }

    out.flush()?;
    Ok(())
}

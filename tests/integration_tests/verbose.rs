//! `--verbose` output: the trace with page runs collapsed.

use crate::common::{SAMPLE_TRACE, run_with_stdin, stdout, ttmlxalloc_command};

#[test]
fn test_verbose_sample() {
    let output = ttmlxalloc_command()
        .args(["--verbose", SAMPLE_TRACE])
        .output()
        .expect("Failed to run ttmlxalloc");

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "\
Time trace from node1, extracted with ttprint
    0.000 us (+   0.000 us) [C02] homa_xmit_data starting, id 1236, offset 0
    1.140 us (+   1.140 us) [C02] mlx allocated 4 pages (0.5 us)
    1.140 us (+   0.000 us) [C02] mlx sent homa data packet to 0x0a000102, id 1236, offset 0
    1.800 us (+   0.660 us) [C05] homa_gro_receive got packet from 0x0a000102 id 1237, offset 0
    3.100 us (+   1.960 us) [C02] homa_xmit_data starting, id 1238, offset 1400
    4.000 us (+   2.860 us) [C05] mlx freed 2 pages (0.1 us)
    4.000 us (+   0.000 us) [C05] homa_softirq: first packet from 0x0a000102, id 1237
    4.300 us (+   0.300 us) [C02] mlx allocated 2 pages (0.2 us)
    4.300 us (+   0.000 us) [C02] mlx sent homa data packet to 0x0a000102, id 1238, offset 1400
    5.000 us (+   0.700 us) [C05] homa_rpc_free freeing id 1237
"
    );
}

#[test]
fn test_verbose_has_no_report() {
    let output = ttmlxalloc_command()
        .args(["--verbose", SAMPLE_TRACE])
        .output()
        .unwrap();
    let stdout = stdout(&output);

    assert!(!stdout.contains("Total number of RPCs"));
    assert!(!stdout.contains("Page allocations"));
    assert!(!stdout.contains("No page"));
}

#[test]
fn test_verbose_from_stdin() {
    let output = run_with_stdin(
        &["--verbose"],
        "1.0 us [C1] mlx starting page alloc id 5
1.2 us [C1] mlx starting page alloc id 5
1.5 us [C1] other event id 5
",
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "    1.500 us (+   1.500 us) [C1] mlx allocated 2 pages (0.2 us)
    1.500 us (+   0.000 us) [C1] other event id 5
"
    );
}

#[test]
fn test_verbose_drops_unfinished_runs() {
    let output = run_with_stdin(
        &["--verbose"],
        "2.0 us [C3] homa_softirq
2.5 us [C3] mlx starting page release
",
    );

    assert_eq!(
        stdout(&output),
        "    2.000 us (+   2.000 us) [C3] homa_softirq\n"
    );
}

//! End-to-end runs of the report writer

use treecheck::cli::Options;
use treecheck::run_check;

use crate::fixtures::trees;

fn run(
    source: &[(&str, usize)],
    target: &[(&str, usize)],
    verbose: bool,
) -> (treecheck::Report, String) {
    let (src, dst) = trees(source, target);
    let opts = Options {
        verbose,
        ..Options::default()
    };
    let mut buf = Vec::new();
    let report = run_check(src.path(), dst.path(), &opts, &mut buf).unwrap();
    (report, String::from_utf8(buf).unwrap())
}

#[test]
fn report_has_every_section() {
    let (report, text) = run(
        &[("a.txt", 100), ("b.txt", 2000), ("sub/c.txt", 3)],
        &[("a.txt", 50), ("moved/sub/c.txt", 3)],
        false,
    );

    assert_eq!(report.identical, 1);
    assert!(text.contains("1. SCANNING SOURCE DIRECTORY:"));
    assert!(text.contains("2. SCANNING TARGET DIRECTORY:"));
    assert!(text.contains("3. COMPARING FILES:"));
    assert!(text.contains("Found 3 total files to process"));
    assert!(text.contains("  → Found 3 files in 1 subdirectories"));
    assert!(text.contains("CHECKING: a.txt\n  → SIZE_DIFF: a.txt found but no size match"));
    assert!(text.contains(
        "CHECKING: b.txt\n  → MISSING: b.txt not found anywhere in target directory (Size: 2,000 bytes)"
    ));
    assert!(
        text.contains("CHECKING: sub/c.txt\n  → IDENTICAL: c.txt found at target: moved/sub/c.txt")
    );
    assert!(text.contains("  Total files in source directory: 3"));
    assert!(text.contains("  Files missing from target directory: 1"));
    assert!(text.contains("  Files with size differences: 1"));
    assert!(text.contains("  Identical files: 1"));
    assert!(text.contains("  Total files in target directory: 2"));
    assert!(text.contains(" → MISSING: b.txt (Size: 2,000 bytes)"));
    assert!(text.contains(
        " → SIZE_DIFF: a.txt - Source: 100 bytes, Target instances: a.txt(50 bytes)"
    ));
}

#[test]
fn classification_lines_follow_path_order() {
    let (_, text) = run(&[("z", 1), ("a", 1), ("m/b", 1)], &[], false);
    let a = text.find("CHECKING: a\n").unwrap();
    let m = text.find("CHECKING: m/b\n").unwrap();
    let z = text.find("CHECKING: z\n").unwrap();
    assert!(a < m && m < z);
}

#[test]
fn verbose_traces_files_and_directories() {
    let (_, text) = run(&[("sub/a.txt", 1234)], &[("a.txt", 1234)], true);
    assert!(text.contains("  Processing directory: sub/"));
    assert!(text.contains("  Found file: sub/a.txt (1,234 bytes)"));
    assert!(text.contains("  Subdirectories processed:\n    sub/ (1 files)"));
    assert!(!text.contains("total files to process"));
}

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::Options;
use crate::progress::ConsoleObserver;
use crate::reconcile::{reconcile_with, Report};
use crate::report::{rule, write_classification, write_scan_summary, write_summary};
use crate::scanner::{count_files, scan_dir, DirectoryIndex};
use crate::utils::format_count;

fn index_root<W: Write>(out: &mut W, root: &Path, opts: &Options) -> Result<DirectoryIndex> {
    let scan_opts = opts.scan_options();
    writeln!(out, "Scanning directory: {}", root.display())?;

    let scanned = if opts.verbose {
        let mut observer = ConsoleObserver::verbose(out);
        let index = scan_dir(root, &scan_opts, &mut observer);
        observer.finish();
        index
    } else {
        let total = count_files(root, &scan_opts);
        writeln!(out, "Found {} total files to process", format_count(total))?;
        let mut observer = ConsoleObserver::with_bar(out, total);
        let index = scan_dir(root, &scan_opts, &mut observer);
        observer.finish();
        index
    };
    let index = scanned.with_context(|| format!("Failed to index {}", root.display()))?;

    write_scan_summary(out, &index, opts.verbose)?;
    Ok(index)
}

/// Indexes both roots, classifies every source file and writes the report.
///
/// Both roots must already have passed [`crate::cli::validate_roots`].
pub fn run_check<W: Write>(
    source_root: &Path,
    target_root: &Path,
    opts: &Options,
    out: &mut W,
) -> Result<Report> {
    writeln!(out, "\nComparing files between:")?;
    writeln!(out, "Source: {}", source_root.display())?;
    writeln!(out, "Target: {}", target_root.display())?;
    writeln!(out, "{}", rule('='))?;

    writeln!(out, "\n1. SCANNING SOURCE DIRECTORY:")?;
    let source = index_root(out, source_root, opts)?;
    writeln!(out, "{}", rule('-'))?;

    writeln!(out, "\n2. SCANNING TARGET DIRECTORY:")?;
    let target = index_root(out, target_root, opts)?;
    writeln!(out, "{}", rule('='))?;

    writeln!(out, "\n3. COMPARING FILES:")?;
    let report = reconcile_with(&source, &target, |record, outcome| {
        write_classification(out, record, outcome)
    })
    .context("Failed to write comparison output")?;

    write_summary(out, &report)?;
    out.flush()?;
    Ok(report)
}

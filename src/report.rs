use std::io::{self, Write};

use crate::reconcile::{Outcome, Report};
use crate::scanner::{DirectoryIndex, FileRecord};
use crate::utils::{basename, format_count};

pub const RULE_WIDTH: usize = 80;

pub fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

fn bytes(n: u64) -> String {
    format!("{} bytes", format_count(n))
}

fn instances(candidates: &[FileRecord]) -> String {
    candidates
        .iter()
        .map(|c| format!("{}({})", c.relative_path, bytes(c.size)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `→ ...` line describing how one source file was classified.
pub fn outcome_line(source: &FileRecord, outcome: &Outcome) -> String {
    let name = basename(&source.relative_path);
    match outcome {
        Outcome::Missing => format!(
            "  → MISSING: {name} not found anywhere in target directory (Size: {})",
            bytes(source.size)
        ),
        Outcome::SizeMatch(matches) if matches.len() == 1 => format!(
            "  → IDENTICAL: {name} found at target: {} (Size: {})",
            matches[0].relative_path,
            bytes(source.size)
        ),
        Outcome::SizeMatch(matches) => format!(
            "  → IDENTICAL: {name} found at multiple target locations with matching size: {} (Size: {})",
            matches
                .iter()
                .map(|m| m.relative_path.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            bytes(source.size)
        ),
        Outcome::SizeMismatch(candidates) => format!(
            "  → SIZE_DIFF: {name} found but no size match - Source: {}, Target instances: {}",
            bytes(source.size),
            instances(candidates)
        ),
    }
}

pub fn write_classification<W: Write>(
    out: &mut W,
    source: &FileRecord,
    outcome: &Outcome,
) -> io::Result<()> {
    writeln!(out, "CHECKING: {}", source.relative_path)?;
    writeln!(out, "{}", outcome_line(source, outcome))
}

/// Post-scan summary; the per-subdirectory listing is only written when `verbose`.
pub fn write_scan_summary<W: Write>(
    out: &mut W,
    index: &DirectoryIndex,
    verbose: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "  → Found {} files in {} subdirectories",
        format_count(index.len() as u64),
        format_count(index.subdirectory_count() as u64)
    )?;
    if !index.skipped.is_empty() {
        writeln!(
            out,
            "  → Skipped {} unreadable entries under {}",
            format_count(index.skipped.len() as u64),
            index.root.display()
        )?;
    }

    if verbose && index.subdirectory_count() > 0 {
        writeln!(out, "  Subdirectories processed:")?;
        for dir in index.sorted_dirs() {
            writeln!(out, "    {dir}/ ({} files)", index.files_under(dir))?;
        }
    }
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "SUMMARY:")?;
    writeln!(
        out,
        "  Total files in source directory: {}",
        format_count(report.total_source as u64)
    )?;
    writeln!(
        out,
        "  Files missing from target directory: {}",
        format_count(report.missing_count() as u64)
    )?;
    writeln!(
        out,
        "  Files with size differences: {}",
        format_count(report.mismatch_count() as u64)
    )?;
    writeln!(out, "  Identical files: {}", format_count(report.identical as u64))?;
    writeln!(
        out,
        "  Total files in target directory: {}",
        format_count(report.total_target as u64)
    )?;

    if report.is_clean() {
        writeln!(out)?;
        writeln!(out, "All source files are present in the target directory.")?;
        return Ok(());
    }

    if !report.missing.is_empty() {
        writeln!(out)?;
        writeln!(out, "Missing files details:")?;
        for missing in &report.missing {
            writeln!(
                out,
                " → MISSING: {} (Size: {})",
                missing.relative_path,
                bytes(missing.size)
            )?;
        }
    }

    if !report.mismatched.is_empty() {
        writeln!(out)?;
        writeln!(out, "Size mismatch files details:")?;
        for m in &report.mismatched {
            writeln!(
                out,
                " → SIZE_DIFF: {} - Source: {}, Target instances: {}",
                m.source.relative_path,
                bytes(m.source.size),
                instances(&m.candidates)
            )?;
        }
    }
    Ok(())
}

use std::collections::HashMap;
use std::convert::Infallible;

use log::info;

use crate::scanner::{DirectoryIndex, FileRecord};
use crate::utils::basename;

/// Target files grouped by basename.
///
/// Each candidate list is sorted by relative path so that reports are stable
/// across runs.
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<FileRecord>>,
}

impl NameIndex {
    pub fn build(index: &DirectoryIndex) -> Self {
        let mut by_name: HashMap<String, Vec<FileRecord>> = HashMap::new();
        for record in index.sorted_records() {
            by_name
                .entry(basename(&record.relative_path).to_string())
                .or_default()
                .push(record);
        }
        Self { by_name }
    }

    pub fn candidates(&self, name: &str) -> Option<&[FileRecord]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    /// Classifies one source file against the indexed target.
    pub fn classify(&self, source: &FileRecord) -> Outcome {
        let Some(candidates) = self.candidates(basename(&source.relative_path)) else {
            return Outcome::Missing;
        };

        let matches: Vec<FileRecord> = candidates
            .iter()
            .filter(|c| c.size == source.size)
            .cloned()
            .collect();

        if matches.is_empty() {
            Outcome::SizeMismatch(candidates.to_vec())
        } else {
            Outcome::SizeMatch(matches)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No target file shares the basename.
    Missing,
    /// Every target file with the same basename and exactly the same size.
    SizeMatch(Vec<FileRecord>),
    /// All target files sharing the basename; none has the same size.
    SizeMismatch(Vec<FileRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub source: FileRecord,
    pub candidates: Vec<FileRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub total_source: usize,
    pub total_target: usize,
    pub identical: usize,
    pub missing: Vec<FileRecord>,
    pub mismatched: Vec<Mismatch>,
}

impl Report {
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatched.len()
    }

    /// True when every source file was found with a matching size.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

pub fn reconcile(source: &DirectoryIndex, target: &DirectoryIndex) -> Report {
    match reconcile_with(source, target, |_, _| Ok::<(), Infallible>(())) {
        Ok(report) => report,
        Err(never) => match never {},
    }
}

/// Classifies every source file, in path order, calling `trace` once per file.
///
/// Only the trace hook can fail; the classification itself always succeeds.
pub fn reconcile_with<F, E>(
    source: &DirectoryIndex,
    target: &DirectoryIndex,
    mut trace: F,
) -> Result<Report, E>
where
    F: FnMut(&FileRecord, &Outcome) -> Result<(), E>,
{
    let names = NameIndex::build(target);
    let mut report = Report {
        total_source: source.len(),
        total_target: target.len(),
        ..Report::default()
    };

    for record in source.sorted_records() {
        let outcome = names.classify(&record);
        trace(&record, &outcome)?;

        match outcome {
            Outcome::Missing => report.missing.push(record),
            Outcome::SizeMatch(_) => report.identical += 1,
            Outcome::SizeMismatch(candidates) => report.mismatched.push(Mismatch {
                source: record,
                candidates,
            }),
        }
    }

    debug_assert_eq!(
        report.identical + report.missing_count() + report.mismatch_count(),
        report.total_source
    );
    info!(
        "compared {} source files: {} identical, {} missing, {} size mismatches",
        report.total_source,
        report.identical,
        report.missing_count(),
        report.mismatch_count()
    );

    Ok(report)
}

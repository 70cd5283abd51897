use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::utils::rel_path_string;

/// One regular file found under a scanned root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileRecord {
    /// Path relative to the scanned root, `/`-separated.
    pub relative_path: String,
    pub size: u64,
}

impl FileRecord {
    pub fn new(relative_path: impl Into<String>, size: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size,
        }
    }
}

/// An entry the indexer could not read and left out of the index.
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// What to do when an entry below the root cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Record the entry as skipped and keep scanning.
    #[default]
    Skip,
    /// Abort the scan on the first unreadable entry.
    FailFast,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub ignore_patterns: Vec<Pattern>,
    pub error_policy: ErrorPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The root itself could not be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// An entry below the root could not be read under [`ErrorPolicy::FailFast`].
    #[error("cannot access {}: {reason}", path.display())]
    Access { path: PathBuf, reason: String },

    /// Writing progress output failed.
    #[error("failed to write scan output: {0}")]
    Output(#[from] io::Error),
}

/// Receives progress events while a tree is indexed.
///
/// Events are observational only; nothing an observer does changes the
/// resulting [`DirectoryIndex`].
pub trait ScanObserver {
    fn on_dir(&mut self, _rel: &str) -> io::Result<()> {
        Ok(())
    }

    fn on_file(&mut self, _record: &FileRecord) -> io::Result<()> {
        Ok(())
    }

    fn on_skipped(&mut self, _entry: &SkippedEntry) -> io::Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Relative path -> size for every regular file under one root.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    pub root: PathBuf,
    pub files: HashMap<String, u64>,
    pub dirs: HashSet<String>,
    pub skipped: Vec<SkippedEntry>,
}

impl DirectoryIndex {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[cfg(test)]
    pub fn size_of(&self, rel: &str) -> Option<u64> {
        self.files.get(rel).copied()
    }

    /// All records, sorted lexicographically by relative path.
    pub fn sorted_records(&self) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = self
            .files
            .iter()
            .map(|(rel, size)| FileRecord::new(rel.as_str(), *size))
            .collect();
        records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        records
    }

    pub fn subdirectory_count(&self) -> usize {
        self.dirs.len()
    }

    /// Subdirectories sorted by path.
    pub fn sorted_dirs(&self) -> Vec<&str> {
        let mut dirs: Vec<&str> = self.dirs.iter().map(String::as_str).collect();
        dirs.sort_unstable();
        dirs
    }

    /// Number of files anywhere below `dir`.
    pub fn files_under(&self, dir: &str) -> usize {
        let prefix = format!("{dir}/");
        self.files.keys().filter(|rel| rel.starts_with(&prefix)).count()
    }
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    let s_rel = rel_path_string(rel);
    patterns
        .iter()
        .any(|pat| pat.matches(&s_rel) || pat.matches(name))
}

fn walker<'a>(
    root: &'a Path,
    patterns: &'a [Pattern],
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| match e.path().strip_prefix(root) {
            Ok(rel) if e.depth() > 0 => !is_ignored(rel, patterns),
            _ => true,
        })
}

/// Counts the regular files under `root`, ignoring unreadable entries.
///
/// Only used to size progress output before the real scan.
pub fn count_files(root: &Path, opts: &ScanOptions) -> u64 {
    walker(root, &opts.ignore_patterns)
        .filter_map(Result::ok)
        .filter(|e| e.depth() > 0 && e.file_type().is_file())
        .count() as u64
}

/// Recursively indexes every regular file under `root`.
///
/// Symlinks are not followed and are not indexed, nor are sockets, devices
/// or other special files. Entries that cannot be read are handled according
/// to `opts.error_policy`; a failure to list `root` itself is always fatal.
pub fn scan_dir(
    root: &Path,
    opts: &ScanOptions,
    observer: &mut dyn ScanObserver,
) -> Result<DirectoryIndex, ScanError> {
    info!("indexing {}", root.display());

    let mut files = HashMap::new();
    let mut dirs = HashSet::new();
    let mut skipped = Vec::new();

    for entry in walker(root, &opts.ignore_patterns) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(ScanError::Root {
                        path: root.to_path_buf(),
                        source: err,
                    });
                }
                let skip = SkippedEntry {
                    path: err.path().unwrap_or(root).to_path_buf(),
                    reason: err.to_string(),
                };
                handle_unreadable(skip, opts.error_policy, observer, &mut skipped)?;
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = rel_path_string(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            observer.on_dir(&rel)?;
            dirs.insert(rel);
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(meta) => {
                    let record = FileRecord::new(rel, meta.len());
                    observer.on_file(&record)?;
                    files.insert(record.relative_path, record.size);
                }
                Err(err) => {
                    let skip = SkippedEntry {
                        path: entry.path().to_path_buf(),
                        reason: err.to_string(),
                    };
                    handle_unreadable(skip, opts.error_policy, observer, &mut skipped)?;
                }
            }
        }
    }

    info!(
        "indexed {} files in {} subdirectories under {} ({} skipped)",
        files.len(),
        dirs.len(),
        root.display(),
        skipped.len()
    );

    Ok(DirectoryIndex {
        root: root.to_path_buf(),
        files,
        dirs,
        skipped,
    })
}

fn handle_unreadable(
    skip: SkippedEntry,
    policy: ErrorPolicy,
    observer: &mut dyn ScanObserver,
    skipped: &mut Vec<SkippedEntry>,
) -> Result<(), ScanError> {
    match policy {
        ErrorPolicy::Skip => {
            debug!("skipping {}: {}", skip.path.display(), skip.reason);
            observer.on_skipped(&skip)?;
            skipped.push(skip);
            Ok(())
        }
        ErrorPolicy::FailFast => Err(ScanError::Access {
            path: skip.path,
            reason: skip.reason,
        }),
    }
}

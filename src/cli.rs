use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use glob::Pattern;

use crate::scanner::{ErrorPolicy, ScanOptions};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Check that every file in a source tree exists in a target tree (matched by name and size)",
    long_about = None
)]
pub struct Args {
    /// Source directory (the tree expected to be fully backed up)
    pub source_dir: PathBuf,

    /// Target directory (the backup or migration destination)
    pub target_dir: PathBuf,

    /// Print every file and directory while scanning instead of a progress bar
    #[arg(short, long)]
    pub verbose: bool,

    /// Glob patterns to ignore (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Abort on the first unreadable entry instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub verbose: bool,
    pub ignore_patterns: Vec<Pattern>,
    pub error_policy: ErrorPolicy,
}

impl Options {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            ignore_patterns: self.ignore_patterns.clone(),
            error_policy: self.error_policy,
        }
    }
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .ignore
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid glob pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Options {
        verbose: args.verbose,
        ignore_patterns: patterns,
        error_policy: if args.strict {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::Skip
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{role} path '{}' does not exist", path.display())]
    NotFound { role: Role, path: PathBuf },

    #[error("{role} path '{}' is not a directory", path.display())]
    NotADirectory { role: Role, path: PathBuf },
}

/// Checks both roots before any scanning: existence first, then that each
/// one is a directory.
pub fn validate_roots(source: &Path, target: &Path) -> Result<(), ConfigError> {
    let roots = [(Role::Source, source), (Role::Target, target)];

    for (role, path) in roots {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                role,
                path: path.to_path_buf(),
            });
        }
    }
    for (role, path) in roots {
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                role,
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

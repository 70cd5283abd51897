//
// lib.rs
// treecheck
//
// Library entry that re-exports modules so the binary and the integration tests can reach the indexer, the reconciler and the report renderer.
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod check;
pub mod cli;
pub mod progress;
pub mod reconcile;
pub mod report;
pub mod scanner;
pub mod utils;

pub use check::run_check;
pub use cli::{build_options, validate_roots, Args, ConfigError, Options};
pub use reconcile::{reconcile, reconcile_with, Mismatch, NameIndex, Outcome, Report};
pub use scanner::{
    count_files, scan_dir, DirectoryIndex, ErrorPolicy, FileRecord, NoopObserver, ScanError,
    ScanObserver, ScanOptions,
};

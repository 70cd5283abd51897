use std::io;
use std::process::{self, ExitCode};

use anyhow::Result;
use clap::Parser;
use log::warn;

use treecheck::{build_options, run_check, validate_roots, Args};

fn run(args: &Args) -> Result<()> {
    let opts = build_options(args)?;
    validate_roots(&args.source_dir, &args.target_dir)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_check(&args.source_dir, &args.target_dir, &opts, &mut out)?;
    Ok(())
}

fn main() -> ExitCode {
    // RUST_LOG=debug shows skipped entries and per-root totals.
    env_logger::init();

    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("\nOperation cancelled by user.");
        process::exit(1);
    }) {
        warn!("could not install interrupt handler: {err}");
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too.
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Missing or mismatched files are findings, not failures.
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

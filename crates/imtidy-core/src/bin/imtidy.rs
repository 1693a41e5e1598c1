//! imtidy CLI
//!
//! Reformat a `.bib` file and flag duplicate entries: entries that normalize
//! cleanly land in `validBib.bib`, everything needing a human lands in
//! `invalidBib.bib`, both in the working directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use imtidy_core::tidy_file;

const VALID_OUTPUT: &str = "validBib.bib";
const INVALID_OUTPUT: &str = "invalidBib.bib";

#[derive(Parser)]
#[command(name = "imtidy", about = "Normalize a .bib file and flag duplicates")]
struct Cli {
    /// Input .bib file
    input: PathBuf,
}

fn main() -> ExitCode {
    // Default to info-level diagnostics; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match tidy_file(
        &cli.input,
        Path::new(VALID_OUTPUT),
        Path::new(INVALID_OUTPUT),
    ) {
        Ok(summary) => {
            println!(
                "{} valid -> {VALID_OUTPUT}, {} invalid -> {INVALID_OUTPUT}, {} duplicates dropped",
                summary.valid, summary.invalid, summary.duplicates
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("imtidy: {err}");
            ExitCode::FAILURE
        }
    }
}

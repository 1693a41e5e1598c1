//! Error types for the tidy run
//!
//! Data-quality problems are never errors here; they travel as flags on the
//! formatted entries. The only fatal conditions are the input file being
//! unreadable and the output files being unwritable.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

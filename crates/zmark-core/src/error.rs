use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conversion failures. Any of these aborts the whole conversion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to allocate memory for the output html buffer: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("Unable to read input markdown file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write output html file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

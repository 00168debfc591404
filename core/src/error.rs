use std::path::PathBuf;
use thiserror::Error;

/// Failure to read an input file. Rows appended before the failure stay in the store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed in {} after {lines} lines: {source}", .path.display())]
    Read {
        path: PathBuf,
        lines: usize,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// The requested result size was zero.
    #[error("n must be greater than zero")]
    InvalidN,

    #[error("no score records loaded")]
    EmptyData,
}

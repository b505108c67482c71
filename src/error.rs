use go_syntax::error::ParseFailure;
use std::path::PathBuf;
use thiserror::Error;

/// Error kinds of the tool.
///
/// `Load` and `Analysis` are fatal and occur before any file is touched.
/// `Write` is never fatal: the drivers log it and continue with the next
/// file. Recoverable per-switch conditions (rejected views, unmatched
/// incoming types) are plain skips and never reach this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("analysis: {0}")]
    Analysis(String),

    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a source file failed to load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

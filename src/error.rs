use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by content resolution.
///
/// `NotFound` is the only recoverable kind inside the resolver: the fallback
/// search converts per-probe misses into the next attempt and emits it only
/// once every candidate form has been exhausted. Everything else aborts the
/// resolution immediately so that a corrupt archive or a broken decompiler
/// never masquerades as a plain miss.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not find {0}")]
    NotFound(String),

    #[error("invalid locator: {0:?}")]
    InvalidLocator(String),

    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("decompilation failed: {0}")]
    Decompile(String),

    #[error("translation failed: {0}")]
    Translate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

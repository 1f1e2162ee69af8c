use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the bridge engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested file does not exist after normalization.
    #[error("File does not exist: {}", .0.display())]
    FileMissing(PathBuf),

    /// Neither the editor executable nor the default handler could open the file.
    #[error("{0}")]
    Launch(String),

    /// Writing the combined message to its temp file failed.
    #[error("Failed to write message to {}: {source}", path.display())]
    Persist {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The system clipboard rejected the text.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// No window matched the target application signature.
    #[error("No window with '{0}' in title found")]
    WindowNotFound(String),
}

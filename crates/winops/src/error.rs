use thiserror::Error;

use crate::WindowId;

/// Errors that can occur during window operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A Win32 call reported failure.
    #[error("{call} failed: {detail}")]
    Os {
        /// Name of the failing API.
        call: &'static str,
        /// Text of the last OS error.
        detail: String,
    },

    /// The window handle no longer refers to a live window.
    #[error("window {0:#x} is gone")]
    WindowGone(WindowId),

    /// Window operations are not available on this host.
    #[error("window operations unsupported on this platform")]
    Unsupported,
}

/// Result alias for window operations.
pub type Result<T> = std::result::Result<T, Error>;

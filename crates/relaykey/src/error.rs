//! Error types and result alias for the relaykey crate.
use std::result::Result as StdResult;

use thiserror::Error;

/// Crate-local `Result` alias using the relay error type.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while synthesizing or posting events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The key has no virtual-key mapping on this platform.
    #[error("No virtual key for {0}")]
    Unmapped(String),
    /// The host refused the synthetic input.
    #[error("Failed to post key event: {0}")]
    Post(String),
    /// Synthetic keyboard input is not available on this host.
    #[error("Key posting unsupported on this platform")]
    Unsupported,
}

use std::{io::Error as IoError, path::PathBuf, result::Result as StdResult};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors from binding and running the HTTP server.
#[derive(Error, Debug)]
pub enum Error {
    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested `host:port`.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: IoError,
    },

    /// IO-related errors while serving.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;

/// A request that ended without a success response.
///
/// Each variant maps to one fixed JSON error body.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body was not a JSON object.
    #[error("Invalid JSON")]
    InvalidJson,

    /// No usable file path key in the body.
    #[error("Missing 'filePath'")]
    MissingFilePath,

    /// The normalized file path does not exist.
    #[error("File does not exist")]
    FileMissing(PathBuf),

    /// Editor and default handler both failed.
    #[error("Failed to open file")]
    Launch(String),

    /// The message could not be written to its temp file.
    #[error("Failed to write message to temp")]
    Persist(String),

    /// Anything else, e.g. a panicked worker.
    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingFilePath | Self::FileMissing(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Launch(_) | Self::Persist(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<bridge_engine::Error> for ApiError {
    fn from(err: bridge_engine::Error) -> Self {
        match err {
            bridge_engine::Error::FileMissing(path) => Self::FileMissing(path),
            bridge_engine::Error::Launch(detail) => Self::Launch(detail),
            bridge_engine::Error::Persist { source, .. } => Self::Persist(source.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let body = match self {
            Self::InvalidJson | Self::MissingFilePath => json!({ "error": error }),
            Self::FileMissing(path) => json!({
                "error": error,
                "filePath": path.to_string_lossy(),
            }),
            Self::Launch(detail) | Self::Persist(detail) | Self::Internal(detail) => {
                json!({ "error": error, "detail": detail })
            }
        };
        (status, Json(body)).into_response()
    }
}

//! HTTP front end for the editor bridge.
//!
//! Two routes, both `POST` with a JSON object body:
//! - `/open-file`: open a file (and workspace) in the editor and focus it.
//! - `/open`: additionally deliver a comment and code snippet to the
//!   editor's chat panel, optionally submitting it.
//!
//! Handlers validate input on the async side, then run the blocking
//! [`bridge_engine::Bridge`] flow on tokio's blocking pool. Automation
//! failures never fail a request; they are reported in the response's
//! `warnings` array.
#![warn(missing_docs)]

mod error;
mod payload;
mod routes;
mod server;

pub use error::{ApiError, Error, Result};
pub use payload::{OpenPayload, snippet_preview};
pub use routes::{OpenFileResponse, OpenResponse, router};
pub use server::{BoundServer, DEFAULT_HOST, DEFAULT_PORT, Server};

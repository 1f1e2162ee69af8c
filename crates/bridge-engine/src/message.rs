//! The chat message: combining comment and snippet, and persisting it.

use std::{fs, path::Path};

use tracing::info;

use crate::{Error, Result};

/// Line separating the comment from the code snippet.
pub const SNIPPET_SEPARATOR: &str = "--- CODE SNIPPET ---";

/// Combine an optional comment and an optional code snippet.
///
/// Parts are joined with a newline: the comment when non-empty, then the
/// separator block and the snippet when the snippet has non-whitespace
/// content. Both empty yields an empty string.
pub fn combine_message(comment: Option<&str>, snippet: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let Some(c) = comment.filter(|c| !c.is_empty()) {
        parts.push(c.to_string());
    }
    if let Some(s) = snippet.filter(|s| !s.trim().is_empty()) {
        parts.push(format!("\n{SNIPPET_SEPARATOR}\n"));
        parts.push(s.to_string());
    }
    parts.join("\n")
}

/// Overwrite `path` with `message` (UTF-8).
pub fn save_message(path: &Path, message: &str) -> Result<()> {
    fs::write(path, message).map_err(|source| Error::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved message to: {}", path.display());
    Ok(())
}

//! Request body decoding.
//!
//! Bodies are parsed as JSON regardless of `Content-Type`. Each field may
//! arrive under several aliases; the first non-empty string wins and
//! non-string values count as absent.

use serde_json::{Map, Value};
use tracing::info;

use crate::error::ApiError;

const FILE_KEYS: &[&str] = &["filePath", "file_path"];
const WORKSPACE_KEYS: &[&str] = &["workspacePath", "workspace_path", "repoPath", "repo_path"];
const COMMENT_KEYS: &[&str] = &["comment"];
const SNIPPET_KEYS: &[&str] = &["codeSnippet", "code_snippet"];
const AUTO_SUBMIT_KEYS: &[&str] = &["autoSubmit", "auto_submit"];

/// Characters of the snippet shown in request logs.
const SNIPPET_PREVIEW_CHARS: usize = 100;

/// Decoded request fields, before any path validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenPayload {
    /// Raw file path.
    pub file_path: Option<String>,
    /// Raw workspace path.
    pub workspace_path: Option<String>,
    /// Comment text.
    pub comment: Option<String>,
    /// Code snippet text.
    pub code_snippet: Option<String>,
    /// Submit after pasting.
    pub auto_submit: bool,
}

impl OpenPayload {
    /// Decode a request body; anything but a JSON object is rejected.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
        let Value::Object(map) = value else {
            return Err(ApiError::InvalidJson);
        };
        Ok(Self {
            file_path: first_str(&map, FILE_KEYS),
            workspace_path: first_str(&map, WORKSPACE_KEYS),
            comment: first_str(&map, COMMENT_KEYS),
            code_snippet: first_str(&map, SNIPPET_KEYS),
            auto_submit: AUTO_SUBMIT_KEYS
                .iter()
                .any(|k| map.get(*k) == Some(&Value::Bool(true))),
        })
    }

    /// Log every field, with the snippet shortened.
    pub fn log(&self, route: &str) {
        info!("Received POST {} request", route);
        info!("workspacePath: {:?}", self.workspace_path);
        info!("filePath: {:?}", self.file_path);
        info!("comment: {:?}", self.comment);
        info!(
            "codeSnippet: {:?}",
            self.code_snippet.as_deref().map(snippet_preview)
        );
        info!("autoSubmit: {}", self.auto_submit);
    }
}

fn first_str(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First 100 characters of `snippet`, with `...` appended when cut.
pub fn snippet_preview(snippet: &str) -> String {
    let mut chars = snippet.chars();
    let head: String = chars.by_ref().take(SNIPPET_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<OpenPayload, ApiError> {
        OpenPayload::parse(s.as_bytes())
    }

    #[test]
    fn camel_and_snake_aliases() {
        let p = parse(r#"{"file_path": "/a.rs", "repoPath": "/repo", "code_snippet": "x"}"#).unwrap();
        assert_eq!(p.file_path.as_deref(), Some("/a.rs"));
        assert_eq!(p.workspace_path.as_deref(), Some("/repo"));
        assert_eq!(p.code_snippet.as_deref(), Some("x"));
        assert!(!p.auto_submit);
    }

    #[test]
    fn first_non_empty_wins() {
        let p = parse(r#"{"filePath": "", "file_path": "/b.rs", "workspacePath": "", "workspace_path": "/ws", "repoPath": "/repo"}"#)
            .unwrap();
        assert_eq!(p.file_path.as_deref(), Some("/b.rs"));
        assert_eq!(p.workspace_path.as_deref(), Some("/ws"));
    }

    #[test]
    fn non_strings_are_absent() {
        let p = parse(r#"{"filePath": 12, "comment": null, "codeSnippet": ["x"]}"#).unwrap();
        assert_eq!(p, OpenPayload::default());
    }

    #[test]
    fn auto_submit_needs_json_true() {
        assert!(parse(r#"{"autoSubmit": true}"#).unwrap().auto_submit);
        assert!(parse(r#"{"autoSubmit": false, "auto_submit": true}"#).unwrap().auto_submit);
        assert!(!parse(r#"{"autoSubmit": "true"}"#).unwrap().auto_submit);
        assert!(!parse(r#"{"autoSubmit": 1}"#).unwrap().auto_submit);
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(parse("not json"), Err(ApiError::InvalidJson)));
        assert!(matches!(parse("[1, 2]"), Err(ApiError::InvalidJson)));
        assert!(matches!(parse("\"x\""), Err(ApiError::InvalidJson)));
        assert!(matches!(parse(""), Err(ApiError::InvalidJson)));
    }

    #[test]
    fn preview_truncates_long_snippets() {
        assert_eq!(snippet_preview("short"), "short");
        let exact = "a".repeat(100);
        assert_eq!(snippet_preview(&exact), exact);
        let long = "é".repeat(150);
        let p = snippet_preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 103);
    }
}

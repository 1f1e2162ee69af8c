use std::{
    env,
    path::{Component, Path, PathBuf},
};

use crate::{Error, Result};

/// A validated request to open a file and, for the paste flow, deliver a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenRequest {
    /// Absolute, normalized path of an existing file.
    pub file_path: PathBuf,
    /// Workspace path as supplied by the caller.
    pub workspace_path: Option<PathBuf>,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Code snippet appended below the comment.
    pub code_snippet: Option<String>,
    /// Press Enter after pasting.
    pub auto_submit: bool,
}

impl OpenRequest {
    /// Lower-cased final path component of the file, if any.
    pub fn basename(&self) -> Option<String> {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
    }
}

/// Expand `~`, absolutize against the current directory, normalize `.` and
/// `..`, and require that the result exists.
pub fn resolve_file_path(raw: &str) -> Result<PathBuf> {
    let path = absolutize(&expand_home(raw));
    if path.exists() {
        Ok(path)
    } else {
        Err(Error::FileMissing(path))
    }
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\"))
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

/// Join relative paths onto the current directory and normalize lexically.
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

//! Opening a file (and optionally its workspace) in the editor.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{Error, Result, deps::Launcher};

/// How the file ended up being opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Human-readable detail for logs: the workspace used, empty, or the
    /// default-handler note.
    pub detail: String,
    /// Workspace path passed to the editor, if any.
    pub workspace: Option<PathBuf>,
    /// True when the editor executable failed and the OS default handler was used.
    pub via_default_handler: bool,
}

impl LaunchOutcome {
    /// Whether the editor was started with a workspace argument.
    pub fn opened_workspace(&self) -> bool {
        self.workspace.is_some()
    }
}

/// Start the editor on `file`, preceded by `workspace` when that path
/// exists. Falls back to the OS default handler for `file` alone.
pub fn launch(
    launcher: &dyn Launcher,
    executable: &str,
    workspace: Option<&Path>,
    file: &Path,
) -> Result<LaunchOutcome> {
    let workspace = workspace.filter(|w| w.exists());
    let mut args: Vec<&Path> = Vec::with_capacity(2);
    if let Some(ws) = workspace {
        args.push(ws);
    }
    args.push(file);

    match launcher.spawn(executable, &args) {
        Ok(()) => {
            let detail = match workspace {
                Some(ws) => format!("workspace: {}", ws.display()),
                None => String::new(),
            };
            info!("Launched {} for {} {}", executable, file.display(), detail);
            Ok(LaunchOutcome {
                detail,
                workspace: workspace.map(Path::to_path_buf),
                via_default_handler: false,
            })
        }
        Err(e) => {
            warn!("Failed to launch {}: {}; trying default handler", executable, e);
            match launcher.open_default(file) {
                Ok(()) => Ok(LaunchOutcome {
                    detail: format!(
                        "(opened via default handler; '{executable}' command may not be on PATH)"
                    ),
                    workspace: None,
                    via_default_handler: true,
                }),
                Err(e2) => Err(Error::Launch(format!("Failed to open file: {e2}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Launched, MockLauncher};

    #[test]
    fn workspace_precedes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.rs");
        let l = MockLauncher::new();
        let out = launch(&l, "cursor", Some(dir.path()), &file).unwrap();
        assert_eq!(
            l.launched(),
            vec![Launched::Spawn {
                program: "cursor".into(),
                args: vec![dir.path().to_path_buf(), file.clone()],
            }]
        );
        assert!(out.opened_workspace());
        assert_eq!(out.detail, format!("workspace: {}", dir.path().display()));
    }

    #[test]
    fn missing_workspace_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.rs");
        let l = MockLauncher::new();
        let out = launch(&l, "cursor", Some(&dir.path().join("nope")), &file).unwrap();
        assert_eq!(
            l.launched(),
            vec![Launched::Spawn {
                program: "cursor".into(),
                args: vec![file.clone()],
            }]
        );
        assert!(!out.opened_workspace());
        assert_eq!(out.detail, "");
    }

    #[test]
    fn falls_back_to_default_handler() {
        let file = PathBuf::from("/tmp/x.rs");
        let l = MockLauncher::new();
        l.set_fail_spawn(true);
        let out = launch(&l, "cursor", None, &file).unwrap();
        assert!(out.via_default_handler);
        assert_eq!(
            out.detail,
            "(opened via default handler; 'cursor' command may not be on PATH)"
        );
        assert_eq!(l.launched().last(), Some(&Launched::Default(file)));
    }

    #[test]
    fn both_paths_failing_is_an_error() {
        let l = MockLauncher::new();
        l.set_fail_spawn(true);
        l.set_fail_default(true);
        let err = launch(&l, "cursor", None, Path::new("/tmp/x.rs")).unwrap_err();
        match err {
            Error::Launch(msg) => assert!(msg.starts_with("Failed to open file: "), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

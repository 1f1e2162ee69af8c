use std::{
    env, fmt,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use relaykey::RelayKey;
use tracing::{debug, info, warn};
use winops::WinOps;

use crate::{
    Result,
    activate::activate_target,
    clock::{Clock, SystemClock},
    deps::{Clipboard, Launcher, ProcessLauncher, SystemClipboard},
    launch::{LaunchOutcome, launch},
    message::{combine_message, save_message},
    request::OpenRequest,
    script::{open_chat_and_paste, run_script},
    wait::{Poller, REQUIRED_CONSECUTIVE_CHECKS},
};

/// File name of the persisted message inside the temp directory.
pub const MESSAGE_FILE_NAME: &str = "cursor_received_message.txt";

/// Minimum file-load wait when a workspace was opened alongside the file.
pub const WORKSPACE_FILE_LOAD_FLOOR: Duration = Duration::from_secs(12);
/// Pause when the editor never showed a window.
pub const STARTUP_FALLBACK_PAUSE: Duration = Duration::from_secs(1);
/// Pause when the editor showed a window but never settled.
pub const READY_FALLBACK_PAUSE: Duration = Duration::from_millis(500);
/// Pause when the file never appeared in a window title.
pub const FILE_LOAD_FALLBACK_PAUSE: Duration = Duration::from_millis(500);
/// Pause between activation and the first keystroke.
pub const PRE_KEYS_SETTLE: Duration = Duration::from_millis(200);

/// Readiness wait limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Cold start: wait for the first window.
    pub startup: Duration,
    /// Cold start: wait for the window to answer consistently.
    pub ready: Duration,
    /// File-title wait when the editor was already running.
    pub file_load_hot: Duration,
    /// File-title wait after a cold start.
    pub file_load_cold: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            startup: Duration::from_secs(15),
            ready: Duration::from_secs(5),
            file_load_hot: Duration::from_secs(8),
            file_load_cold: Duration::from_secs(15),
        }
    }
}

/// Static configuration for a [`Bridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Editor command used to open files.
    pub executable: String,
    /// Case-insensitive window-title substring identifying the editor.
    pub title_match: String,
    /// Where the combined message is written.
    pub message_path: PathBuf,
    /// Readiness wait limits.
    pub timeouts: Timeouts,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            executable: "cursor".to_string(),
            title_match: "cursor".to_string(),
            message_path: env::temp_dir().join(MESSAGE_FILE_NAME),
            timeouts: Timeouts::default(),
        }
    }
}

/// Platform capabilities the bridge drives.
#[derive(Clone)]
pub struct Services {
    /// Window enumeration and focus.
    pub winops: Arc<dyn WinOps>,
    /// Synthetic keyboard input.
    pub keys: RelayKey,
    /// System clipboard.
    pub clipboard: Arc<dyn Clipboard>,
    /// Process launcher.
    pub launcher: Arc<dyn Launcher>,
    /// Time source for polls and pauses.
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Real backends for this host; unsupported pieces degrade to stubs.
    pub fn platform() -> Self {
        Self {
            winops: winops::platform_ops(),
            keys: RelayKey::new(),
            clipboard: Arc::new(SystemClipboard),
            launcher: Arc::new(ProcessLauncher),
            clock: Arc::new(SystemClock),
        }
    }

    /// Which automation capabilities actually work here.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            windows: self.winops.available(),
            keys: self.keys.available(),
            clipboard: self.clipboard.available(),
        }
    }
}

/// Availability of each automation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Window enumeration and activation.
    pub windows: bool,
    /// Synthetic key posting.
    pub keys: bool,
    /// Clipboard writes.
    pub clipboard: bool,
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yn = |b: bool| if b { "available" } else { "unavailable" };
        write!(
            f,
            "windows: {}, keys: {}, clipboard: {}",
            yn(self.windows),
            yn(self.keys),
            yn(self.clipboard)
        )
    }
}

/// Orchestration phases of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Starting the editor.
    Launching,
    /// Deciding between the cold and hot paths.
    DetectingColdStart,
    /// Cold path: waiting for the first window.
    WaitingStartup,
    /// Cold path: waiting for a stable window.
    WaitingReady,
    /// Waiting for the file name to show up in a title.
    WaitingFileLoad,
    /// Focusing the window (and pasting, for the paste flow).
    Activating,
    /// Finished.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The file that was opened.
    pub opened_file: PathBuf,
    /// How the launch went.
    pub launch: LaunchOutcome,
    /// True when no editor window existed before launching.
    pub cold_start: bool,
    /// True when the file name showed up in a window title in time.
    pub file_loaded: bool,
    /// Where the message was saved (paste flow only).
    pub message_saved_to: Option<PathBuf>,
    /// Phases visited, in order.
    pub stages: Vec<Stage>,
    /// Swallowed failures and timeouts, in order.
    pub warnings: Vec<String>,
}

/// The request orchestrator.
///
/// Every call runs synchronously to completion on the caller's thread.
pub struct Bridge {
    settings: Settings,
    services: Services,
}

impl Bridge {
    /// Build a bridge over explicit services.
    pub fn new(settings: Settings, services: Services) -> Self {
        Self { settings, services }
    }

    /// The bridge's configuration.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Capability report for the injected services.
    pub fn capabilities(&self) -> Capabilities {
        self.services.capabilities()
    }

    /// Open the file (and workspace) and focus the editor; no clipboard,
    /// no temp file, no keystrokes.
    pub fn open_file(&self, req: &OpenRequest) -> Result<Outcome> {
        let mut run = self.start(req)?;
        self.wait_until_loaded(&mut run, req);
        run.enter(Stage::Activating);
        let basename = req.basename();
        let svc = &self.services;
        match activate_target(
            svc.winops.as_ref(),
            svc.clock.as_ref(),
            &self.settings.title_match,
            basename.as_deref(),
        ) {
            Ok(report) => run.outcome.warnings.extend(report.warnings),
            Err(e) => run.warn(format!("Could not bring window to front: {e}")),
        }
        run.enter(Stage::Done);
        Ok(run.outcome)
    }

    /// Open the file, deliver the combined message to the chat panel and
    /// optionally submit it.
    pub fn open_and_paste(&self, req: &OpenRequest) -> Result<Outcome> {
        let message = combine_message(req.comment.as_deref(), req.code_snippet.as_deref());
        let mut run = self.start(req)?;

        save_message(&self.settings.message_path, &message)?;
        run.outcome.message_saved_to = Some(self.settings.message_path.clone());

        let svc = &self.services;
        if let Err(e) = svc.clipboard.copy(&message) {
            run.warn(format!("Failed to copy to clipboard: {e}"));
        }

        self.wait_until_loaded(&mut run, req);

        run.enter(Stage::Activating);
        let basename = req.basename();
        match activate_target(
            svc.winops.as_ref(),
            svc.clock.as_ref(),
            &self.settings.title_match,
            basename.as_deref(),
        ) {
            Ok(report) => {
                run.outcome.warnings.extend(report.warnings);
                svc.clock.sleep(PRE_KEYS_SETTLE);
                let script = open_chat_and_paste(req.auto_submit);
                match run_script(&svc.keys, svc.clock.as_ref(), &script) {
                    Ok(()) => {
                        let note = if req.auto_submit {
                            "Pasted and submitted"
                        } else {
                            "Pasted (ready for manual submit)"
                        };
                        info!("{}: {}", note, report.window.title);
                    }
                    Err(e) => run.warn(format!("Keystroke delivery failed: {e}")),
                }
            }
            Err(e) => run.warn(format!("Could not bring window to front: {e}")),
        }
        run.enter(Stage::Done);
        Ok(run.outcome)
    }

    /// Probe for a running editor, then launch it.
    fn start(&self, req: &OpenRequest) -> Result<Run> {
        let svc = &self.services;
        let was_running =
            Poller::new(svc.winops.as_ref(), svc.clock.as_ref(), &self.settings.title_match)
                .any_window();

        let mut stages = Vec::new();
        debug!(stage = %Stage::Launching, "request stage");
        stages.push(Stage::Launching);
        let launched = launch(
            svc.launcher.as_ref(),
            &self.settings.executable,
            req.workspace_path.as_deref(),
            &req.file_path,
        )?;

        Ok(Run {
            outcome: Outcome {
                opened_file: req.file_path.clone(),
                launch: launched,
                cold_start: !was_running,
                file_loaded: false,
                message_saved_to: None,
                stages,
                warnings: Vec::new(),
            },
        })
    }

    /// Cold-start waits followed by the file-title wait. Timeouts only warn.
    fn wait_until_loaded(&self, run: &mut Run, req: &OpenRequest) {
        let svc = &self.services;
        let t = &self.settings.timeouts;
        let poller = Poller::new(svc.winops.as_ref(), svc.clock.as_ref(), &self.settings.title_match);

        run.enter(Stage::DetectingColdStart);
        let cold = run.outcome.cold_start;
        info!(
            "Editor was {}",
            if cold { "NOT running (cold start)" } else { "already running" }
        );
        if cold {
            run.enter(Stage::WaitingStartup);
            if poller.wait_for_appearance(t.startup) {
                run.enter(Stage::WaitingReady);
                if !poller.wait_for_responsive(t.ready, REQUIRED_CONSECUTIVE_CHECKS) {
                    run.warn("Editor responsiveness timeout, proceeding anyway");
                    svc.clock.sleep(READY_FALLBACK_PAUSE);
                }
            } else {
                run.warn("Editor startup timeout, proceeding anyway");
                svc.clock.sleep(STARTUP_FALLBACK_PAUSE);
            }
        }

        run.enter(Stage::WaitingFileLoad);
        let mut timeout = if cold { t.file_load_cold } else { t.file_load_hot };
        if run.outcome.launch.opened_workspace() {
            timeout = timeout.max(WORKSPACE_FILE_LOAD_FLOOR);
        }
        let basename = req.basename();
        run.outcome.file_loaded = poller.wait_for_title_contains(basename.as_deref(), timeout);
        if !run.outcome.file_loaded {
            run.warn("File load timeout, proceeding anyway");
            svc.clock.sleep(FILE_LOAD_FALLBACK_PAUSE);
        }
    }
}

/// Per-request bookkeeping.
struct Run {
    outcome: Outcome,
}

impl Run {
    fn enter(&mut self, stage: Stage) {
        debug!(stage = %stage, "request stage");
        self.outcome.stages.push(stage);
    }

    fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!("{}", msg);
        self.outcome.warnings.push(msg);
    }
}

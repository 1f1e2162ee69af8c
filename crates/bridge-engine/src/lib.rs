//! Bridge Engine
//!
//! The bridge engine drives the editor on behalf of one request:
//! - launches the editor on a file (optionally with its workspace)
//! - polls window titles until the editor is up and the file is loaded
//! - brings the editor window to the foreground
//! - writes the combined message to disk and the clipboard
//! - types the chat-open/paste/submit keystrokes
//!
//! The main entry point is [`Bridge`]. Platform capabilities are injected
//! through [`Services`]; with the `test-utils` feature, `test_support`
//! provides recording doubles and a virtual clock.
//!
//! Everything here is blocking. Callers on an async runtime should run
//! [`Bridge`] methods on a blocking worker.

mod activate;
mod bridge;
pub mod clock;
mod deps;
mod error;
mod launch;
mod message;
mod request;
pub mod script;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
pub mod wait;

pub use activate::{ActivationReport, activate, activate_target};
pub use bridge::{
    Bridge, Capabilities, MESSAGE_FILE_NAME, Outcome, Services, Settings, Stage, Timeouts,
    WORKSPACE_FILE_LOAD_FLOOR,
};
pub use deps::{Clipboard, Launcher, ProcessLauncher, SystemClipboard};
pub use error::{Error, Result};
pub use launch::{LaunchOutcome, launch};
pub use message::{SNIPPET_SEPARATOR, combine_message, save_message};
pub use request::{OpenRequest, absolutize, expand_home, resolve_file_path};

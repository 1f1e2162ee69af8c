//! Bringing the editor window to the foreground.
//!
//! Activation is layered: restore and maximize, then a forced foreground
//! switch that temporarily attaches our input queue to the current
//! foreground thread, then bring-to-top/set-active if that was refused.
//! Only a missing window is an error; every focus failure becomes a warning.

use std::time::Duration;

use tracing::{debug, info, warn};
use winops::{ShowCmd, WinOps, WindowId, WindowInfo, pick_window};

use crate::{Error, Result, clock::Clock, wait::Poller};

/// Pause after each show-state change.
pub const SHOW_SETTLE: Duration = Duration::from_millis(50);

/// What activation did and what went wrong along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// The window that was targeted.
    pub window: WindowInfo,
    /// True if the forced foreground switch succeeded.
    pub foreground: bool,
    /// Swallowed failures, in order.
    pub warnings: Vec<String>,
}

/// Find the target window for `basename` among windows matching the poller's
/// signature and activate it.
pub fn activate_target(
    ops: &dyn WinOps,
    clock: &dyn Clock,
    signature: &str,
    basename: Option<&str>,
) -> Result<ActivationReport> {
    let windows = Poller::new(ops, clock, signature).matching();
    let Some(window) = pick_window(&windows, basename) else {
        return Err(Error::WindowNotFound(signature.to_string()));
    };
    debug!(id = window.id, "target window: {}", window.title);
    Ok(activate(ops, clock, window.clone()))
}

/// Activate `window`; never fails, failures are collected as warnings.
pub fn activate(ops: &dyn WinOps, clock: &dyn Clock, window: WindowInfo) -> ActivationReport {
    let mut warnings = Vec::new();
    for cmd in [ShowCmd::Restore, ShowCmd::Maximize] {
        if let Err(e) = ops.show(window.id, cmd) {
            warn!("ShowWindow({:?}) failed: {}", cmd, e);
            warnings.push(format!("show {cmd:?} failed: {e}"));
        }
        clock.sleep(SHOW_SETTLE);
    }

    let foreground = match force_foreground(ops, window.id) {
        Ok(()) => {
            info!("Window brought to foreground: {}", window.title);
            true
        }
        Err(e) => {
            warn!("SetForegroundWindow failed: {}; trying fallback", e);
            warnings.push(format!("foreground switch failed: {e}"));
            if let Err(e) = ops.bring_to_top(window.id).and_then(|()| ops.set_active(window.id)) {
                warn!("Fallback activation failed: {}", e);
                warnings.push(format!("fallback activation failed: {e}"));
            }
            false
        }
    };

    ActivationReport {
        window,
        foreground,
        warnings,
    }
}

/// Attach to the foreground thread (when it is not ours), set foreground,
/// and always detach again.
fn force_foreground(ops: &dyn WinOps, id: WindowId) -> winops::Result<()> {
    let me = ops.current_thread();
    let other = match ops.foreground_window() {
        Some(fg) => Some(ops.window_thread(fg)?),
        None => None,
    }
    .filter(|t| *t != me);

    if let Some(t) = other {
        ops.attach_input(t, me, true)?;
    }
    let res = ops.set_foreground(id);
    if let Some(t) = other
        && let Err(e) = ops.attach_input(t, me, false)
    {
        debug!("detach from thread {} failed: {}", t, e);
    }
    res
}

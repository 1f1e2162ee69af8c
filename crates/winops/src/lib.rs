//! winops: top-level window operations for the editor bridge.
//!
//! Provides a [`WinOps`] trait over the handful of OS primitives the bridge
//! needs: enumerate visible windows, read a window's owning process and
//! thread, restore/maximize, and the foreground-focus calls. On Windows the
//! trait is backed by Win32; elsewhere [`UnavailableWinOps`] reports no
//! windows and rejects every mutation.
//!
//! Window state is never cached: every query goes back to the OS.

mod error;
#[cfg(any(test, feature = "test-utils"))]
mod mock;
/// The `WinOps` trait and its platform implementations.
pub mod ops;
#[cfg(windows)]
mod raise;
#[cfg(windows)]
mod window;

pub use error::{Error, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockWinOps;
pub use ops::{UnavailableWinOps, WinOps, platform_ops};

/// Opaque native window handle (an `HWND` on Windows).
pub type WindowId = isize;

/// A visible top-level window as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Native handle.
    pub id: WindowId,
    /// Current title text.
    pub title: String,
}

/// Show-state transitions used when activating a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCmd {
    /// Un-minimize to the previous placement.
    Restore,
    /// Maximize on the current monitor.
    Maximize,
}

/// Visible windows whose title contains `signature`, ignoring case.
///
/// An empty result is not an error; only a failed enumeration is.
pub fn list_matching_windows(ops: &dyn WinOps, signature: &str) -> Result<Vec<WindowInfo>> {
    let needle = signature.to_lowercase();
    Ok(ops
        .list_windows()?
        .into_iter()
        .filter(|w| w.title.to_lowercase().contains(&needle))
        .collect())
}

/// Pick the window to act on: the first whose title contains `basename`
/// (case-insensitive), otherwise the first window.
pub fn pick_window<'a>(windows: &'a [WindowInfo], basename: Option<&str>) -> Option<&'a WindowInfo> {
    if let Some(name) = basename.filter(|n| !n.is_empty()) {
        let name = name.to_lowercase();
        if let Some(w) = windows.iter().find(|w| w.title.to_lowercase().contains(&name)) {
            return Some(w);
        }
    }
    windows.first()
}

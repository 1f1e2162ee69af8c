use std::sync::Arc;

use crate::{Error, Result as WinResult, ShowCmd, WindowId, WindowInfo};

/// Trait abstraction over window operations to improve testability.
///
/// Each method maps to one OS primitive; sequencing (restore, maximize,
/// foreground, fallback) is left to the caller.
pub trait WinOps: Send + Sync {
    /// Visible top-level windows with non-empty titles, in OS order.
    fn list_windows(&self) -> WinResult<Vec<WindowInfo>>;
    /// Process id owning the window.
    fn window_pid(&self, id: WindowId) -> WinResult<u32>;
    /// Thread id owning the window.
    fn window_thread(&self, id: WindowId) -> WinResult<u32>;
    /// Change the window's show state (restore, maximize).
    fn show(&self, id: WindowId, cmd: ShowCmd) -> WinResult<()>;
    /// Handle of the current foreground window, if any.
    fn foreground_window(&self) -> Option<WindowId>;
    /// Id of the calling thread.
    fn current_thread(&self) -> u32;
    /// Attach (or detach) the input queue of thread `from` to thread `to`.
    fn attach_input(&self, from: u32, to: u32, attach: bool) -> WinResult<()>;
    /// Ask the OS to make the window the foreground window.
    fn set_foreground(&self, id: WindowId) -> WinResult<()>;
    /// Move the window to the top of the z-order.
    fn bring_to_top(&self, id: WindowId) -> WinResult<()>;
    /// Activate the window within its thread's input queue.
    fn set_active(&self, id: WindowId) -> WinResult<()>;
    /// Whether these operations reach a real window manager.
    fn available(&self) -> bool {
        true
    }
}

/// Production implementation of WinOps delegating to crate functions.
#[cfg(windows)]
pub struct RealWinOps;

#[cfg(windows)]
impl WinOps for RealWinOps {
    fn list_windows(&self) -> WinResult<Vec<WindowInfo>> {
        crate::window::list_windows()
    }
    fn window_pid(&self, id: WindowId) -> WinResult<u32> {
        crate::window::window_owner(id).map(|(pid, _)| pid)
    }
    fn window_thread(&self, id: WindowId) -> WinResult<u32> {
        crate::window::window_owner(id).map(|(_, tid)| tid)
    }
    fn show(&self, id: WindowId, cmd: ShowCmd) -> WinResult<()> {
        crate::raise::show(id, cmd)
    }
    fn foreground_window(&self) -> Option<WindowId> {
        crate::raise::foreground_window()
    }
    fn current_thread(&self) -> u32 {
        crate::raise::current_thread()
    }
    fn attach_input(&self, from: u32, to: u32, attach: bool) -> WinResult<()> {
        crate::raise::attach_input(from, to, attach)
    }
    fn set_foreground(&self, id: WindowId) -> WinResult<()> {
        crate::raise::set_foreground(id)
    }
    fn bring_to_top(&self, id: WindowId) -> WinResult<()> {
        crate::raise::bring_to_top(id)
    }
    fn set_active(&self, id: WindowId) -> WinResult<()> {
        crate::raise::set_active(id)
    }
}

/// Stand-in for hosts without a supported window manager.
///
/// Enumeration yields no windows; every mutating call fails with
/// [`Error::Unsupported`].
pub struct UnavailableWinOps;

impl WinOps for UnavailableWinOps {
    fn list_windows(&self) -> WinResult<Vec<WindowInfo>> {
        Ok(Vec::new())
    }
    fn window_pid(&self, _id: WindowId) -> WinResult<u32> {
        Err(Error::Unsupported)
    }
    fn window_thread(&self, _id: WindowId) -> WinResult<u32> {
        Err(Error::Unsupported)
    }
    fn show(&self, _id: WindowId, _cmd: ShowCmd) -> WinResult<()> {
        Err(Error::Unsupported)
    }
    fn foreground_window(&self) -> Option<WindowId> {
        None
    }
    fn current_thread(&self) -> u32 {
        0
    }
    fn attach_input(&self, _from: u32, _to: u32, _attach: bool) -> WinResult<()> {
        Err(Error::Unsupported)
    }
    fn set_foreground(&self, _id: WindowId) -> WinResult<()> {
        Err(Error::Unsupported)
    }
    fn bring_to_top(&self, _id: WindowId) -> WinResult<()> {
        Err(Error::Unsupported)
    }
    fn set_active(&self, _id: WindowId) -> WinResult<()> {
        Err(Error::Unsupported)
    }
    fn available(&self) -> bool {
        false
    }
}

/// The window backend for this host.
#[cfg(windows)]
pub fn platform_ops() -> Arc<dyn WinOps> {
    Arc::new(RealWinOps)
}

/// The window backend for this host.
#[cfg(not(windows))]
pub fn platform_ops() -> Arc<dyn WinOps> {
    Arc::new(UnavailableWinOps)
}

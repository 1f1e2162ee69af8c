use tracing::debug;
use windows_sys::Win32::{
    System::Threading::{AttachThreadInput, GetCurrentThreadId},
    UI::{
        Input::KeyboardAndMouse::SetActiveWindow,
        WindowsAndMessaging::{
            BringWindowToTop, GetForegroundWindow, SW_MAXIMIZE, SW_RESTORE, SetForegroundWindow,
            ShowWindow,
        },
    },
};

use crate::{
    Result, ShowCmd, WindowId,
    window::{hwnd, os_err},
};

pub(crate) fn show(id: WindowId, cmd: ShowCmd) -> Result<()> {
    let sw = match cmd {
        ShowCmd::Restore => SW_RESTORE,
        ShowCmd::Maximize => SW_MAXIMIZE,
    };
    debug!("show: id={:#x} cmd={:?}", id, cmd);
    // ShowWindow returns the previous visibility, not success.
    unsafe { ShowWindow(hwnd(id), sw) };
    Ok(())
}

pub(crate) fn foreground_window() -> Option<WindowId> {
    let h = unsafe { GetForegroundWindow() };
    if h.is_null() { None } else { Some(h as WindowId) }
}

pub(crate) fn current_thread() -> u32 {
    unsafe { GetCurrentThreadId() }
}

pub(crate) fn attach_input(from: u32, to: u32, attach: bool) -> Result<()> {
    let ok = unsafe { AttachThreadInput(from, to, i32::from(attach)) };
    if ok == 0 {
        return Err(os_err("AttachThreadInput"));
    }
    Ok(())
}

pub(crate) fn set_foreground(id: WindowId) -> Result<()> {
    if unsafe { SetForegroundWindow(hwnd(id)) } == 0 {
        return Err(os_err("SetForegroundWindow"));
    }
    Ok(())
}

pub(crate) fn bring_to_top(id: WindowId) -> Result<()> {
    if unsafe { BringWindowToTop(hwnd(id)) } == 0 {
        return Err(os_err("BringWindowToTop"));
    }
    Ok(())
}

pub(crate) fn set_active(id: WindowId) -> Result<()> {
    if unsafe { SetActiveWindow(hwnd(id)) }.is_null() {
        return Err(os_err("SetActiveWindow"));
    }
    Ok(())
}

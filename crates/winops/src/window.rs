use std::io;

use tracing::{trace, warn};
use windows_sys::{
    Win32::{
        Foundation::{HWND, LPARAM},
        UI::WindowsAndMessaging::{
            EnumWindows, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsWindow,
            IsWindowVisible,
        },
    },
    core::BOOL,
};

use crate::{Error, Result, WindowId, WindowInfo};

#[inline]
pub(crate) fn hwnd(id: WindowId) -> HWND {
    id as HWND
}

pub(crate) fn os_err(call: &'static str) -> Error {
    Error::Os {
        call,
        detail: io::Error::last_os_error().to_string(),
    }
}

fn window_title(h: HWND) -> String {
    // SAFETY: `h` came from EnumWindows; a stale handle yields length 0.
    let len = unsafe { GetWindowTextLengthW(h) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let got = unsafe { GetWindowTextW(h, buf.as_mut_ptr(), buf.len() as i32) };
    if got <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buf[..got as usize])
}

unsafe extern "system" fn collect(h: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: `lparam` is the `&mut Vec` passed to EnumWindows below and
    // outlives the enumeration.
    let out = unsafe { &mut *(lparam as *mut Vec<WindowInfo>) };
    if unsafe { IsWindowVisible(h) } != 0 {
        let title = window_title(h);
        if !title.is_empty() {
            out.push(WindowInfo {
                id: h as WindowId,
                title,
            });
        }
    }
    1
}

/// All visible top-level windows with a non-empty title, in Z order.
pub fn list_windows() -> Result<Vec<WindowInfo>> {
    trace!("list_windows");
    let mut out: Vec<WindowInfo> = Vec::new();
    let ok = unsafe { EnumWindows(Some(collect), &mut out as *mut Vec<WindowInfo> as LPARAM) };
    if ok == 0 {
        let e = os_err("EnumWindows");
        warn!("list_windows: {}", e);
        return Err(e);
    }
    Ok(out)
}

/// Owning process id and thread id of `id`.
pub(crate) fn window_owner(id: WindowId) -> Result<(u32, u32)> {
    let h = hwnd(id);
    if unsafe { IsWindow(h) } == 0 {
        return Err(Error::WindowGone(id));
    }
    let mut pid: u32 = 0;
    let tid = unsafe { GetWindowThreadProcessId(h, &mut pid) };
    if tid == 0 {
        return Err(os_err("GetWindowThreadProcessId"));
    }
    Ok((pid, tid))
}

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{Error, ShowCmd, WinOps, WindowId, WindowInfo, error::Result as WinResult};

/// Simple mock implementation for tests (enabled with `test-utils` feature).
///
/// `list_windows` first drains any queued frames, then keeps returning the
/// steady-state window list. `window_pid` likewise drains queued samples
/// before falling back to the steady-state pid.
#[derive(Clone)]
pub struct MockWinOps {
    calls: Arc<Mutex<Vec<String>>>,
    windows: Arc<Mutex<Vec<WindowInfo>>>,
    frames: Arc<Mutex<VecDeque<WinResult<Vec<WindowInfo>>>>>,
    pid: Arc<Mutex<WinResult<u32>>>,
    pid_samples: Arc<Mutex<VecDeque<WinResult<u32>>>>,
    foreground: Arc<Mutex<Option<WindowId>>>,
    list_calls: Arc<AtomicUsize>,
    fail_show: Arc<AtomicBool>,
    fail_set_foreground: Arc<AtomicBool>,
    fail_fallback: Arc<AtomicBool>,
}

impl MockWinOps {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            windows: Arc::new(Mutex::new(Vec::new())),
            frames: Arc::new(Mutex::new(VecDeque::new())),
            pid: Arc::new(Mutex::new(Ok(4242))),
            pid_samples: Arc::new(Mutex::new(VecDeque::new())),
            foreground: Arc::new(Mutex::new(Some(0x99))),
            list_calls: Arc::new(AtomicUsize::new(0)),
            fail_show: Arc::new(AtomicBool::new(false)),
            fail_set_foreground: Arc::new(AtomicBool::new(false)),
            fail_fallback: Arc::new(AtomicBool::new(false)),
        }
    }
    /// Shorthand for a window entry.
    pub fn window(id: WindowId, title: &str) -> WindowInfo {
        WindowInfo {
            id,
            title: title.to_string(),
        }
    }
    pub fn set_windows(&self, wins: Vec<WindowInfo>) {
        *self.windows.lock() = wins;
    }
    /// Queue one-shot `list_windows` results consumed before the steady state.
    pub fn push_frames(&self, frames: impl IntoIterator<Item = WinResult<Vec<WindowInfo>>>) {
        self.frames.lock().extend(frames);
    }
    pub fn set_pid(&self, pid: WinResult<u32>) {
        *self.pid.lock() = pid;
    }
    /// Queue one-shot `window_pid` results consumed before the steady state.
    pub fn push_pid_samples(&self, samples: impl IntoIterator<Item = WinResult<u32>>) {
        self.pid_samples.lock().extend(samples);
    }
    pub fn set_foreground_window(&self, id: Option<WindowId>) {
        *self.foreground.lock() = id;
    }
    pub fn set_fail_show(&self, v: bool) {
        self.fail_show.store(v, Ordering::SeqCst);
    }
    pub fn set_fail_set_foreground(&self, v: bool) {
        self.fail_set_foreground.store(v, Ordering::SeqCst);
    }
    pub fn set_fail_fallback(&self, v: bool) {
        self.fail_fallback.store(v, Ordering::SeqCst);
    }
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }
    /// Number of `list_windows` calls made so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
    fn note(&self, s: impl Into<String>) {
        self.calls.lock().push(s.into());
    }
    fn fail_if(flag: &AtomicBool, call: &'static str) -> WinResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Os {
                call,
                detail: "mock failure".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockWinOps {
    fn default() -> Self {
        Self::new()
    }
}

impl WinOps for MockWinOps {
    fn list_windows(&self) -> WinResult<Vec<WindowInfo>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(frame) = self.frames.lock().pop_front() {
            return frame;
        }
        Ok(self.windows.lock().clone())
    }
    fn window_pid(&self, _id: WindowId) -> WinResult<u32> {
        if let Some(sample) = self.pid_samples.lock().pop_front() {
            return sample;
        }
        self.pid.lock().clone()
    }
    fn window_thread(&self, id: WindowId) -> WinResult<u32> {
        // Foreground window lives on thread 7, everything else on 11.
        if Some(id) == *self.foreground.lock() {
            Ok(7)
        } else {
            Ok(11)
        }
    }
    fn show(&self, _id: WindowId, cmd: ShowCmd) -> WinResult<()> {
        self.note(match cmd {
            ShowCmd::Restore => "restore",
            ShowCmd::Maximize => "maximize",
        });
        Self::fail_if(&self.fail_show, "ShowWindow")
    }
    fn foreground_window(&self) -> Option<WindowId> {
        *self.foreground.lock()
    }
    fn current_thread(&self) -> u32 {
        3
    }
    fn attach_input(&self, from: u32, to: u32, attach: bool) -> WinResult<()> {
        let verb = if attach { "attach" } else { "detach" };
        self.note(format!("{verb} {from}->{to}"));
        Ok(())
    }
    fn set_foreground(&self, _id: WindowId) -> WinResult<()> {
        self.note("set_foreground");
        Self::fail_if(&self.fail_set_foreground, "SetForegroundWindow")
    }
    fn bring_to_top(&self, _id: WindowId) -> WinResult<()> {
        self.note("bring_to_top");
        Self::fail_if(&self.fail_fallback, "BringWindowToTop")
    }
    fn set_active(&self, _id: WindowId) -> WinResult<()> {
        self.note("set_active");
        Self::fail_if(&self.fail_fallback, "SetActiveWindow")
    }
}

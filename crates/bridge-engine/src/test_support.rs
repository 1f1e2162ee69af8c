//! Recording doubles for the engine's injected capabilities.

use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use relaykey::{MockPoster, RelayKey};
use winops::MockWinOps;

use crate::{
    Error, Result,
    bridge::Services,
    clock::ManualClock,
    deps::{Clipboard, Launcher},
};

/// One launch recorded by [`MockLauncher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launched {
    /// `spawn(program, args)`.
    Spawn {
        /// Program name.
        program: String,
        /// Arguments in order.
        args: Vec<PathBuf>,
    },
    /// `open_default(path)`.
    Default(PathBuf),
}

/// Launcher that records requests instead of starting processes.
#[derive(Default)]
pub struct MockLauncher {
    launched: Mutex<Vec<Launched>>,
    fail_spawn: AtomicBool,
    fail_default: AtomicBool,
    on_spawn: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl MockLauncher {
    /// Create a launcher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `spawn` fail.
    pub fn set_fail_spawn(&self, v: bool) {
        self.fail_spawn.store(v, Ordering::SeqCst);
    }

    /// Make `open_default` fail.
    pub fn set_fail_default(&self, v: bool) {
        self.fail_default.store(v, Ordering::SeqCst);
    }

    /// Run `f` on every successful spawn, e.g. to make windows appear.
    pub fn on_spawn(&self, f: impl Fn() + Send + Sync + 'static) {
        *self.on_spawn.lock() = Some(Box::new(f));
    }

    /// Everything launched so far.
    pub fn launched(&self) -> Vec<Launched> {
        self.launched.lock().clone()
    }
}

impl Launcher for MockLauncher {
    fn spawn(&self, program: &str, args: &[&Path]) -> io::Result<()> {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
        }
        self.launched.lock().push(Launched::Spawn {
            program: program.to_string(),
            args: args.iter().map(|p| p.to_path_buf()).collect(),
        });
        if let Some(f) = self.on_spawn.lock().as_ref() {
            f();
        }
        Ok(())
    }

    fn open_default(&self, path: &Path) -> io::Result<()> {
        if self.fail_default.load(Ordering::SeqCst) {
            return Err(io::Error::other("no handler registered"));
        }
        self.launched.lock().push(Launched::Default(path.to_path_buf()));
        Ok(())
    }
}

/// Clipboard that remembers every copied text.
#[derive(Default)]
pub struct MockClipboard {
    copies: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `copy` fail.
    pub fn set_fail(&self, v: bool) {
        self.fail.store(v, Ordering::SeqCst);
    }

    /// Texts copied so far, in order.
    pub fn copies(&self) -> Vec<String> {
        self.copies.lock().clone()
    }
}

impl Clipboard for MockClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Clipboard("clipboard locked".into()));
        }
        self.copies.lock().push(text.to_string());
        Ok(())
    }
}

/// All mocks wired together, with handles kept for inspection.
pub struct TestRig {
    /// Window backend.
    pub winops: MockWinOps,
    /// Key event recorder.
    pub poster: Arc<MockPoster>,
    /// Clipboard recorder.
    pub clipboard: Arc<MockClipboard>,
    /// Launch recorder.
    pub launcher: Arc<MockLauncher>,
    /// Virtual clock.
    pub clock: Arc<ManualClock>,
}

impl Default for TestRig {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRig {
    /// Fresh mocks with no windows.
    pub fn new() -> Self {
        Self {
            winops: MockWinOps::new(),
            poster: Arc::new(MockPoster::new()),
            clipboard: Arc::new(MockClipboard::new()),
            launcher: Arc::new(MockLauncher::new()),
            clock: Arc::new(ManualClock::new()),
        }
    }

    /// Services backed by this rig's mocks.
    pub fn services(&self) -> Services {
        Services {
            winops: Arc::new(self.winops.clone()),
            keys: RelayKey::with_poster(self.poster.clone()),
            clipboard: self.clipboard.clone(),
            launcher: self.launcher.clone(),
            clock: self.clock.clone(),
        }
    }
}

//! Recording poster for tests.
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{Chord, Error, Modifier, Poster, Result};

/// One event recorded by [`MockPoster`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Posted {
    /// Key-down for a chord's key.
    Down(Chord),
    /// Key-up for a chord's key.
    Up(Chord),
    /// Modifier press or release.
    Modifiers(Vec<Modifier>, bool),
}

/// Recording poster for tests.
#[derive(Default)]
pub struct MockPoster {
    events: Mutex<Vec<Posted>>,
    fail: AtomicBool,
}

impl MockPoster {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent post fail with [`Error::Post`].
    pub fn set_fail(&self, v: bool) {
        self.fail.store(v, Ordering::SeqCst);
    }

    /// All recorded events, in order.
    pub fn events(&self) -> Vec<Posted> {
        self.events.lock().clone()
    }

    /// Chords that received a key-down, in order.
    pub fn taps(&self) -> Vec<Chord> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Posted::Down(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, e: Posted) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Post("mock failure".into()));
        }
        self.events.lock().push(e);
        Ok(())
    }
}

impl Poster for MockPoster {
    fn post_down(&self, key: &Chord) -> Result<()> {
        self.record(Posted::Down(key.clone()))
    }
    fn post_up(&self, key: &Chord) -> Result<()> {
        self.record(Posted::Up(key.clone()))
    }
    fn post_modifiers(&self, mods: &[Modifier], down: bool) -> Result<()> {
        if mods.is_empty() {
            return Ok(());
        }
        self.record(Posted::Modifiers(mods.to_vec(), down))
    }
}

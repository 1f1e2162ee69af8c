//! Posts synthetic KeyDown/KeyUp events to the focused window.
//!
//! A `RelayKey` wraps a platform [`Poster`]. On Windows it injects events
//! with `SendInput`; elsewhere every post fails with [`Error::Unsupported`]
//! so callers can degrade instead of crashing.
//!
//! Chords are pressed modifiers-first and released key-first, so a
//! `key_down` followed by `key_up` leaves no modifier held.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]
use std::sync::Arc;

use tracing::trace;

mod chord;
mod error;
#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(windows)]
mod sys;

pub use chord::{Chord, Key, Modifier};
pub use error::{Error, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockPoster, Posted};

/// Low-level sink for key events.
pub trait Poster: Send + Sync {
    /// Post a key-down for the chord's key (modifiers are handled separately).
    fn post_down(&self, key: &Chord) -> Result<()>;
    /// Post a key-up for the chord's key.
    fn post_up(&self, key: &Chord) -> Result<()>;
    /// Press (`down = true`) or release the given modifiers.
    fn post_modifiers(&self, _mods: &[Modifier], _down: bool) -> Result<()> {
        Ok(())
    }
    /// Whether this poster can reach a real keyboard queue.
    fn available(&self) -> bool {
        true
    }
}

/// Poster used on hosts without synthetic input support.
struct UnavailablePoster;

impl Poster for UnavailablePoster {
    fn post_down(&self, _key: &Chord) -> Result<()> {
        Err(Error::Unsupported)
    }
    fn post_up(&self, _key: &Chord) -> Result<()> {
        Err(Error::Unsupported)
    }
    fn post_modifiers(&self, _mods: &[Modifier], _down: bool) -> Result<()> {
        Err(Error::Unsupported)
    }
    fn available(&self) -> bool {
        false
    }
}

/// Forwards chord presses and releases to a [`Poster`].
#[derive(Clone)]
pub struct RelayKey {
    poster: Arc<dyn Poster>,
}

impl Default for RelayKey {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayKey {
    /// Create a relayer backed by the platform poster.
    #[cfg(windows)]
    pub fn new() -> Self {
        Self {
            poster: Arc::new(sys::WinPoster),
        }
    }

    /// Create a relayer backed by the platform poster.
    #[cfg(not(windows))]
    pub fn new() -> Self {
        Self::unavailable()
    }

    /// A relayer whose posts always fail with [`Error::Unsupported`].
    pub fn unavailable() -> Self {
        Self {
            poster: Arc::new(UnavailablePoster),
        }
    }

    /// Build a relayer around a caller-supplied poster.
    pub fn with_poster(poster: Arc<dyn Poster>) -> Self {
        Self { poster }
    }

    /// Whether key events can actually be delivered on this host.
    pub fn available(&self) -> bool {
        self.poster.available()
    }

    /// Press the chord: modifiers first, then the key.
    pub fn key_down(&self, key: &Chord) -> Result<()> {
        trace!(chord = %key, "on_key_down");
        self.press_modifiers(key)?;
        self.press_key(key)
    }

    /// Release the chord: the key first, then the modifiers.
    ///
    /// Modifiers are released even if the key-up fails so nothing stays held.
    pub fn key_up(&self, key: &Chord) -> Result<()> {
        trace!(chord = %key, "on_key_up");
        let up = self.release_key(key);
        let mods = self.release_modifiers(key);
        up.and(mods)
    }

    /// Press only the chord's modifiers; a no-op for plain chords.
    pub fn press_modifiers(&self, key: &Chord) -> Result<()> {
        if key.modifiers.is_empty() {
            return Ok(());
        }
        self.poster.post_modifiers(&key.modifiers, true)
    }

    /// Release only the chord's modifiers; a no-op for plain chords.
    pub fn release_modifiers(&self, key: &Chord) -> Result<()> {
        if key.modifiers.is_empty() {
            return Ok(());
        }
        self.poster.post_modifiers(&key.modifiers, false)
    }

    /// Press only the chord's key.
    pub fn press_key(&self, key: &Chord) -> Result<()> {
        self.poster.post_down(key)
    }

    /// Release only the chord's key.
    pub fn release_key(&self, key: &Chord) -> Result<()> {
        self.poster.post_up(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_presses_modifiers_around_key() {
        let poster = Arc::new(MockPoster::new());
        let rk = RelayKey::with_poster(poster.clone());
        let c = Chord::ctrl(Key::Char('v'));
        rk.key_down(&c).unwrap();
        rk.key_up(&c).unwrap();
        assert_eq!(
            poster.events(),
            vec![
                Posted::Modifiers(vec![Modifier::Control], true),
                Posted::Down(c.clone()),
                Posted::Up(c),
                Posted::Modifiers(vec![Modifier::Control], false),
            ]
        );
    }

    #[test]
    fn plain_key_posts_no_modifiers() {
        let poster = Arc::new(MockPoster::new());
        let rk = RelayKey::with_poster(poster.clone());
        let c = Chord::plain(Key::Escape);
        rk.key_down(&c).unwrap();
        rk.key_up(&c).unwrap();
        assert_eq!(poster.events(), vec![Posted::Down(c.clone()), Posted::Up(c)]);
    }

    #[test]
    fn failures_propagate() {
        let poster = Arc::new(MockPoster::new());
        poster.set_fail(true);
        let rk = RelayKey::with_poster(poster.clone());
        assert!(rk.key_down(&Chord::plain(Key::Enter)).is_err());
        assert!(poster.events().is_empty());
    }

    #[test]
    fn unavailable_reports_unsupported() {
        let rk = RelayKey::unavailable();
        assert!(!rk.available());
        assert_eq!(
            rk.key_down(&Chord::plain(Key::Enter)),
            Err(Error::Unsupported)
        );
    }
}

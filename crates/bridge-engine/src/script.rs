//! Keystroke choreography as data.
//!
//! A script is a list of [`Step`]s; [`run_script`] taps each chord through a
//! [`RelayKey`] and then waits the step's pause on the injected [`Clock`].

use std::time::Duration;

use relaykey::{Chord, Key, RelayKey};
use tracing::{debug, warn};

use crate::clock::Clock;

/// Gap between a key's press and its release, and between a modifier and
/// its key.
pub const KEY_GAP: Duration = Duration::from_millis(20);

/// What a step does before its pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Press and release a chord.
    Tap(Chord),
    /// Do nothing; only the pause applies.
    Wait,
}

/// One scripted action followed by a pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The action.
    pub action: Action,
    /// Pause after the action completes.
    pub after: Duration,
}

impl Step {
    fn tap(chord: Chord, after_ms: u64) -> Self {
        Self {
            action: Action::Tap(chord),
            after: Duration::from_millis(after_ms),
        }
    }

    fn wait(ms: u64) -> Self {
        Self {
            action: Action::Wait,
            after: Duration::from_millis(ms),
        }
    }
}

/// Dismiss popups, focus the chat input, paste; optionally submit.
///
/// The submit tail re-dismisses and re-focuses chat before pressing Enter.
pub fn open_chat_and_paste(auto_submit: bool) -> Vec<Step> {
    let mut steps = vec![
        Step::tap(Chord::plain(Key::Escape), 750),
        Step::tap(Chord::ctrl(Key::Char('l')), 500),
        Step::tap(Chord::ctrl(Key::Char('v')), 200),
    ];
    if auto_submit {
        steps.extend([
            Step::wait(300),
            Step::tap(Chord::plain(Key::Escape), 200),
            Step::tap(Chord::ctrl(Key::Char('l')), 300),
            Step::tap(Chord::plain(Key::Enter), 0),
        ]);
    }
    steps
}

/// Run `steps` in order, stopping at the first failed tap.
pub fn run_script(keys: &RelayKey, clock: &dyn Clock, steps: &[Step]) -> relaykey::Result<()> {
    for step in steps {
        if let Action::Tap(chord) = &step.action {
            tap(keys, clock, chord)?;
            debug!(chord = %chord, "tapped");
        }
        clock.sleep(step.after);
    }
    Ok(())
}

/// Modifier down, gap, key down, gap, key up, gap, modifier up. Plain chords
/// skip the modifier gaps.
fn tap(keys: &RelayKey, clock: &dyn Clock, chord: &Chord) -> relaykey::Result<()> {
    let chorded = !chord.modifiers.is_empty();
    let pressed = keys.press_modifiers(chord).and_then(|()| {
        if chorded {
            clock.sleep(KEY_GAP);
        }
        keys.press_key(chord)
    });
    if let Err(e) = pressed {
        // Release whatever part of the chord made it down.
        if let Err(up) = keys.key_up(chord) {
            warn!(chord = %chord, "release after failed press also failed: {}", up);
        }
        return Err(e);
    }
    clock.sleep(KEY_GAP);
    let up = keys.release_key(chord);
    if chorded {
        clock.sleep(KEY_GAP);
    }
    up.and(keys.release_modifiers(chord))
}

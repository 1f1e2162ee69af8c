//! Win32 keyboard injection via `SendInput`.
use std::{io, mem::size_of};

use tracing::{info, trace};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_KEYUP, SendInput,
};

use crate::{Chord, Error, Modifier, Poster, Result};

/// Posts key events to whichever window currently has keyboard focus.
pub(crate) struct WinPoster;

impl WinPoster {
    fn send(&self, vk: u8, down: bool) -> Result<()> {
        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: u16::from(vk),
                    wScan: 0,
                    dwFlags: if down { 0 } else { KEYEVENTF_KEYUP },
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        // SAFETY: one fully initialised INPUT with the matching struct size.
        let sent = unsafe { SendInput(1, &input, size_of::<INPUT>() as i32) };
        if sent == 1 {
            Ok(())
        } else {
            // Zero means another thread blocked input or UIPI rejected it.
            Err(Error::Post(io::Error::last_os_error().to_string()))
        }
    }
}

fn key_vk(chord: &Chord) -> Result<u8> {
    chord
        .key
        .vk()
        .ok_or_else(|| Error::Unmapped(chord.key.to_string()))
}

impl Poster for WinPoster {
    fn post_down(&self, key: &Chord) -> Result<()> {
        trace!(chord = %key, "post_down");
        self.send(key_vk(key)?, true)?;
        info!(chord = %key, "relayed_key_down");
        Ok(())
    }

    fn post_up(&self, key: &Chord) -> Result<()> {
        trace!(chord = %key, "post_up");
        self.send(key_vk(key)?, false)?;
        info!(chord = %key, "relayed_key_up");
        Ok(())
    }

    fn post_modifiers(&self, mods: &[Modifier], down: bool) -> Result<()> {
        let mut codes: Vec<u8> = mods.iter().map(|m| m.vk()).collect();
        if !down {
            // Release in reverse order
            codes.reverse();
        }
        for code in codes {
            self.send(code, down)?;
        }
        Ok(())
    }
}

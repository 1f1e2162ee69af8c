use std::fmt;

/// A non-modifier key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// Escape.
    Escape,
    /// Return / Enter.
    Enter,
    /// An ASCII letter or digit.
    Char(char),
}

impl Key {
    /// Windows virtual-key code for this key.
    ///
    /// Letters map to their upper-case ASCII value, digits to themselves.
    pub fn vk(self) -> Option<u8> {
        match self {
            Self::Escape => Some(0x1B),
            Self::Enter => Some(0x0D),
            Self::Char(c) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u8),
            Self::Char(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escape => write!(f, "esc"),
            Self::Enter => write!(f, "enter"),
            Self::Char(c) => write!(f, "{}", c.to_ascii_lowercase()),
        }
    }
}

/// Modifier keys held around a chord.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Modifier {
    /// Left control.
    Control,
    /// Left shift.
    Shift,
    /// Left alt.
    Alt,
}

impl Modifier {
    /// Windows virtual-key code for this modifier.
    pub fn vk(self) -> u8 {
        match self {
            Self::Control => 0x11,
            Self::Shift => 0x10,
            Self::Alt => 0x12,
        }
    }

    fn spec(self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Shift => "shift",
            Self::Alt => "alt",
        }
    }
}

/// A key chord: modifiers (pressed in order) plus a single key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chord {
    /// Modifiers, pressed in listed order and released in reverse.
    pub modifiers: Vec<Modifier>,
    /// The non-modifier key for this chord.
    pub key: Key,
}

impl Chord {
    /// A bare key with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            modifiers: Vec::new(),
            key,
        }
    }

    /// `key` with control held.
    pub fn ctrl(key: Key) -> Self {
        Self {
            modifiers: vec![Modifier::Control],
            key,
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m.spec())?;
        }
        write!(f, "{}", self.key)
    }
}

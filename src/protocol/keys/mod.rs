//! Steering-wheel key codes and the resistor-ladder levels they drive.
//!
//! The raw code table, the console shortcuts, the message identifier and the
//! resistance of each level come from the key manifest compiled by `build.rs`
//! (see `build_core/var/key_manifest.json`).
include!(concat!(env!("OUT_DIR"), "/generated_keymap.rs"));

use core::fmt;

//==================================================================================KEY_CODE
/// Decoded steering-wheel key, as carried in byte 0 of the key frame.
///
/// `None` is both "no key" and the release event that follows every press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    None,
    VolUp,
    VolDown,
    HangUp,
    Joker,
    /// Raw code absent from the table; kept for diagnostics only.
    Unknown(u8),
}

impl KeyCode {
    /// Map a raw bus code through the key table. Unmapped codes become `Unknown`.
    pub fn from_raw(raw: u8) -> Self {
        KEY_CODE_TABLE
            .iter()
            .find(|(code, _)| *code == raw)
            .map(|(_, key)| *key)
            .unwrap_or(KeyCode::Unknown(raw))
    }

    /// Raw bus code for this key.
    pub fn raw(&self) -> u8 {
        match self {
            KeyCode::Unknown(raw) => *raw,
            key => KEY_CODE_TABLE
                .iter()
                .find(|(_, entry)| entry == key)
                .map(|(code, _)| *code)
                // The build script rejects manifests missing a known key.
                .unwrap_or_default(),
        }
    }

    /// Key bound to a serial console shortcut, if any.
    pub fn from_console(byte: u8) -> Option<Self> {
        CONSOLE_KEY_TABLE
            .iter()
            .find(|(shortcut, _)| *shortcut == byte)
            .map(|(_, key)| *key)
    }

    /// Level emitted when this key is released before the long-press threshold.
    pub fn short_level(&self) -> Option<ResistanceLevel> {
        match self {
            KeyCode::HangUp => Some(ResistanceLevel::HangUpShort),
            KeyCode::Joker => Some(ResistanceLevel::JokerShort),
            _ => None,
        }
    }

    /// Level emitted once this key has been held past the long-press threshold.
    pub fn long_level(&self) -> Option<ResistanceLevel> {
        match self {
            KeyCode::HangUp => Some(ResistanceLevel::HangUpLong),
            KeyCode::Joker => Some(ResistanceLevel::JokerLong),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::None => f.write_str("None"),
            KeyCode::VolUp => f.write_str("VolUp"),
            KeyCode::VolDown => f.write_str("VolDown"),
            KeyCode::HangUp => f.write_str("HangUp"),
            KeyCode::Joker => f.write_str("Joker"),
            KeyCode::Unknown(raw) => write!(f, "Unknown({})", raw),
        }
    }
}

//==================================================================================RESISTANCE_LEVEL
/// Position on the emulated resistor ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResistanceLevel {
    /// Rest position: no button pressed.
    NoKey,
    VolUp,
    VolDown,
    HangUpShort,
    HangUpLong,
    JokerShort,
    JokerLong,
}

impl ResistanceLevel {
    /// Resistance the potentiometer must present for this level.
    pub fn ohms(&self) -> u32 {
        RESISTANCE_TABLE
            .iter()
            .find(|(level, _)| level == self)
            .map(|(_, ohms)| *ohms)
            // The build script rejects manifests missing a level; full scale is the rest value.
            .unwrap_or(POTENTIOMETER_MAX_OHMS)
    }
}

impl fmt::Display for ResistanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResistanceLevel::NoKey => "NoKey",
            ResistanceLevel::VolUp => "VolUp",
            ResistanceLevel::VolDown => "VolDown",
            ResistanceLevel::HangUpShort => "HangUpShort",
            ResistanceLevel::HangUpLong => "HangUpLong",
            ResistanceLevel::JokerShort => "JokerShort",
            ResistanceLevel::JokerLong => "JokerLong",
        };
        write!(f, "{} ({} ohm)", name, self.ohms())
    }
}

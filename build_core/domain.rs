use crate::build_core::conf::{KNOWN_KEYS, KNOWN_LEVELS, MAX_STANDARD_CAN_ID};
use crate::build_core::errors::BuildError;
use serde::Deserialize;
use std::collections::HashSet;

//==================================================================================MANIFEST
// Structures to deserialize `key_manifest.json`.
// The manifest describes one vehicle: which CAN id carries the steering-wheel
// keys, how raw codes map onto keys and which resistance each level drives.
#[derive(Debug, Deserialize)]
/// Vehicle key manifest.
pub(crate) struct Manifest {
    /// Standard CAN identifier of the steering-wheel key frame.
    pub(crate) message_id: u32,
    /// Full-scale value of the potentiometer.
    pub(crate) potentiometer_max_ohms: u32,
    pub(crate) keys: Vec<KeyEntry>,
    pub(crate) levels: Vec<LevelEntry>,
}

#[derive(Debug, Deserialize)]
/// Raw CAN code (and optional serial console shortcut) for one key.
pub(crate) struct KeyEntry {
    pub(crate) key: String,
    pub(crate) code: u8,
    pub(crate) console: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Resistance emulated for one ladder level.
pub(crate) struct LevelEntry {
    pub(crate) level: String,
    pub(crate) ohms: u32,
}

//==================================================================================VALIDATION
impl Manifest {
    /// Reject manifests the runtime could not honour.
    ///
    /// Every known key and level must appear exactly once, raw codes and console
    /// shortcuts must be unique, and every resistance must be reachable by the
    /// potentiometer.
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        if self.message_id > MAX_STANDARD_CAN_ID {
            return Err(BuildError::MessageIdRange {
                id: self.message_id,
            });
        }

        for entry in &self.keys {
            if !KNOWN_KEYS.contains(&entry.key.as_str()) {
                return Err(BuildError::UnknownName {
                    kind: "key",
                    name: entry.key.clone(),
                });
            }
        }
        for &known in KNOWN_KEYS {
            let count = self.keys.iter().filter(|k| k.key == known).count();
            if count != 1 {
                return Err(BuildError::Cardinality {
                    kind: "key",
                    name: known,
                    count,
                });
            }
        }

        let mut codes = HashSet::new();
        let mut shortcuts = HashSet::new();
        for entry in &self.keys {
            if !codes.insert(entry.code) {
                return Err(BuildError::Duplicate {
                    kind: "raw code",
                    value: entry.code.to_string(),
                });
            }
            if let Some(byte) = entry.console_byte()? {
                if !shortcuts.insert(byte) {
                    return Err(BuildError::Duplicate {
                        kind: "console shortcut",
                        value: (byte as char).to_string(),
                    });
                }
            }
        }

        for entry in &self.levels {
            if !KNOWN_LEVELS.contains(&entry.level.as_str()) {
                return Err(BuildError::UnknownName {
                    kind: "level",
                    name: entry.level.clone(),
                });
            }
            if entry.ohms > self.potentiometer_max_ohms {
                return Err(BuildError::OhmsRange {
                    level: entry.level.clone(),
                    ohms: entry.ohms,
                    max: self.potentiometer_max_ohms,
                });
            }
        }
        for &known in KNOWN_LEVELS {
            let count = self.levels.iter().filter(|l| l.level == known).count();
            if count != 1 {
                return Err(BuildError::Cardinality {
                    kind: "level",
                    name: known,
                    count,
                });
            }
        }

        Ok(())
    }
}

impl KeyEntry {
    /// Console shortcut as a single ASCII alphanumeric byte.
    pub(crate) fn console_byte(&self) -> Result<Option<u8>, BuildError> {
        match &self.console {
            None => Ok(None),
            Some(value) if value.len() == 1 && value.as_bytes()[0].is_ascii_alphanumeric() => {
                Ok(Some(value.as_bytes()[0]))
            }
            Some(value) => Err(BuildError::ConsoleShortcut {
                key: self.key.clone(),
                value: value.clone(),
            }),
        }
    }
}

//! Generate the key lookup tables from a validated manifest.
use super::domain::*;
use super::errors::*;

use std::fmt::Write;

/// Emit the Rust source included by `protocol::keys`.
///
/// The generated items reference `KeyCode` and `ResistanceLevel`, so the output
/// must be included from the module that declares both.
pub(crate) fn run_keymap_gen(manifest: &Manifest) -> Result<String, BuildError> {
    let mut buffer = String::new();

    writeln!(buffer, "// @generated by build.rs from the key manifest.")?;
    writeln!(buffer)?;
    writeln!(
        buffer,
        "/// Standard CAN identifier carrying the steering-wheel key frames."
    )?;
    writeln!(
        buffer,
        "pub const STEERING_WHEEL_KEYS_ID: u32 = {:#05X};",
        manifest.message_id
    )?;
    writeln!(buffer)?;
    writeln!(buffer, "/// Full-scale value of the potentiometer, in ohms.")?;
    writeln!(
        buffer,
        "pub const POTENTIOMETER_MAX_OHMS: u32 = {};",
        manifest.potentiometer_max_ohms
    )?;
    writeln!(buffer)?;

    //======================Raw CAN code -> key
    writeln!(
        buffer,
        "pub(crate) const KEY_CODE_TABLE: [(u8, KeyCode); {}] = [",
        manifest.keys.len()
    )?;
    for entry in &manifest.keys {
        writeln!(buffer, "\t({}, KeyCode::{}),", entry.code, entry.key)?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;

    //======================Console shortcut -> key
    let mut shortcuts = Vec::new();
    for entry in &manifest.keys {
        if let Some(byte) = entry.console_byte()? {
            shortcuts.push((byte, entry.key.as_str()));
        }
    }
    writeln!(
        buffer,
        "pub(crate) const CONSOLE_KEY_TABLE: [(u8, KeyCode); {}] = [",
        shortcuts.len()
    )?;
    for (byte, key) in &shortcuts {
        writeln!(buffer, "\t(b'{}', KeyCode::{}),", *byte as char, key)?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;

    //======================Level -> ohms
    writeln!(
        buffer,
        "pub(crate) const RESISTANCE_TABLE: [(ResistanceLevel, u32); {}] = [",
        manifest.levels.len()
    )?;
    for entry in &manifest.levels {
        writeln!(
            buffer,
            "\t(ResistanceLevel::{}, {}),",
            entry.level, entry.ohms
        )?;
    }
    writeln!(buffer, "];")?;

    Ok(buffer)
}

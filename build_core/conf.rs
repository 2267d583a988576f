//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Key manifest shipped with the crate.
pub(crate) const KEY_MANIFEST_PATH: &str = "build_core/var/key_manifest.json";
/// Environment variable pointing at a vehicle-specific manifest.
pub(crate) const KEY_MANIFEST_ENV: &str = "SWC_LADDER_KEYMAP_PATH";
/// Generated key map file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_KEYMAP_FILE_NAME: &str = "generated_keymap.rs";
/// Highest 11-bit (standard) CAN identifier.
pub(crate) const MAX_STANDARD_CAN_ID: u32 = 0x7FF;
/// Key variants the interpreter understands, in declaration order.
pub(crate) const KNOWN_KEYS: &[&str] = &["None", "VolUp", "VolDown", "HangUp", "Joker"];
/// Resistance levels the interpreter can emit, in declaration order.
pub(crate) const KNOWN_LEVELS: &[&str] = &[
    "NoKey",
    "VolUp",
    "VolDown",
    "HangUpShort",
    "HangUpLong",
    "JokerShort",
    "JokerLong",
];

//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, validation, code generation).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing the key manifest.
    #[error("[MESSAGE]:Invalid JSON format [Error]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provided path is invalid or missing.
    #[error("[MESSAGE]:Failed to read path. [PATH]:{path}")]
    ReadPath { path: &'static str },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// The message identifier does not fit a standard 11-bit CAN id.
    #[error("[MESSAGE]:Message id out of the 11-bit range [ID]:{id:#X}")]
    MessageIdRange { id: u32 },

    /// A key or level name is not one the interpreter knows.
    #[error("[MESSAGE]:Unknown {kind} name [NAME]:{name}")]
    UnknownName { kind: &'static str, name: String },

    /// A key or level is declared twice, or never.
    #[error("[MESSAGE]:{kind} [NAME]:{name} must appear exactly once, found {count}")]
    Cardinality {
        kind: &'static str,
        name: &'static str,
        count: usize,
    },

    /// Two keys share the same raw code or console character.
    #[error("[MESSAGE]:Duplicate {kind} [VALUE]:{value}")]
    Duplicate { kind: &'static str, value: String },

    /// Console shortcut is not a single ASCII character.
    #[error("[MESSAGE]:Console shortcut must be one ASCII alphanumeric character [KEY]:{key} [VALUE]:{value}")]
    ConsoleShortcut { key: String, value: String },

    /// Level resistance falls outside the potentiometer range.
    #[error("[MESSAGE]:Resistance out of range [LEVEL]:{level} [OHMS]:{ohms} [MAX]:{max}")]
    OhmsRange { level: String, ohms: u32, max: u32 },
}

//! Workspace for the build script: manifest model, validation and code generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_keymap;

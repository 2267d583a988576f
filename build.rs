//! Cargo build script: generates the steering-wheel key map.

mod build_core;
use crate::build_core::{
    conf::*, domain::Manifest, errors::BuildError, gen_keymap::run_keymap_gen,
};

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

// The key map is vehicle data, not logic: raw CAN codes, the message id and the
// resistance ladder live in a JSON manifest and are compiled into const tables
// that `src/protocol/keys` includes. Swapping vehicles means swapping manifests.

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", KEY_MANIFEST_PATH);
    println!("cargo:rerun-if-env-changed={}", KEY_MANIFEST_ENV);

    // 1. Locate the manifest.
    // Priority order:
    //   1. SWC_LADDER_KEYMAP_PATH environment variable (absolute or relative path)
    //   2. Default manifest shipped with the crate
    let default_manifest_path =
        PathBuf::from_str(KEY_MANIFEST_PATH).map_err(|_| BuildError::ReadPath {
            path: KEY_MANIFEST_PATH,
        })?;

    let user_manifest_path = std::env::var(KEY_MANIFEST_ENV).ok().map(PathBuf::from);

    let manifest_path = if let Some(path) = user_manifest_path {
        if path.exists() {
            println!("cargo:warning=Using custom key manifest from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        } else {
            println!(
                "cargo:warning=Custom key manifest path specified but file not found: {:?}",
                path
            );
            println!("cargo:warning=Falling back to the default key manifest");
            default_manifest_path
        }
    } else {
        default_manifest_path
    };

    // 2. Parse and validate.
    let manifest_string =
        fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
            path: manifest_path.to_path_buf(),
            source: e,
        })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;
    manifest.validate()?;

    // 3. Generate and write into `OUT_DIR`.
    let buffer_keymap_code = run_keymap_gen(&manifest)?;

    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let keymap_file_path = PathBuf::from(out_dir_str).join(OUT_DIR_KEYMAP_FILE_NAME);

    fs::write(&keymap_file_path, &buffer_keymap_code).map_err(|e| BuildError::WriteFile {
        path: keymap_file_path,
        source: e,
    })?;

    Ok(())
}

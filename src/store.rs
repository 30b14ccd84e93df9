//! File-backed JSON storage shared by the registry and preset layers.

use std::{fs, io, path::Path};

use log::debug;
use serde::{Serialize, de::DeserializeOwned};

/// Read a JSON file. A missing file is `Ok(None)` so callers can fall back
/// to their defaults; anything else unreadable is an error.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
        Ok(text) => text,
    };
    let value = serde_json::from_str(&text)?;
    Ok(Some(value))
}

pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    debug!("wrote {}", path.display());
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid preset: {0}")]
    InvalidPreset(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Missing routing id: {0}")]
    MissingRoutingId(&'static str),
}

pub type Result<T = ()> = std::result::Result<T, Error>;

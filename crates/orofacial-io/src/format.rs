//! On-disk serialization formats.
//!
//! The format of a file is chosen by its extension. Every read goes through a
//! size check first so a stray multi-gigabyte file is rejected before parsing.

use crate::error::{IoError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// `.json`
    Json,
    /// `.ron`
    Ron,
    /// `.toml`
    Toml,
}

impl FileFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "ron" => Ok(Self::Ron),
            "toml" => Ok(Self::Toml),
            _ => Err(IoError::unsupported_format(extension)),
        }
    }

    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ron => "ron",
            Self::Toml => "toml",
        }
    }

    /// Parse a value from text in this format.
    pub fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let value: T = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Ron => ron::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(value)
    }

    /// Render a value as pretty-printed text in this format.
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?,
            Self::Toml => toml::to_string_pretty(value)?,
        };
        Ok(text)
    }
}

/// Read and parse a file, refusing files over `limit` bytes.
pub fn load_file<T: DeserializeOwned>(path: &Path, limit: u64) -> Result<T> {
    let format = FileFormat::from_path(path)?;

    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(IoError::FileTooLarge { size, limit });
    }

    let content = fs::read_to_string(path)?;
    debug!("Loading {:?} as {:?} ({} bytes)", path, format, size);
    format.deserialize(&content)
}

/// Serialize a value and write it to `path`, format chosen by extension.
pub fn save_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    let text = format.serialize(value)?;
    fs::write(path, text)?;
    debug!("Saved {:?} as {:?}", path, format);
    Ok(())
}

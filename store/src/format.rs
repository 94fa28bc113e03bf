//! Serialization format of schema files, chosen by file extension.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, StoreError};

/// Supported on-disk formats.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use schema_compose_store::DocumentFormat;
///
/// assert_eq!(DocumentFormat::from_path(Path::new("a.json")), Some(DocumentFormat::Json));
/// assert_eq!(DocumentFormat::from_path(Path::new("a.YML")), Some(DocumentFormat::Yaml));
/// assert_eq!(DocumentFormat::from_path(Path::new("a.ecore")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), failing with
    /// [`StoreError::UnsupportedFormat`].
    pub fn require(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| StoreError::UnsupportedFormat(path.to_path_buf()))
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub fn parse<T: DeserializeOwned>(self, raw: &str) -> Result<T> {
        Ok(match self {
            Self::Json => serde_json::from_str(raw)?,
            Self::Yaml => serde_yaml::from_str(raw)?,
        })
    }

    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

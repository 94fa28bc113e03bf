//! Composition configuration file.
//!
//! Every field is optional; an empty file yields the defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! package:
//!   name: composed
//!   ns_prefix: composed
//!   ns_uri: http://composed
//! unknown_class: Unknown
//! widening: always
//! provenance:
//!   enabled: true
//!   directory: provenance/
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use schema_compose_core::{ComposeOptions, DEFAULT_UNKNOWN_CLASS, PackageInfo, WideningPolicy};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where and whether provenance files are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Write one provenance file per source document.
    pub enabled: bool,
    /// Output directory (defaults to the merged schema's directory).
    pub directory: Option<PathBuf>,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
        }
    }
}

/// Top-level composition configuration.
///
/// # Examples
///
/// ```
/// use schema_compose_core::WideningPolicy;
/// use schema_compose_store::ComposeConfig;
///
/// let config: ComposeConfig = serde_yaml::from_str("widening: on_mismatch").unwrap();
/// assert_eq!(config.widening, WideningPolicy::OnMismatch);
/// assert_eq!(config.unknown_class, "Unknown");
/// assert!(config.provenance.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Metadata of the merged package.
    pub package: PackageInfo,
    /// Preferred name of the unknown placeholder class.
    pub unknown_class: String,
    /// Attribute conflict policy.
    pub widening: WideningPolicy,
    /// Provenance output settings.
    pub provenance: ProvenanceConfig,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            package: PackageInfo::default(),
            unknown_class: DEFAULT_UNKNOWN_CLASS.to_string(),
            widening: WideningPolicy::default(),
            provenance: ProvenanceConfig::default(),
        }
    }
}

impl ComposeConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::StoreError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::StoreError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Options handed to the core composer.
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            package: self.package.clone(),
            unknown_class: self.unknown_class.clone(),
            widening: self.widening,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
package:
  name: library
  ns_prefix: lib
  ns_uri: http://example.org/library
unknown_class: Missing
widening: on_mismatch
provenance:
  enabled: false
  directory: prov
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ComposeConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.package.name, "library");
        assert_eq!(config.package.ns_prefix, "lib");
        assert_eq!(config.unknown_class, "Missing");
        assert_eq!(config.widening, WideningPolicy::OnMismatch);
        assert!(!config.provenance.enabled);
        assert_eq!(config.provenance.directory, Some(PathBuf::from("prov")));
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: ComposeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ComposeConfig::default());
        assert_eq!(config.compose_options(), ComposeOptions::default());
    }

    #[test]
    fn test_partial_package_keeps_defaults() {
        let config: ComposeConfig = serde_yaml::from_str("package:\n  name: lib\n").unwrap();
        assert_eq!(config.package.name, "lib");
        assert_eq!(config.package.ns_prefix, "composed");
        assert_eq!(config.package.ns_uri, "http://composed");
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compose.yml");

        let original: ComposeConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        assert_eq!(ComposeConfig::load(&path).unwrap(), original);
    }

    #[test]
    fn test_compose_options() {
        let config: ComposeConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let options = config.compose_options();
        assert_eq!(options.package.ns_uri, "http://example.org/library");
        assert_eq!(options.unknown_class, "Missing");
        assert_eq!(options.widening, WideningPolicy::OnMismatch);
    }
}

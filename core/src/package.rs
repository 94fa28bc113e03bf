use serde::{Deserialize, Serialize};

use crate::ClassDefinition;

/// Package name given to merged schemas by default.
pub const DEFAULT_PACKAGE_NAME: &str = "composed";

/// Namespace metadata of a merged schema.
///
/// # Examples
///
/// ```
/// use schema_compose_core::PackageInfo;
///
/// let info = PackageInfo::default();
/// assert_eq!(info.name, "composed");
/// assert_eq!(info.ns_uri, "http://composed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    /// Package name.
    pub name: String,
    /// Namespace prefix.
    pub ns_prefix: String,
    /// Namespace URI.
    pub ns_uri: String,
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            ns_prefix: DEFAULT_PACKAGE_NAME.to_string(),
            ns_uri: format!("http://{DEFAULT_PACKAGE_NAME}"),
        }
    }
}

/// Serializable result of a composition.
///
/// Holds the merged classes in registration order followed by the unknown
/// placeholder when at least one reference was retargeted to it.
///
/// # Examples
///
/// ```
/// use schema_compose_core::*;
///
/// let mut schema = MergedSchema::new(&PackageInfo::default());
/// schema.classes.push(ClassDefinition::new("Person"));
/// schema.classes.push(ClassDefinition::new("Address"));
///
/// assert_eq!(schema.class_count(), 2);
/// assert_eq!(schema.class_names(), vec!["Person", "Address"]);
/// assert!(schema.find_class("Person").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedSchema {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Package name.
    pub name: String,
    /// Namespace prefix.
    pub ns_prefix: String,
    /// Namespace URI.
    pub ns_uri: String,
    /// Merged classes, in first-registration order.
    pub classes: Vec<ClassDefinition>,
}

impl MergedSchema {
    /// Creates an empty schema carrying the given package metadata.
    pub fn new(package: &PackageInfo) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            name: package.name.clone(),
            ns_prefix: package.ns_prefix.clone(),
            ns_uri: package.ns_uri.clone(),
            classes: Vec::new(),
        }
    }

    /// Returns the number of classes in this schema.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Finds a class by exact name.
    pub fn find_class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.name == name)
    }
}

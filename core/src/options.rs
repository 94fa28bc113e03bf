use serde::{Deserialize, Serialize};

use crate::{PackageInfo, TypeRef};

/// Name of the placeholder class for unresolved reference targets.
pub const DEFAULT_UNKNOWN_CLASS: &str = "Unknown";

/// When a re-introduced attribute is widened to `String`.
///
/// # Examples
///
/// ```
/// use schema_compose_core::{PrimitiveType, TypeRef, WideningPolicy};
///
/// let int = TypeRef::Primitive(PrimitiveType::Int);
/// assert!(WideningPolicy::Always.should_widen(&int, &int));
/// assert!(!WideningPolicy::OnMismatch.should_widen(&int, &int));
/// assert!(WideningPolicy::OnMismatch.should_widen(&int, &TypeRef::string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WideningPolicy {
    /// Every same-named attribute widens the existing one, whatever the types.
    #[default]
    Always,
    /// Widen only when the declared types differ.
    OnMismatch,
}

impl WideningPolicy {
    pub fn should_widen(self, existing: &TypeRef, incoming: &TypeRef) -> bool {
        match self {
            Self::Always => true,
            Self::OnMismatch => existing != incoming,
        }
    }
}

/// Settings for a composition run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeOptions {
    /// Metadata of the merged package.
    pub package: PackageInfo,
    /// Preferred name of the unknown placeholder class.
    pub unknown_class: String,
    /// Attribute conflict policy.
    pub widening: WideningPolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            package: PackageInfo::default(),
            unknown_class: DEFAULT_UNKNOWN_CLASS.to_string(),
            widening: WideningPolicy::default(),
        }
    }
}

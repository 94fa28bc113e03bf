//! Structural checks for source documents and merged schemas.
//!
//! Composition never calls these on its own: merging tolerates anything it
//! can merge. They back the CLI `validate` command and let callers assert
//! the invariants a composition guarantees (unique class names, unique
//! attribute names per class, no dangling class-typed references).
//!
//! # Examples
//!
//! ```
//! use schema_compose_core::*;
//!
//! let classes = vec![
//!     ClassDefinition::new("Person").with_attribute(Attribute::new("name", PrimitiveType::String)),
//! ];
//! assert!(validate_document(&classes).is_empty());
//!
//! // Invalid: upper bound below lower bound
//! let bad = vec![
//!     ClassDefinition::new("Person")
//!         .with_attribute(Attribute::new("name", PrimitiveType::String).with_bounds(2, 1)),
//! ];
//! assert!(!validate_document(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ClassDefinition, Feature, MergedSchema, UNBOUNDED};

/// Document/schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Class name is empty or whitespace-only.
    #[error("class name cannot be empty")]
    EmptyClassName,
    /// Feature name is empty or whitespace-only.
    #[error("feature name cannot be empty in class {0}")]
    EmptyFeatureName(String),
    /// Two classes share a name.
    #[error("duplicate class: {0}")]
    DuplicateClass(String),
    /// Two attributes of one class share a name.
    #[error("duplicate attribute {attribute} in class {class}")]
    DuplicateAttribute { class: String, attribute: String },
    /// Upper bound is neither unbounded nor at least the lower bound.
    #[error("invalid bounds {lower}..{upper} on {class}.{feature}")]
    InvalidBounds {
        class: String,
        feature: String,
        lower: u32,
        upper: i32,
    },
    /// A class-typed reference names a class missing from the schema.
    #[error("reference {class}.{reference} targets missing class {target}")]
    DanglingReference {
        class: String,
        reference: String,
        target: String,
    },
}

/// Validates the classes of one source document.
///
/// Reports empty names, duplicate class names, duplicate attribute names
/// within a class, and invalid cardinality bounds. References to classes of
/// other documents are legal and not checked.
pub fn validate_document(classes: &[ClassDefinition]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for class in classes {
        if class.name.trim().is_empty() {
            errors.push(ValidationError::EmptyClassName);
        } else if !seen.insert(class.name.as_str()) {
            errors.push(ValidationError::DuplicateClass(class.name.clone()));
        }
        validate_class(class, &mut errors);
    }

    errors
}

/// Validates a merged schema.
///
/// On top of the document checks, every class-typed reference must target a
/// class present in the schema (the unknown placeholder included).
///
/// # Examples
///
/// ```
/// use schema_compose_core::*;
///
/// let mut schema = MergedSchema::new(&PackageInfo::default());
/// schema.classes.push(
///     ClassDefinition::new("Order").with_reference(Reference::new("customer", "Customer")),
/// );
/// let errors = validate_merged(&schema);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DanglingReference { .. })));
/// ```
pub fn validate_merged(schema: &MergedSchema) -> Vec<ValidationError> {
    let mut errors = validate_document(&schema.classes);
    let names: HashSet<&str> = schema.classes.iter().map(|c| c.name.as_str()).collect();

    for class in &schema.classes {
        for reference in class.references() {
            if let Some(target) = reference.target_class() {
                if !names.contains(target) {
                    errors.push(ValidationError::DanglingReference {
                        class: class.name.clone(),
                        reference: reference.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
    }

    errors
}

fn validate_class(class: &ClassDefinition, errors: &mut Vec<ValidationError>) {
    let mut attributes: HashSet<&str> = HashSet::new();

    for feature in &class.features {
        let name = feature.name();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyFeatureName(class.name.clone()));
            continue;
        }

        if let Feature::Attribute(attribute) = feature {
            if !attributes.insert(attribute.name.as_str()) {
                errors.push(ValidationError::DuplicateAttribute {
                    class: class.name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }

        let (lower, upper) = (feature.lower_bound(), feature.upper_bound());
        let valid = upper == UNBOUNDED || (upper >= 0 && upper as u32 >= lower);
        if !valid {
            errors.push(ValidationError::InvalidBounds {
                class: class.name.clone(),
                feature: name.to_string(),
                lower,
                upper,
            });
        }
    }
}

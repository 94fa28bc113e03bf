//! Core model and merge algorithm for composing class schemas.
//!
//! This crate merges several independently authored schema documents into
//! one schema:
//!
//! - [`ClassDefinition`], [`Attribute`], [`Reference`]: the class and
//!   feature model shared by source documents and the merged result.
//! - [`SchemaRegistry`]: insertion-ordered, name-unique store of merged
//!   classes.
//! - [`ClassMerger`]: registers new classes and folds same-named classes
//!   together, widening conflicting attributes to `String`.
//! - [`ReferenceResolver`]: re-points references at canonical classes, or
//!   at an `Unknown` placeholder when the target does not exist.
//! - [`ProvenanceMapping`]: per-document record of where each source class
//!   and attribute ended up.
//! - [`Composer`] / [`compose_documents`]: the two-phase driver.
//!
//! Loading and persisting are abstracted behind [`SchemaLoader`],
//! [`SchemaWriter`] and [`ProvenanceSink`]; file-backed implementations live
//! in the `schema-compose-store` crate.
//!
//! # Example
//!
//! ```
//! use schema_compose_core::*;
//!
//! let orders = SchemaDocument::new("orders").with_class(
//!     ClassDefinition::new("Order")
//!         .with_attribute(Attribute::new("total", PrimitiveType::Double))
//!         .with_reference(Reference::new("customer", "Customer")),
//! );
//!
//! let composition = merge_documents(&[orders], &ComposeOptions::default())
//!     .unwrap()
//!     .unwrap();
//!
//! // Customer is defined nowhere, so the reference targets the placeholder.
//! assert_eq!(composition.schema.class_names(), vec!["Order", "Unknown"]);
//! assert!(validate_merged(&composition.schema).is_empty());
//! ```

mod compose;
mod error;
mod event;
mod merge;
mod options;
mod package;
mod provenance;
mod registry;
mod resolve;
mod types;
mod validate;

/// Version of the merged schema contract (semver).
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

pub use compose::{
    Composer, Composition, DocumentLoader, NoProvenance, ProvenanceSink, SchemaLoader,
    SchemaWriter, compose_documents, merge_documents,
};
pub use error::{BoxError, ComposeError};
pub use event::{ComposeEvent, ComposeStats, EventLog};
pub use merge::{ClassMerger, MergeOutcome};
pub use options::{ComposeOptions, DEFAULT_UNKNOWN_CLASS, WideningPolicy};
pub use package::{DEFAULT_PACKAGE_NAME, MergedSchema, PackageInfo};
pub use provenance::{
    AttributeMapping, AttributeRecord, ClassMapping, ConceptRecord, ProvenanceMapping,
    ProvenanceRecord,
};
pub use registry::{ClassId, FeatureId, SchemaRegistry};
pub use resolve::{ReferenceResolver, Resolution, placeholder_name};
pub use types::*;
pub use validate::{ValidationError, validate_document, validate_merged};

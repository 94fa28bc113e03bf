//! File-backed collaborators for schema composition.
//!
//! This crate plugs JSON/YAML files into the `schema-compose-core`
//! pipeline:
//!
//! - [`FileSchemaLoader`] reads [`SchemaDocument`](schema_compose_core::SchemaDocument)
//!   files.
//! - [`FileSchemaWriter`] writes the merged schema.
//! - [`FileProvenanceSink`] writes one provenance file per source document.
//! - [`ComposeConfig`] loads composition settings from YAML.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use schema_compose_core::Composer;
//! use schema_compose_store::{
//!     ComposeConfig, FileProvenanceSink, FileSchemaLoader, FileSchemaWriter,
//!     collect_document_paths,
//! };
//!
//! let config = ComposeConfig::load("compose.yml").unwrap();
//! let documents = collect_document_paths(&[PathBuf::from("schemas/")]).unwrap();
//!
//! let composer = Composer::new(FileSchemaLoader, FileSchemaWriter::new(), FileProvenanceSink::new())
//!     .with_options(config.compose_options());
//! if let Some(composition) = composer.compose(&documents, Path::new("merged.json")).unwrap() {
//!     println!("merged {} classes", composition.schema.class_count());
//! }
//! ```

mod config;
mod error;
mod format;
mod loader;
mod provenance;
mod writer;

/// File name suffix of provenance files.
pub const PROVENANCE_SUFFIX: &str = ".provenance.json";

pub use config::{ComposeConfig, ProvenanceConfig};
pub use error::{Result, StoreError};
pub use format::DocumentFormat;
pub use loader::{FileSchemaLoader, collect_document_paths};
pub use provenance::{FileProvenanceSink, ProvenanceFile, calculate_checksum};
pub use writer::FileSchemaWriter;

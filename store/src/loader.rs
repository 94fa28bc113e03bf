//! Reading schema documents from disk.
//!
//! [`FileSchemaLoader`] implements the core [`SchemaLoader`] contract for
//! JSON and YAML [`SchemaDocument`] files, and [`collect_document_paths`]
//! turns a mix of files and directories into the ordered document list a
//! composition consumes.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use schema_compose_store::{FileSchemaLoader, collect_document_paths};
//!
//! let paths = collect_document_paths(&[PathBuf::from("schemas/")]).unwrap();
//! for path in &paths {
//!     let doc = FileSchemaLoader::read_document(path).unwrap();
//!     println!("{}: {} classes", path.display(), doc.classes.len());
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use schema_compose_core::{ClassDefinition, SchemaDocument, SchemaLoader};
use tracing::debug;

use crate::PROVENANCE_SUFFIX;
use crate::error::{Result, StoreError};
use crate::format::DocumentFormat;

/// Loads [`SchemaDocument`] files, picking the format from the extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSchemaLoader;

impl FileSchemaLoader {
    /// Reads and parses a whole document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedFormat`] for unknown extensions,
    /// [`StoreError::IoError`] if the file cannot be read, or a
    /// JSON/YAML error if parsing fails.
    pub fn read_document(path: &Path) -> Result<SchemaDocument> {
        let format = DocumentFormat::require(path)?;
        let raw = fs::read_to_string(path)?;
        let document: SchemaDocument = format.parse(&raw)?;
        debug!(
            path = %path.display(),
            classes = document.classes.len(),
            "parsed schema document"
        );
        Ok(document)
    }
}

impl SchemaLoader<PathBuf> for FileSchemaLoader {
    type Error = StoreError;

    fn load(&self, handle: &PathBuf) -> Result<Vec<ClassDefinition>> {
        Self::read_document(handle).map(|document| document.classes)
    }

    fn describe(&self, handle: &PathBuf) -> String {
        handle.display().to_string()
    }
}

/// Expands inputs into an ordered, de-duplicated list of document files.
///
/// Files keep the order they were given in, since merge order decides which
/// document defines a class first. Directories contribute their `.json`,
/// `.yaml` and `.yml` entries in sorted order, skipping provenance files.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] for an empty input list or a missing
/// path, and [`StoreError::UnsupportedFormat`] for a file with an unknown
/// extension.
pub fn collect_document_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(StoreError::InvalidInput(
            "no schema documents were provided".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                let is_provenance = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(PROVENANCE_SUFFIX));
                if path.is_file() && !is_provenance && DocumentFormat::from_path(&path).is_some() {
                    entries.push(path);
                }
            }
            entries.sort();
            for path in entries {
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
            continue;
        }

        if input.is_file() {
            DocumentFormat::require(input)?;
            if seen.insert(input.clone()) {
                paths.push(input.clone());
            }
            continue;
        }

        return Err(StoreError::InvalidInput(format!(
            "schema path '{}' does not exist",
            input.display()
        )));
    }

    Ok(paths)
}

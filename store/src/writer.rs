//! Merged schema output files.

use std::fs;
use std::path::Path;

use schema_compose_core::{MergedSchema, SchemaWriter};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::format::DocumentFormat;

/// Writes merged schemas as pretty-printed JSON or YAML.
///
/// The format follows the destination's extension unless one is forced with
/// [`with_format`](Self::with_format). Missing parent directories are
/// created.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSchemaWriter {
    format: Option<DocumentFormat>,
}

impl FileSchemaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }
}

impl SchemaWriter<Path> for FileSchemaWriter {
    type Error = StoreError;

    fn write(&self, schema: &MergedSchema, destination: &Path) -> Result<()> {
        let format = match self.format {
            Some(format) => format,
            None => DocumentFormat::require(destination)?,
        };
        let raw = format.render(schema)?;
        write_file(destination, &raw)?;
        info!(
            path = %destination.display(),
            classes = schema.class_count(),
            "merged schema written"
        );
        Ok(())
    }

    fn describe(&self, destination: &Path) -> String {
        destination.display().to_string()
    }
}

/// Writes `contents`, creating parent directories first.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    let wrap = |source| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
    }
    fs::write(path, contents).map_err(wrap)
}

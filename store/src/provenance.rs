//! Provenance files written next to a merged schema.
//!
//! One JSON file per source document, named
//! `<merged-stem>.<document-stem>.provenance.json`. Besides the class and
//! attribute correspondences, each file carries a SHA-256 digest of the
//! source document so a stale mapping can be detected later.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use schema_compose_core::{AttributeRecord, ConceptRecord, ProvenanceRecord, ProvenanceSink};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::PROVENANCE_SUFFIX;
use crate::error::{Result, StoreError};
use crate::writer::write_file;

/// On-disk provenance of one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceFile {
    /// Source document path.
    pub document: String,
    /// SHA-256 hex digest of the source document, when it was readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_sha256: Option<String>,
    /// Path of the merged schema file.
    pub merged_path: String,
    /// Name of the merged package.
    pub merged_schema: String,
    /// ISO-8601 timestamp of when this file was written.
    pub generated_at: String,
    pub concepts: Vec<ConceptRecord>,
    pub attributes: Vec<AttributeRecord>,
}

impl ProvenanceFile {
    /// Reads a provenance file back.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Computes the SHA-256 hex digest of a file.
///
/// # Errors
///
/// Returns [`StoreError::IoError`] if the file cannot be read.
pub fn calculate_checksum(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let hash = Sha256::digest(&bytes);
    Ok(format!("{:x}", hash))
}

/// Writes one [`ProvenanceFile`] per recorded document.
///
/// Files land in the merged schema's directory unless a directory is set.
/// When two documents of one composition share a file stem, later files get
/// a `-2`, `-3`, ... suffix instead of overwriting earlier ones. Each new
/// composition starts over, so rerunning into the same destination replaces
/// the previous run's files.
#[derive(Debug, Default)]
pub struct FileProvenanceSink {
    directory: Option<PathBuf>,
    written: RefCell<HashSet<PathBuf>>,
}

impl FileProvenanceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Paths written by the current composition.
    pub fn written(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.written.borrow().iter().cloned().collect();
        paths.sort();
        paths
    }

    fn target_path(&self, document: &str, destination: &Path) -> PathBuf {
        let directory = self
            .directory
            .clone()
            .or_else(|| destination.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let merged_stem = stem_of(destination, "composed");
        let document_stem = stem_of(Path::new(document), "document");

        let written = self.written.borrow();
        let mut candidate = directory.join(format!("{merged_stem}.{document_stem}{PROVENANCE_SUFFIX}"));
        let mut n = 2;
        while written.contains(&candidate) {
            candidate =
                directory.join(format!("{merged_stem}.{document_stem}-{n}{PROVENANCE_SUFFIX}"));
            n += 1;
        }
        candidate
    }
}

fn stem_of(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

impl ProvenanceSink<Path> for FileProvenanceSink {
    type Error = StoreError;

    fn begin(&self, _destination: &Path) -> Result<()> {
        self.written.borrow_mut().clear();
        Ok(())
    }

    fn record(&self, record: &ProvenanceRecord, destination: &Path) -> Result<()> {
        let document_sha256 = match calculate_checksum(&record.document) {
            Ok(digest) => Some(digest),
            Err(err) => {
                warn!(document = %record.document, error = %err, "cannot checksum source document");
                None
            }
        };

        let file = ProvenanceFile {
            document: record.document.clone(),
            document_sha256,
            merged_path: destination.display().to_string(),
            merged_schema: record.merged_schema.clone(),
            generated_at: Utc::now().to_rfc3339(),
            concepts: record.concepts.clone(),
            attributes: record.attributes.clone(),
        };

        let path = self.target_path(&record.document, destination);
        write_file(&path, &serde_json::to_string_pretty(&file)?)?;
        debug!(path = %path.display(), document = %record.document, "provenance written");
        self.written.borrow_mut().insert(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(document: &str) -> ProvenanceRecord {
        ProvenanceRecord {
            document: document.to_string(),
            merged_schema: "composed".into(),
            concepts: vec![ConceptRecord {
                source: "Person".into(),
                merged: "Person".into(),
            }],
            attributes: Vec::new(),
        }
    }

    #[test]
    fn test_file_is_named_after_both_stems() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("people.json");
        std::fs::write(&source, "{}").unwrap();
        let merged = dir.path().join("merged.json");

        let sink = FileProvenanceSink::new();
        sink.record(&record(&source.display().to_string()), &merged)
            .unwrap();

        let expected = dir.path().join("merged.people.provenance.json");
        assert_eq!(sink.written(), vec![expected.clone()]);
        let file = ProvenanceFile::load(&expected).unwrap();
        assert_eq!(file.concepts.len(), 1);
        assert_eq!(
            file.document_sha256.as_deref(),
            Some(calculate_checksum(&source).unwrap().as_str())
        );
    }

    #[test]
    fn test_same_stem_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let merged = dir.path().join("merged.json");
        let sink = FileProvenanceSink::new().with_directory(dir.path().join("prov"));

        sink.record(&record("a/model.json"), &merged).unwrap();
        sink.record(&record("b/model.yaml"), &merged).unwrap();

        assert_eq!(
            sink.written(),
            vec![
                dir.path().join("prov/merged.model-2.provenance.json"),
                dir.path().join("prov/merged.model.provenance.json"),
            ]
        );
    }

    #[test]
    fn test_new_run_replaces_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let merged = dir.path().join("merged.json");
        let sink = FileProvenanceSink::new();

        sink.record(&record("model.json"), &merged).unwrap();
        sink.begin(&merged).unwrap();
        sink.record(&record("model.json"), &merged).unwrap();

        assert_eq!(
            sink.written(),
            vec![dir.path().join("merged.model.provenance.json")]
        );
        assert!(!dir.path().join("merged.model-2.provenance.json").exists());
    }

    #[test]
    fn test_missing_source_has_no_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let merged = dir.path().join("merged.json");
        let sink = FileProvenanceSink::new();
        sink.record(&record("gone.json"), &merged).unwrap();

        let file = ProvenanceFile::load(dir.path().join("merged.gone.provenance.json")).unwrap();
        assert!(file.document_sha256.is_none());
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(
            calculate_checksum(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

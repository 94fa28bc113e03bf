//! Per-document record of how source elements map onto the merged schema.
//!
//! A [`ProvenanceMapping`] stores merged-side handles rather than copies, so
//! an entry keeps pointing at the same merged attribute even after that
//! attribute's type is widened by a later document. Once a composition is
//! finished, [`ProvenanceMapping::to_record`] resolves the handles into a
//! serializable [`ProvenanceRecord`].

use serde::{Deserialize, Serialize};

use crate::{ClassId, FeatureId, MergedSchema};

/// Source class → merged class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassMapping<'a> {
    pub source: &'a str,
    pub merged: ClassId,
}

/// Source attribute → merged attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMapping<'a> {
    pub source_class: &'a str,
    pub source_attribute: &'a str,
    pub merged: FeatureId,
}

#[derive(Debug, Clone)]
struct ClassEntry {
    source: String,
    merged: ClassId,
}

#[derive(Debug, Clone)]
struct AttributeEntry {
    source_class: String,
    source_attribute: String,
    merged: FeatureId,
}

/// Correspondences established for one source document.
///
/// Entries are append-only and kept in the order they were recorded.
#[derive(Debug, Clone)]
pub struct ProvenanceMapping {
    document: String,
    classes: Vec<ClassEntry>,
    attributes: Vec<AttributeEntry>,
}

impl ProvenanceMapping {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Label of the source document this mapping belongs to.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn record_class(&mut self, source: &str, merged: ClassId) {
        self.classes.push(ClassEntry {
            source: source.to_string(),
            merged,
        });
    }

    pub fn record_attribute(&mut self, source_class: &str, source_attribute: &str, merged: FeatureId) {
        self.attributes.push(AttributeEntry {
            source_class: source_class.to_string(),
            source_attribute: source_attribute.to_string(),
            merged,
        });
    }

    pub fn class_mappings(&self) -> impl Iterator<Item = ClassMapping<'_>> {
        self.classes.iter().map(|entry| ClassMapping {
            source: &entry.source,
            merged: entry.merged,
        })
    }

    pub fn attribute_mappings(&self) -> impl Iterator<Item = AttributeMapping<'_>> {
        self.attributes.iter().map(|entry| AttributeMapping {
            source_class: &entry.source_class,
            source_attribute: &entry.source_attribute,
            merged: entry.merged,
        })
    }

    /// Merged class the named source class was mapped to.
    pub fn merged_class(&self, source: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| entry.merged)
    }

    /// Merged attribute the named source attribute was mapped to.
    pub fn merged_attribute(&self, source_class: &str, source_attribute: &str) -> Option<FeatureId> {
        self.attributes
            .iter()
            .find(|entry| {
                entry.source_class == source_class && entry.source_attribute == source_attribute
            })
            .map(|entry| entry.merged)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.attributes.is_empty()
    }

    /// Resolves merged handles against the finished schema.
    ///
    /// Class handles index directly into `schema.classes`, which holds the
    /// registry contents in registration order.
    pub fn to_record(&self, schema: &MergedSchema) -> ProvenanceRecord {
        let concepts = self
            .classes
            .iter()
            .filter_map(|entry| {
                let merged = schema.classes.get(entry.merged.index())?;
                Some(ConceptRecord {
                    source: entry.source.clone(),
                    merged: merged.name.clone(),
                })
            })
            .collect();

        let attributes = self
            .attributes
            .iter()
            .filter_map(|entry| {
                let class = schema.classes.get(entry.merged.class.index())?;
                let feature = class.features.get(entry.merged.index)?;
                Some(AttributeRecord {
                    source_class: entry.source_class.clone(),
                    source_attribute: entry.source_attribute.clone(),
                    merged_class: class.name.clone(),
                    merged_attribute: feature.name().to_string(),
                })
            })
            .collect();

        ProvenanceRecord {
            document: self.document.clone(),
            merged_schema: schema.name.clone(),
            concepts,
            attributes,
        }
    }
}

/// Class correspondence by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub source: String,
    pub merged: String,
}

/// Attribute correspondence by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub source_class: String,
    pub source_attribute: String,
    pub merged_class: String,
    pub merged_attribute: String,
}

/// Serializable provenance of one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    /// Source document label.
    pub document: String,
    /// Name of the merged package.
    pub merged_schema: String,
    pub concepts: Vec<ConceptRecord>,
    pub attributes: Vec<AttributeRecord>,
}

//! Two-phase composition driver and collaborator contracts.
//!
//! Phase one loads every document in order and runs the [`ClassMerger`] on
//! each class. Phase two resolves all collected references against the
//! complete registry and assembles the [`MergedSchema`]. [`Composer`] adds
//! persistence on top: the merged schema goes to a [`SchemaWriter`], then one
//! [`ProvenanceRecord`] per source document goes to a [`ProvenanceSink`].
//!
//! # Example
//!
//! ```
//! use schema_compose_core::*;
//!
//! let a = SchemaDocument::new("a")
//!     .with_class(ClassDefinition::new("Person").with_attribute(Attribute::new("name", PrimitiveType::Int)));
//! let b = SchemaDocument::new("b").with_class(
//!     ClassDefinition::new("Person")
//!         .with_attribute(Attribute::new("name", PrimitiveType::String))
//!         .with_reference(Reference::new("address", "Address")),
//! );
//! let c = SchemaDocument::new("c").with_class(ClassDefinition::new("Address"));
//!
//! let composition = merge_documents(&[a, b, c], &ComposeOptions::default())
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(composition.schema.class_names(), vec!["Person", "Address"]);
//! let person = composition.schema.find_class("Person").unwrap();
//! assert_eq!(person.find_attribute("name").unwrap().ty, TypeRef::string());
//! assert_eq!(person.find_reference("address").unwrap().target_class(), Some("Address"));
//! ```

use std::convert::Infallible;

use tracing::info;

use crate::error::{ComposeError, Result};
use crate::{
    ClassDefinition, ClassMerger, ComposeEvent, ComposeOptions, ComposeStats, EventLog,
    MergedSchema, ProvenanceMapping, ProvenanceRecord, ReferenceResolver, SchemaDocument,
    SchemaRegistry,
};

/// Reads the classes of a source document.
///
/// Loading is all-or-nothing: a document either yields all of its classes,
/// in document order, or an error.
pub trait SchemaLoader<H: ?Sized> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self, handle: &H) -> std::result::Result<Vec<ClassDefinition>, Self::Error>;

    /// Human-readable label used in provenance and error messages.
    fn describe(&self, handle: &H) -> String;
}

/// Persists a merged schema.
pub trait SchemaWriter<D: ?Sized> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write(&self, schema: &MergedSchema, destination: &D) -> std::result::Result<(), Self::Error>;

    /// Human-readable label of `destination` used in error messages.
    fn describe(&self, destination: &D) -> String;
}

/// Persists the provenance of one source document.
///
/// Invoked once per document, after the merged schema was written to the
/// same destination. [`begin`](Self::begin) runs once per composition before
/// the first record.
pub trait ProvenanceSink<D: ?Sized> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Starts a new composition into `destination`.
    fn begin(&self, _destination: &D) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    fn record(
        &self,
        record: &ProvenanceRecord,
        destination: &D,
    ) -> std::result::Result<(), Self::Error>;
}

/// Loader for documents that are already in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl SchemaLoader<SchemaDocument> for DocumentLoader {
    type Error = Infallible;

    fn load(&self, handle: &SchemaDocument) -> std::result::Result<Vec<ClassDefinition>, Infallible> {
        Ok(handle.classes.clone())
    }

    fn describe(&self, handle: &SchemaDocument) -> String {
        handle
            .name
            .clone()
            .unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// Sink that discards provenance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvenance;

impl<D: ?Sized> ProvenanceSink<D> for NoProvenance {
    type Error = Infallible;

    fn record(&self, _record: &ProvenanceRecord, _destination: &D) -> std::result::Result<(), Infallible> {
        Ok(())
    }
}

/// Everything a composition produced.
#[derive(Debug)]
pub struct Composition {
    /// The merged schema, classes in registration order, placeholder last.
    pub schema: MergedSchema,
    /// One mapping per source document, in input order.
    pub provenance: Vec<ProvenanceMapping>,
    /// Merge and resolution decisions, in the order they were taken.
    pub events: Vec<ComposeEvent>,
}

impl Composition {
    pub fn stats(&self) -> ComposeStats {
        ComposeStats::from_events(&self.events)
    }

    /// Serializable provenance records, one per source document.
    pub fn provenance_records(&self) -> Vec<ProvenanceRecord> {
        self.provenance
            .iter()
            .map(|mapping| mapping.to_record(&self.schema))
            .collect()
    }
}

/// Runs both merge phases over `documents`, without persisting anything.
///
/// Returns `Ok(None)` for an empty document list.
///
/// # Errors
///
/// Returns [`ComposeError::Load`] for the first document that fails to
/// load; no partial result is produced.
pub fn compose_documents<H, L>(
    loader: &L,
    documents: &[H],
    options: &ComposeOptions,
) -> Result<Option<Composition>>
where
    L: SchemaLoader<H>,
{
    if documents.is_empty() {
        info!("no schema documents to compose");
        return Ok(None);
    }

    let mut registry = SchemaRegistry::new();
    let mut merger = ClassMerger::new(options.widening);
    let mut log = EventLog::new();
    let mut provenance = Vec::with_capacity(documents.len());

    for handle in documents {
        let document = loader.describe(handle);
        let classes = loader
            .load(handle)
            .map_err(|source| ComposeError::Load {
                document: document.clone(),
                source: Box::new(source),
            })?;
        log.emit(ComposeEvent::DocumentLoaded {
            document: document.clone(),
            classes: classes.len(),
        });

        let mut mapping = ProvenanceMapping::new(document);
        for class in &classes {
            merger.merge(&mut registry, class, &mut mapping, &mut log)?;
        }
        provenance.push(mapping);
    }

    let pending = merger.into_pending();
    let mut resolver = ReferenceResolver::new(&registry, &options.unknown_class);
    resolver.resolve(&mut registry, &pending, &mut log);

    let mut schema = MergedSchema::new(&options.package);
    schema.classes = registry.into_classes();
    let references = resolver.placeholder_uses();
    if let Some(placeholder) = resolver.into_placeholder() {
        log.emit(ComposeEvent::PlaceholderAdded {
            name: placeholder.name.clone(),
            references,
        });
        schema.classes.push(placeholder);
    }

    info!(
        documents = documents.len(),
        classes = schema.class_count(),
        "composition finished"
    );
    Ok(Some(Composition {
        schema,
        provenance,
        events: log.into_events(),
    }))
}

/// Composes in-memory documents.
///
/// # Examples
///
/// ```
/// use schema_compose_core::*;
///
/// assert!(merge_documents(&[], &ComposeOptions::default()).unwrap().is_none());
/// ```
pub fn merge_documents(
    documents: &[SchemaDocument],
    options: &ComposeOptions,
) -> Result<Option<Composition>> {
    compose_documents(&DocumentLoader, documents, options)
}

/// Composition pipeline bound to its loader, writer and provenance sink.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::convert::Infallible;
/// use schema_compose_core::*;
///
/// #[derive(Default)]
/// struct Capture(RefCell<Vec<String>>);
///
/// impl SchemaWriter<str> for Capture {
///     type Error = Infallible;
///     fn write(&self, schema: &MergedSchema, destination: &str) -> Result<(), Infallible> {
///         self.0.borrow_mut().push(format!("{destination}: {}", schema.class_count()));
///         Ok(())
///     }
///
///     fn describe(&self, destination: &str) -> String {
///         destination.to_string()
///     }
/// }
///
/// let composer = Composer::new(DocumentLoader, Capture::default(), NoProvenance);
/// let doc = SchemaDocument::new("a").with_class(ClassDefinition::new("Person"));
/// composer.compose(&[doc], "merged").unwrap();
/// assert_eq!(composer.writer().0.borrow().as_slice(), ["merged: 1"]);
/// ```
#[derive(Debug)]
pub struct Composer<L, W, P> {
    loader: L,
    writer: W,
    sink: P,
    options: ComposeOptions,
}

impl<L, W, P> Composer<L, W, P> {
    pub fn new(loader: L, writer: W, sink: P) -> Self {
        Self {
            loader,
            writer,
            sink,
            options: ComposeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Merges `documents` and persists the result to `destination`.
    ///
    /// The merged schema is written first; provenance records follow, one
    /// per document in input order. An empty document list writes nothing
    /// and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`ComposeError::Load`] aborts before anything is written.
    /// [`ComposeError::Write`] aborts before any provenance is recorded.
    /// [`ComposeError::Provenance`] aborts the remaining records.
    pub fn compose<H, D>(&self, documents: &[H], destination: &D) -> Result<Option<Composition>>
    where
        D: ?Sized,
        L: SchemaLoader<H>,
        W: SchemaWriter<D>,
        P: ProvenanceSink<D>,
    {
        let Some(composition) = compose_documents(&self.loader, documents, &self.options)? else {
            return Ok(None);
        };

        self.writer
            .write(&composition.schema, destination)
            .map_err(|source| ComposeError::Write {
                destination: self.writer.describe(destination),
                source: Box::new(source),
            })?;

        self.sink
            .begin(destination)
            .map_err(|source| ComposeError::Provenance {
                document: self.writer.describe(destination),
                source: Box::new(source),
            })?;
        for mapping in &composition.provenance {
            let record = mapping.to_record(&composition.schema);
            self.sink
                .record(&record, destination)
                .map_err(|source| ComposeError::Provenance {
                    document: mapping.document().to_string(),
                    source: Box::new(source),
                })?;
        }

        Ok(Some(composition))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::{Attribute, FeatureId, PrimitiveType, Reference, TypeRef, WideningPolicy};

    #[derive(Debug, thiserror::Error)]
    #[error("document not found: {0}")]
    struct NotFound(String);

    #[derive(Default)]
    struct MapLoader(HashMap<&'static str, Vec<ClassDefinition>>);

    impl SchemaLoader<&'static str> for MapLoader {
        type Error = NotFound;

        fn load(&self, handle: &&'static str) -> std::result::Result<Vec<ClassDefinition>, NotFound> {
            self.0
                .get(handle)
                .cloned()
                .ok_or_else(|| NotFound(handle.to_string()))
        }

        fn describe(&self, handle: &&'static str) -> String {
            handle.to_string()
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[derive(Default)]
    struct RecordingWriter {
        fail: bool,
        written: RefCell<Vec<MergedSchema>>,
    }

    impl SchemaWriter<str> for RecordingWriter {
        type Error = DiskFull;

        fn write(&self, schema: &MergedSchema, _destination: &str) -> std::result::Result<(), DiskFull> {
            if self.fail {
                return Err(DiskFull);
            }
            self.written.borrow_mut().push(schema.clone());
            Ok(())
        }

        fn describe(&self, destination: &str) -> String {
            destination.to_string()
        }
    }

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<ProvenanceRecord>>);

    impl ProvenanceSink<str> for RecordingSink {
        type Error = Infallible;

        fn record(&self, record: &ProvenanceRecord, _destination: &str) -> std::result::Result<(), Infallible> {
            self.0.borrow_mut().push(record.clone());
            Ok(())
        }
    }

    fn person_scenario() -> Vec<SchemaDocument> {
        vec![
            SchemaDocument::new("a").with_class(
                ClassDefinition::new("Person").with_attribute(Attribute::new("name", PrimitiveType::Int)),
            ),
            SchemaDocument::new("b").with_class(
                ClassDefinition::new("Person")
                    .with_attribute(Attribute::new("name", PrimitiveType::String))
                    .with_reference(Reference::new("address", "Address")),
            ),
            SchemaDocument::new("c").with_class(ClassDefinition::new("Address")),
        ]
    }

    #[test]
    fn test_person_address_scenario() {
        let composition = merge_documents(&person_scenario(), &ComposeOptions::default())
            .unwrap()
            .unwrap();

        let schema = &composition.schema;
        assert_eq!(schema.class_names(), vec!["Person", "Address"]);
        let person = schema.find_class("Person").unwrap();
        assert_eq!(person.features.len(), 2);
        assert_eq!(person.find_attribute("name").unwrap().ty, TypeRef::string());
        assert_eq!(
            person.find_reference("address").unwrap().target_class(),
            Some("Address")
        );
        assert!(schema.find_class("Address").unwrap().features.is_empty());
        assert!(schema.find_class("Unknown").is_none());

        let stats = composition.stats();
        assert_eq!(stats.documents, 3);
        assert_eq!(stats.classes_registered, 2);
        assert_eq!(stats.classes_merged, 1);
        assert_eq!(stats.attributes_widened, 1);
        assert_eq!(stats.references_resolved, 1);
        assert!(!stats.placeholder_used);
    }

    #[test]
    fn test_unresolved_reference_uses_placeholder() {
        let docs = vec![SchemaDocument::new("a").with_class(
            ClassDefinition::new("Order").with_reference(Reference::new("customer", "Customer")),
        )];
        let composition = merge_documents(&docs, &ComposeOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(composition.schema.class_names(), vec!["Order", "Unknown"]);
        let order = composition.schema.find_class("Order").unwrap();
        assert_eq!(
            order.find_reference("customer").unwrap().target_class(),
            Some("Unknown")
        );
        let unknown = composition.schema.find_class("Unknown").unwrap();
        assert!(unknown.features.is_empty());
        assert!(!unknown.is_abstract);
        assert!(composition.stats().placeholder_used);
    }

    #[test]
    fn test_custom_placeholder_name() {
        let docs = vec![SchemaDocument::new("a").with_class(
            ClassDefinition::new("Order").with_reference(Reference::new("customer", "Customer")),
        )];
        let options = ComposeOptions {
            unknown_class: "Missing".into(),
            ..ComposeOptions::default()
        };
        let composition = merge_documents(&docs, &options).unwrap().unwrap();
        assert_eq!(composition.schema.class_names(), vec!["Order", "Missing"]);
    }

    #[test]
    fn test_single_document_is_preserved() {
        let doc = SchemaDocument::new("only")
            .with_class(
                ClassDefinition::new("Person")
                    .with_attribute(Attribute::new("age", PrimitiveType::Int).with_bounds(1, 1))
                    .with_reference(Reference::new("friends", "Person").with_bounds(0, -1)),
            )
            .with_class(ClassDefinition::new("Thing").into_abstract());

        let composition = merge_documents(std::slice::from_ref(&doc), &ComposeOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(composition.schema.classes, doc.classes);
        let stats = composition.stats();
        assert_eq!(stats.attributes_widened, 0);
        assert_eq!(stats.references_unresolved, 0);
    }

    #[test]
    fn test_provenance_survives_later_widening() {
        let composition = merge_documents(&person_scenario(), &ComposeOptions::default())
            .unwrap()
            .unwrap();

        let a = &composition.provenance[0];
        let b = &composition.provenance[1];
        let merged = a.merged_attribute("Person", "name").unwrap();
        assert_eq!(b.merged_attribute("Person", "name"), Some(merged));
        assert_eq!(merged, FeatureId::new(a.merged_class("Person").unwrap(), 0));

        let records = composition.provenance_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].document, "b");
        assert_eq!(records[1].attributes[0].merged_attribute, "name");
        assert_eq!(records[2].concepts[0].merged, "Address");
    }

    #[test]
    fn test_load_failure_aborts_without_output() {
        let mut loader = MapLoader::default();
        loader.0.insert("a", vec![ClassDefinition::new("Person")]);
        let writer = RecordingWriter::default();
        let composer = Composer::new(loader, writer, RecordingSink::default());

        let err = composer.compose(&["a", "missing"], "out").unwrap_err();
        assert!(matches!(err, ComposeError::Load { ref document, .. } if document == "missing"));
        assert!(composer.writer().written.borrow().is_empty());
        assert!(composer.sink().0.borrow().is_empty());
    }

    #[test]
    fn test_write_failure_skips_provenance() {
        let mut loader = MapLoader::default();
        loader.0.insert("a", vec![ClassDefinition::new("Person")]);
        let writer = RecordingWriter {
            fail: true,
            ..RecordingWriter::default()
        };
        let composer = Composer::new(loader, writer, RecordingSink::default());

        let err = composer.compose(&["a"], "out").unwrap_err();
        assert!(matches!(err, ComposeError::Write { ref destination, .. } if destination == "out"));
        assert!(err.to_string().contains("to out: disk full"));
        assert!(composer.sink().0.borrow().is_empty());
    }

    #[test]
    fn test_compose_writes_schema_then_provenance() {
        let composer = Composer::new(DocumentLoader, RecordingWriter::default(), RecordingSink::default())
            .with_options(ComposeOptions {
                widening: WideningPolicy::OnMismatch,
                ..ComposeOptions::default()
            });

        let composition = composer.compose(&person_scenario(), "out").unwrap().unwrap();

        assert_eq!(composer.writer().written.borrow().as_slice(), &[composition.schema.clone()]);
        let documents: Vec<_> = composer
            .sink()
            .0
            .borrow()
            .iter()
            .map(|r| r.document.clone())
            .collect();
        assert_eq!(documents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_document_list_writes_nothing() {
        let composer = Composer::new(DocumentLoader, RecordingWriter::default(), RecordingSink::default());
        let documents: [SchemaDocument; 0] = [];

        assert!(composer.compose(&documents, "out").unwrap().is_none());
        assert!(composer.writer().written.borrow().is_empty());
        assert!(composer.sink().0.borrow().is_empty());
    }
}

//! Diagnostics stream for conflict resolutions during a composition.
//!
//! Merging never reports class clashes, type conflicts or unresolved targets
//! as errors. Each resolution is emitted as a [`ComposeEvent`] instead: it
//! is logged through `tracing` and kept in the [`EventLog`] handed back with
//! the composition.

use tracing::{debug, info, warn};

use crate::TypeRef;

/// A single merge or resolution decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeEvent {
    /// A source document was loaded.
    DocumentLoaded { document: String, classes: usize },
    /// A class name was seen for the first time and copied into the registry.
    ClassRegistered { document: String, class: String },
    /// A class was folded into the already-registered class of that name.
    ClassMerged { document: String, class: String },
    /// An attribute new to the merged class was appended.
    AttributeAdded {
        document: String,
        class: String,
        attribute: String,
    },
    /// An existing attribute's type was replaced with `String`.
    AttributeWidened {
        document: String,
        class: String,
        attribute: String,
        previous: TypeRef,
    },
    /// A same-named attribute was mapped onto the existing one unchanged.
    AttributeMatched {
        document: String,
        class: String,
        attribute: String,
    },
    /// A reference target was re-pointed at the canonical class.
    ReferenceResolved {
        class: String,
        reference: String,
        target: String,
    },
    /// A reference target does not exist and now points at the placeholder.
    ReferenceUnresolved {
        class: String,
        reference: String,
        target: String,
        placeholder: String,
    },
    /// The placeholder class was added to the merged schema.
    PlaceholderAdded { name: String, references: usize },
}

impl ComposeEvent {
    fn log(&self) {
        match self {
            Self::DocumentLoaded { document, classes } => {
                info!(%document, classes, "schema document loaded");
            }
            Self::ClassRegistered { document, class } => {
                debug!(%document, %class, "class registered");
            }
            Self::ClassMerged { document, class } => {
                debug!(%document, %class, "class merged into existing definition");
            }
            Self::AttributeAdded {
                document,
                class,
                attribute,
            } => {
                debug!(%document, %class, %attribute, "attribute added");
            }
            Self::AttributeWidened {
                document,
                class,
                attribute,
                previous,
            } => {
                debug!(%document, %class, %attribute, %previous, "attribute refined to String");
            }
            Self::AttributeMatched {
                document,
                class,
                attribute,
            } => {
                debug!(%document, %class, %attribute, "attribute matched existing definition");
            }
            Self::ReferenceResolved {
                class,
                reference,
                target,
            } => {
                debug!(%class, %reference, %target, "reference re-assigned");
            }
            Self::ReferenceUnresolved {
                class,
                reference,
                target,
                placeholder,
            } => {
                warn!(%class, %reference, %target, %placeholder, "reference with unknown type");
            }
            Self::PlaceholderAdded { name, references } => {
                info!(%name, references, "placeholder class added");
            }
        }
    }
}

/// Collected events of one composition.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ComposeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs the event and appends it to the stream.
    pub fn emit(&mut self, event: ComposeEvent) {
        event.log();
        self.events.push(event);
    }

    pub fn events(&self) -> &[ComposeEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ComposeEvent> {
        self.events
    }
}

/// Per-kind event counts of a composition.
///
/// # Examples
///
/// ```
/// use schema_compose_core::{ComposeEvent, ComposeStats};
///
/// let events = vec![
///     ComposeEvent::ClassRegistered { document: "a".into(), class: "Person".into() },
///     ComposeEvent::ClassMerged { document: "b".into(), class: "Person".into() },
/// ];
/// let stats = ComposeStats::from_events(&events);
/// assert_eq!(stats.classes_registered, 1);
/// assert_eq!(stats.classes_merged, 1);
/// assert!(!stats.placeholder_used);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeStats {
    pub documents: usize,
    pub classes_registered: usize,
    pub classes_merged: usize,
    pub attributes_added: usize,
    pub attributes_widened: usize,
    pub references_resolved: usize,
    pub references_unresolved: usize,
    pub placeholder_used: bool,
}

impl ComposeStats {
    pub fn from_events(events: &[ComposeEvent]) -> Self {
        let mut stats = Self::default();
        for event in events {
            match event {
                ComposeEvent::DocumentLoaded { .. } => stats.documents += 1,
                ComposeEvent::ClassRegistered { .. } => stats.classes_registered += 1,
                ComposeEvent::ClassMerged { .. } => stats.classes_merged += 1,
                ComposeEvent::AttributeAdded { .. } => stats.attributes_added += 1,
                ComposeEvent::AttributeWidened { .. } => stats.attributes_widened += 1,
                ComposeEvent::AttributeMatched { .. } => {}
                ComposeEvent::ReferenceResolved { .. } => stats.references_resolved += 1,
                ComposeEvent::ReferenceUnresolved { .. } => stats.references_unresolved += 1,
                ComposeEvent::PlaceholderAdded { .. } => stats.placeholder_used = true,
            }
        }
        stats
    }
}

//! Class deduplication and attribute reconciliation.
//!
//! When several documents define a class with the same name, the first one
//! processed becomes the canonical definition. [`ClassMerger`] folds later
//! definitions into it: new attributes are appended, same-named attributes
//! are widened to `String` per the [`WideningPolicy`], and references are
//! carried over unchanged and queued for the resolution pass.
//!
//! # Example
//!
//! ```
//! use schema_compose_core::*;
//!
//! let mut registry = SchemaRegistry::new();
//! let mut merger = ClassMerger::new(WideningPolicy::Always);
//! let mut log = EventLog::new();
//!
//! let first = ClassDefinition::new("Person")
//!     .with_attribute(Attribute::new("name", PrimitiveType::Int));
//! let second = ClassDefinition::new("Person")
//!     .with_attribute(Attribute::new("name", PrimitiveType::String))
//!     .with_attribute(Attribute::new("email", PrimitiveType::String));
//!
//! let mut provenance_a = ProvenanceMapping::new("a");
//! let mut provenance_b = ProvenanceMapping::new("b");
//! merger.merge(&mut registry, &first, &mut provenance_a, &mut log).unwrap();
//! merger.merge(&mut registry, &second, &mut provenance_b, &mut log).unwrap();
//!
//! let person = &registry[registry.lookup("Person").unwrap()];
//! assert_eq!(person.find_attribute("name").unwrap().ty, TypeRef::string());
//! assert!(person.find_attribute("email").is_some());
//! ```

use crate::error::Result;
use crate::{
    ClassDefinition, ClassId, ComposeEvent, EventLog, Feature, FeatureId, ProvenanceMapping,
    SchemaRegistry, TypeRef, WideningPolicy,
};

/// Whether an incoming class created or extended a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The class was new and a copy was registered.
    Registered(ClassId),
    /// The class was folded into an existing registry entry.
    Merged(ClassId),
}

impl MergeOutcome {
    pub fn class(self) -> ClassId {
        match self {
            Self::Registered(id) | Self::Merged(id) => id,
        }
    }
}

/// Phase-one merge driver.
///
/// Besides updating the registry, the merger accumulates the handle of every
/// reference it places into the registry. That pending list feeds
/// [`ReferenceResolver::resolve`](crate::ReferenceResolver::resolve) once all
/// documents have been scanned.
#[derive(Debug, Default)]
pub struct ClassMerger {
    policy: WideningPolicy,
    pending: Vec<FeatureId>,
}

impl ClassMerger {
    pub fn new(policy: WideningPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
        }
    }

    /// References queued so far, in encounter order.
    pub fn pending_references(&self) -> &[FeatureId] {
        &self.pending
    }

    pub fn into_pending(self) -> Vec<FeatureId> {
        self.pending
    }

    /// Registers `class` or merges it into the registered class of the same
    /// name, recording provenance for the class and its attributes.
    ///
    /// # Errors
    ///
    /// Only fails with
    /// [`DuplicateRegistration`](crate::ComposeError::DuplicateRegistration),
    /// which indicates a bug in the registration decision.
    pub fn merge(
        &mut self,
        registry: &mut SchemaRegistry,
        class: &ClassDefinition,
        provenance: &mut ProvenanceMapping,
        log: &mut EventLog,
    ) -> Result<MergeOutcome> {
        match registry.lookup(&class.name) {
            None => self.register(registry, class, provenance, log),
            Some(existing) => {
                self.fold_into(registry, existing, class, provenance, log);
                Ok(MergeOutcome::Merged(existing))
            }
        }
    }

    fn register(
        &mut self,
        registry: &mut SchemaRegistry,
        class: &ClassDefinition,
        provenance: &mut ProvenanceMapping,
        log: &mut EventLog,
    ) -> Result<MergeOutcome> {
        let id = registry.register(class.clone())?;
        provenance.record_class(&class.name, id);

        for (index, feature) in class.features.iter().enumerate() {
            let feature_id = FeatureId::new(id, index);
            match feature {
                Feature::Attribute(attribute) => {
                    provenance.record_attribute(&class.name, &attribute.name, feature_id);
                }
                Feature::Reference(_) => self.pending.push(feature_id),
            }
        }

        log.emit(ComposeEvent::ClassRegistered {
            document: provenance.document().to_string(),
            class: class.name.clone(),
        });
        Ok(MergeOutcome::Registered(id))
    }

    fn fold_into(
        &mut self,
        registry: &mut SchemaRegistry,
        id: ClassId,
        class: &ClassDefinition,
        provenance: &mut ProvenanceMapping,
        log: &mut EventLog,
    ) {
        let document = provenance.document().to_string();
        provenance.record_class(&class.name, id);
        log.emit(ComposeEvent::ClassMerged {
            document: document.clone(),
            class: class.name.clone(),
        });

        let existing = &mut registry[id];
        for feature in &class.features {
            match feature {
                Feature::Attribute(attribute) => {
                    let index = match existing.attribute_index(&attribute.name) {
                        None => {
                            existing.features.push(Feature::Attribute(attribute.clone()));
                            log.emit(ComposeEvent::AttributeAdded {
                                document: document.clone(),
                                class: class.name.clone(),
                                attribute: attribute.name.clone(),
                            });
                            existing.features.len() - 1
                        }
                        Some(index) => {
                            if let Some(current) = existing.features[index].as_attribute_mut() {
                                let event = if self.policy.should_widen(&current.ty, &attribute.ty)
                                    && !current.ty.is_string()
                                {
                                    let previous =
                                        std::mem::replace(&mut current.ty, TypeRef::string());
                                    ComposeEvent::AttributeWidened {
                                        document: document.clone(),
                                        class: class.name.clone(),
                                        attribute: attribute.name.clone(),
                                        previous,
                                    }
                                } else {
                                    ComposeEvent::AttributeMatched {
                                        document: document.clone(),
                                        class: class.name.clone(),
                                        attribute: attribute.name.clone(),
                                    }
                                };
                                log.emit(event);
                            }
                            index
                        }
                    };
                    provenance.record_attribute(
                        &class.name,
                        &attribute.name,
                        FeatureId::new(id, index),
                    );
                }
                Feature::Reference(reference) => {
                    existing.features.push(Feature::Reference(reference.clone()));
                    self.pending
                        .push(FeatureId::new(id, existing.features.len() - 1));
                }
            }
        }
    }
}

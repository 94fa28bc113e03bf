//! Second-pass reference re-targeting.
//!
//! References may point at classes defined by documents processed later, so
//! targets are only rewritten once the registry is complete. Each pending
//! reference resolves independently: class-typed targets found in the
//! registry point at the canonical class, everything else class-typed points
//! at the unknown placeholder.

use crate::{ClassDefinition, ComposeEvent, EventLog, FeatureId, SchemaRegistry, TypeRef};

/// Picks a placeholder name that no registered class uses.
///
/// The preferred name is used as-is when free, otherwise the first free
/// `<preferred>N` for N = 1, 2, ...
///
/// # Examples
///
/// ```
/// use schema_compose_core::{placeholder_name, ClassDefinition, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// assert_eq!(placeholder_name(&registry, "Unknown"), "Unknown");
///
/// registry.register(ClassDefinition::new("Unknown")).unwrap();
/// assert_eq!(placeholder_name(&registry, "Unknown"), "Unknown1");
/// ```
pub fn placeholder_name(registry: &SchemaRegistry, preferred: &str) -> String {
    if !registry.contains(preferred) {
        return preferred.to_string();
    }
    (1..)
        .map(|n| format!("{preferred}{n}"))
        .find(|candidate| !registry.contains(candidate))
        .unwrap_or_else(|| preferred.to_string())
}

/// Result of resolving one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Target found in the registry.
    Resolved,
    /// Target missing, re-pointed at the placeholder.
    Unresolved,
    /// Non-class target or stale handle; left untouched.
    Skipped,
}

/// Phase-two reference resolver.
///
/// Owns the unknown placeholder class. The placeholder only makes it into
/// the merged schema when at least one reference was re-pointed at it.
///
/// # Examples
///
/// ```
/// use schema_compose_core::*;
///
/// let mut registry = SchemaRegistry::new();
/// let order = registry
///     .register(ClassDefinition::new("Order").with_reference(Reference::new("customer", "Customer")))
///     .unwrap();
///
/// let mut resolver = ReferenceResolver::new(&registry, "Unknown");
/// let mut log = EventLog::new();
/// resolver.resolve(&mut registry, &[FeatureId::new(order, 0)], &mut log);
///
/// let placeholder = resolver.into_placeholder().unwrap();
/// assert_eq!(placeholder.name, "Unknown");
/// assert_eq!(registry[order].find_reference("customer").unwrap().target_class(), Some("Unknown"));
/// ```
#[derive(Debug)]
pub struct ReferenceResolver {
    placeholder: ClassDefinition,
    uses: usize,
}

impl ReferenceResolver {
    /// Creates the resolver and its placeholder, named after `preferred`
    /// unless the registry already holds a class of that name.
    pub fn new(registry: &SchemaRegistry, preferred: &str) -> Self {
        Self {
            placeholder: ClassDefinition::new(placeholder_name(registry, preferred)),
            uses: 0,
        }
    }

    pub fn placeholder_name(&self) -> &str {
        &self.placeholder.name
    }

    /// Number of references re-pointed at the placeholder so far.
    pub fn placeholder_uses(&self) -> usize {
        self.uses
    }

    /// Resolves every pending reference in order.
    pub fn resolve(&mut self, registry: &mut SchemaRegistry, pending: &[FeatureId], log: &mut EventLog) {
        for &id in pending {
            self.resolve_one(registry, id, log);
        }
    }

    /// Resolves a single reference.
    pub fn resolve_one(
        &mut self,
        registry: &mut SchemaRegistry,
        id: FeatureId,
        log: &mut EventLog,
    ) -> Resolution {
        let Some(target) = registry
            .feature(id)
            .and_then(|feature| feature.as_reference())
            .and_then(|reference| reference.target_class())
            .map(str::to_string)
        else {
            return Resolution::Skipped;
        };

        let (new_target, resolution) = match registry.lookup(&target) {
            Some(canonical) => (registry[canonical].name.clone(), Resolution::Resolved),
            None => (self.placeholder.name.clone(), Resolution::Unresolved),
        };

        let owner = registry[id.class].name.clone();
        let Some(reference) = registry
            .feature_mut(id)
            .and_then(|feature| feature.as_reference_mut())
        else {
            return Resolution::Skipped;
        };
        reference.target = TypeRef::class(new_target.clone());
        let reference = reference.name.clone();

        match resolution {
            Resolution::Resolved => log.emit(ComposeEvent::ReferenceResolved {
                class: owner,
                reference,
                target: new_target,
            }),
            Resolution::Unresolved => {
                self.uses += 1;
                log.emit(ComposeEvent::ReferenceUnresolved {
                    class: owner,
                    reference,
                    target,
                    placeholder: new_target,
                });
            }
            Resolution::Skipped => {}
        }
        resolution
    }

    /// Returns the placeholder if any reference was re-pointed at it.
    pub fn into_placeholder(self) -> Option<ClassDefinition> {
        (self.uses > 0).then_some(self.placeholder)
    }
}

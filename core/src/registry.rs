//! Insertion-ordered registry of merged classes.
//!
//! [`SchemaRegistry`] owns every merged [`ClassDefinition`] and hands out
//! stable [`ClassId`]/[`FeatureId`] handles. Classes are never removed and
//! features are only appended, so handles stay valid for the whole run.
//!
//! Lookups by name are O(1) via an index `HashMap`; iteration follows
//! registration order, so output does not depend on hash ordering.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use crate::error::{ComposeError, Result};
use crate::{ClassDefinition, Feature};

/// Handle of a registered class (its registration position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    /// Position of the class in registration order, which is also its
    /// position in the merged schema's class list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a feature inside a registered class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId {
    pub class: ClassId,
    pub index: usize,
}

impl FeatureId {
    pub fn new(class: ClassId, index: usize) -> Self {
        Self { class, index }
    }
}

/// Name-unique, insertion-ordered class registry.
///
/// # Examples
///
/// ```
/// use schema_compose_core::{ClassDefinition, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// let person = registry.register(ClassDefinition::new("Person")).unwrap();
/// registry.register(ClassDefinition::new("Address")).unwrap();
///
/// assert_eq!(registry.lookup("Person"), Some(person));
/// assert_eq!(registry[person].name, "Person");
/// assert!(registry.register(ClassDefinition::new("Person")).is_err());
///
/// let names: Vec<_> = registry.classes().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, vec!["Person", "Address"]);
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    classes: Vec<ClassDefinition>,
    index: HashMap<String, ClassId>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the canonical class registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registers a class under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::DuplicateRegistration`] if the name is already
    /// taken. Callers decide between registering and merging via
    /// [`lookup`](Self::lookup) first.
    pub fn register(&mut self, class: ClassDefinition) -> Result<ClassId> {
        if self.index.contains_key(&class.name) {
            return Err(ComposeError::DuplicateRegistration(class.name));
        }
        let id = ClassId(self.classes.len());
        self.index.insert(class.name.clone(), id);
        self.classes.push(class);
        Ok(id)
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassDefinition> {
        self.classes.get(id.0)
    }

    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassDefinition> {
        self.classes.get_mut(id.0)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.get(id.class)?.features.get(id.index)
    }

    pub fn feature_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.get_mut(id.class)?.features.get_mut(id.index)
    }

    /// Registered classes in first-registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Consumes the registry, returning classes in registration order.
    pub fn into_classes(self) -> Vec<ClassDefinition> {
        self.classes
    }
}

impl Index<ClassId> for SchemaRegistry {
    type Output = ClassDefinition;

    fn index(&self, id: ClassId) -> &ClassDefinition {
        &self.classes[id.0]
    }
}

impl IndexMut<ClassId> for SchemaRegistry {
    fn index_mut(&mut self, id: ClassId) -> &mut ClassDefinition {
        &mut self.classes[id.0]
    }
}

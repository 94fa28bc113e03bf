//! Class and feature model shared by source documents and merged schemas.
//!
//! The types are plain owned values designed for serialization with
//! [`serde`]. Cloning a [`ClassDefinition`] produces a fully independent deep
//! copy, which is how the registry detaches merged classes from the source
//! documents they came from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound value meaning "no upper limit".
pub const UNBOUNDED: i32 = -1;

fn default_upper_bound() -> i32 {
    1
}

/// Primitive data type tag.
///
/// `String` is the universal widening target: any attribute type conflict
/// found while merging collapses to it. Tags not covered by a dedicated
/// variant are kept verbatim in [`Custom`](PrimitiveType::Custom).
///
/// # Examples
///
/// ```
/// use schema_compose_core::PrimitiveType;
///
/// assert_eq!(PrimitiveType::Int.to_string(), "Int");
/// assert_eq!(PrimitiveType::Custom("EDate".into()).to_string(), "EDate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Date,
    /// Any other data type tag, preserved as-is.
    Custom(String),
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Int => f.write_str("Int"),
            Self::Long => f.write_str("Long"),
            Self::Float => f.write_str("Float"),
            Self::Double => f.write_str("Double"),
            Self::Date => f.write_str("Date"),
            Self::Custom(tag) => f.write_str(tag),
        }
    }
}

/// Declared type of a feature.
///
/// Either a primitive data type or a class-typed target identified by class
/// name.
///
/// # Examples
///
/// ```
/// use schema_compose_core::{PrimitiveType, TypeRef};
///
/// let ty = TypeRef::class("Address");
/// assert_eq!(ty.class_name(), Some("Address"));
///
/// let ty = TypeRef::Primitive(PrimitiveType::Int);
/// assert_eq!(ty.class_name(), None);
/// assert!(TypeRef::string().is_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Primitive data type.
    Primitive(PrimitiveType),
    /// Another class, by name.
    Class(String),
}

impl TypeRef {
    /// The universal widening target.
    pub fn string() -> Self {
        Self::Primitive(PrimitiveType::String)
    }

    /// A class-typed target.
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// Returns the target class name for class-typed refs.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Primitive(_) => None,
        }
    }

    /// Whether this is the `String` primitive.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveType::String))
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(primitive: PrimitiveType) -> Self {
        Self::Primitive(primitive)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => primitive.fmt(f),
            Self::Class(name) => write!(f, "class {name}"),
        }
    }
}

/// Structural data field with a declared type and cardinality bounds.
///
/// # Examples
///
/// ```
/// use schema_compose_core::{Attribute, PrimitiveType, UNBOUNDED};
///
/// let tags = Attribute::new("tags", PrimitiveType::String).with_bounds(0, UNBOUNDED);
/// assert!(tags.is_many());
///
/// let age = Attribute::new("age", PrimitiveType::Int);
/// assert_eq!((age.lower_bound, age.upper_bound), (0, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub lower_bound: u32,
    /// `-1` ([`UNBOUNDED`]) for no upper limit.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: i32,
}

impl Attribute {
    /// Creates an optional single-valued attribute (`0..1`).
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            lower_bound: 0,
            upper_bound: 1,
        }
    }

    /// Sets the cardinality bounds.
    pub fn with_bounds(mut self, lower: u32, upper: i32) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Whether more than one value is allowed.
    pub fn is_many(&self) -> bool {
        self.upper_bound == UNBOUNDED || self.upper_bound > 1
    }
}

/// Relationship to another class with cardinality bounds.
///
/// # Examples
///
/// ```
/// use schema_compose_core::Reference;
///
/// let owner = Reference::new("owner", "Person").with_bounds(1, 1);
/// assert_eq!(owner.target_class(), Some("Person"));
/// assert_eq!(owner.lower_bound, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub target: TypeRef,
    #[serde(default)]
    pub lower_bound: u32,
    /// `-1` ([`UNBOUNDED`]) for no upper limit.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: i32,
}

impl Reference {
    /// Creates an optional single-valued reference to the named class.
    pub fn new(name: impl Into<String>, target_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: TypeRef::class(target_class),
            lower_bound: 0,
            upper_bound: 1,
        }
    }

    /// Sets the cardinality bounds.
    pub fn with_bounds(mut self, lower: u32, upper: i32) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Name of the target class, if the target is class-typed.
    pub fn target_class(&self) -> Option<&str> {
        self.target.class_name()
    }
}

/// A structural feature of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feature {
    Attribute(Attribute),
    Reference(Reference),
}

impl Feature {
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attribute) => &attribute.name,
            Self::Reference(reference) => &reference.name,
        }
    }

    pub fn lower_bound(&self) -> u32 {
        match self {
            Self::Attribute(attribute) => attribute.lower_bound,
            Self::Reference(reference) => reference.lower_bound,
        }
    }

    pub fn upper_bound(&self) -> i32 {
        match self {
            Self::Attribute(attribute) => attribute.upper_bound,
            Self::Reference(reference) => reference.upper_bound,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Self::Attribute(attribute) => Some(attribute),
            Self::Reference(_) => None,
        }
    }

    pub fn as_attribute_mut(&mut self) -> Option<&mut Attribute> {
        match self {
            Self::Attribute(attribute) => Some(attribute),
            Self::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Attribute(_) => None,
        }
    }

    pub fn as_reference_mut(&mut self) -> Option<&mut Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Attribute(_) => None,
        }
    }
}

impl From<Attribute> for Feature {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<Reference> for Feature {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

/// Named class holding an ordered list of features.
///
/// Feature order is insertion order and is preserved through merging.
///
/// # Examples
///
/// ```
/// use schema_compose_core::*;
///
/// let person = ClassDefinition::new("Person")
///     .with_attribute(Attribute::new("name", PrimitiveType::String))
///     .with_reference(Reference::new("address", "Address"));
///
/// assert_eq!(person.features.len(), 2);
/// assert!(person.find_attribute("name").is_some());
/// assert!(person.find_attribute("address").is_none());
/// assert_eq!(person.references().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl ClassDefinition {
    /// Creates a concrete class without features.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Marks the class as abstract.
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Appends an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.features.push(Feature::Attribute(attribute));
        self
    }

    /// Appends a reference.
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.features.push(Feature::Reference(reference));
        self
    }

    /// Position of the first attribute with the given name.
    ///
    /// References are ignored, so an attribute and a reference may share a
    /// name without shadowing each other.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.features
            .iter()
            .position(|f| matches!(f, Feature::Attribute(a) if a.name == name))
    }

    /// First attribute with the given name.
    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().find(|a| a.name == name)
    }

    /// First reference with the given name.
    pub fn find_reference(&self, name: &str) -> Option<&Reference> {
        self.references().find(|r| r.name == name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter().filter_map(Feature::as_attribute)
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.features.iter().filter_map(Feature::as_reference)
    }
}

/// A self-contained source unit of class definitions.
///
/// This is the on-disk shape read by schema loaders; only `classes` takes
/// part in merging.
///
/// # Examples
///
/// ```
/// use schema_compose_core::{ClassDefinition, SchemaDocument};
///
/// let doc = SchemaDocument::new("library")
///     .with_class(ClassDefinition::new("Book"))
///     .with_class(ClassDefinition::new("Author"));
/// assert_eq!(doc.class_names(), vec!["Book", "Author"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_uri: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
}

impl SchemaDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: ClassDefinition) -> Self {
        self.classes.push(class);
        self
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_index_skips_references() {
        let class = ClassDefinition::new("Order")
            .with_reference(Reference::new("total", "Money"))
            .with_attribute(Attribute::new("total", PrimitiveType::Double));

        assert_eq!(class.attribute_index("total"), Some(1));
        assert_eq!(class.attribute_index("missing"), None);
    }

    #[test]
    fn test_first_attribute_is_authoritative() {
        let class = ClassDefinition::new("Order")
            .with_attribute(Attribute::new("id", PrimitiveType::Int))
            .with_attribute(Attribute::new("id", PrimitiveType::String));

        assert_eq!(class.attribute_index("id"), Some(0));
        assert_eq!(
            class.find_attribute("id").map(|a| &a.ty),
            Some(&TypeRef::Primitive(PrimitiveType::Int))
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let source = ClassDefinition::new("Person")
            .with_attribute(Attribute::new("name", PrimitiveType::Int));
        let mut copy = source.clone();
        if let Some(attribute) = copy.features[0].as_attribute_mut() {
            attribute.ty = TypeRef::string();
        }

        assert_eq!(
            source.find_attribute("name").map(|a| &a.ty),
            Some(&TypeRef::Primitive(PrimitiveType::Int))
        );
    }

    #[test]
    fn test_feature_json_shape() {
        let feature = Feature::Reference(Reference::new("owner", "Person"));
        let json = serde_json::to_value(&feature).unwrap();

        assert_eq!(json["kind"], "reference");
        assert_eq!(json["target"]["class"], "Person");
        assert_eq!(json["upper_bound"], 1);
    }

    #[test]
    fn test_bounds_default_when_missing() {
        let raw = r#"{"kind": "attribute", "name": "age", "type": {"primitive": "Int"}}"#;
        let feature: Feature = serde_json::from_str(raw).unwrap();
        let attribute = feature.as_attribute().unwrap();

        assert_eq!(attribute.lower_bound, 0);
        assert_eq!(attribute.upper_bound, 1);
        assert_eq!(attribute.ty, TypeRef::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn test_custom_primitive_round_trips() {
        let ty = TypeRef::Primitive(PrimitiveType::Custom("EBigDecimal".into()));
        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}

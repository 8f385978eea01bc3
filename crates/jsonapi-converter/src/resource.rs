//! # Resource Trait
//!
//! The `Resource` trait is the contract a Rust type satisfies to be read from
//! and written to wire documents. It plays the role a reflection layer would
//! play elsewhere: the type lists its fields once in [`Resource::fields`] and
//! exposes one accessor pair per field kind, so the converter never needs
//! runtime introspection.
//!
//! Relationship fields hold [`Ref`] handles into a
//! [`ResourceGraph`](crate::graph::ResourceGraph) rather than owning their
//! targets. That is what allows shared and cyclic references (a user whose
//! statuses point back at the same user) without reference counting.
//!
//! ```rust
//! use jsonapi_converter::{FieldDescriptor, Ref, Related, Resource};
//! use serde_json::Value;
//!
//! #[derive(Debug, Default)]
//! struct Person { id: String, name: String, friend: Option<Ref<Person>> }
//!
//! impl Resource for Person {
//!     const TYPE: &'static str = "people";
//!
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::id("id"),
//!             FieldDescriptor::attribute("name"),
//!             FieldDescriptor::to_one("friend", "people"),
//!         ]
//!     }
//!
//!     fn id(&self) -> &str { &self.id }
//!     fn set_id(&mut self, id: String) { self.id = id; }
//!
//!     fn attribute(&self, name: &str) -> serde_json::Result<Value> {
//!         match name {
//!             "name" => serde_json::to_value(&self.name),
//!             _ => Ok(Value::Null),
//!         }
//!     }
//!
//!     fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
//!         if name == "name" {
//!             self.name = serde_json::from_value(value)?;
//!         }
//!         Ok(())
//!     }
//!
//!     fn relationship(&self, name: &str) -> Option<Related> {
//!         (name == "friend").then(|| Related::one(self.friend))
//!     }
//!
//!     fn set_relationship(&mut self, name: &str, related: Related) {
//!         if name == "friend" {
//!             self.friend = related.to_one();
//!         }
//!     }
//! }
//! ```

use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// How many resources a relationship points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// Metadata for one relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipMeta {
    /// Wire type name of the resources on the other end.
    pub target_type: String,
    pub cardinality: Cardinality,
    /// Whether the writer emits this relationship. Private relationships are
    /// kept in memory only.
    pub serializable: bool,
}

/// What a declared field is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Attribute,
    Relationship(RelationshipMeta),
}

/// One declared field of a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn id(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Id,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Attribute,
        }
    }

    pub fn to_one(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::relationship(name, target_type, Cardinality::One)
    }

    pub fn to_many(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::relationship(name, target_type, Cardinality::Many)
    }

    fn relationship(
        name: impl Into<String>,
        target_type: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Relationship(RelationshipMeta {
                target_type: target_type.into(),
                cardinality,
                serializable: true,
            }),
        }
    }

    /// Marks a relationship as in-memory only; the writer skips it.
    pub fn not_serializable(mut self) -> Self {
        if let FieldKind::Relationship(meta) = &mut self.kind {
            meta.serializable = false;
        }
        self
    }
}

/// Untyped index of an instance inside a [`ResourceGraph`](crate::graph::ResourceGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawRef(pub(crate) usize);

/// Typed handle to an instance of `T` inside a [`ResourceGraph`](crate::graph::ResourceGraph).
///
/// Handles are cheap to copy. Two handles are equal exactly when they name the
/// same instance, which is how identity dedup shows up to callers.
pub struct Ref<T> {
    raw: RawRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    pub(crate) fn from_raw(raw: RawRef) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn raw(self) -> RawRef {
        self.raw
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Ref<T> {}

impl<T> std::hash::Hash for Ref<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({})", self.raw.0)
    }
}

/// Value of a relationship field as exchanged with the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related {
    One(Option<RawRef>),
    Many(Vec<RawRef>),
}

impl Related {
    pub fn one<T>(target: Option<Ref<T>>) -> Self {
        Related::One(target.map(Ref::raw))
    }

    pub fn many<T>(targets: &[Ref<T>]) -> Self {
        Related::Many(targets.iter().map(|target| target.raw()).collect())
    }

    /// Converts into a to-one field value. A to-many value yields its first entry.
    pub fn to_one<T>(self) -> Option<Ref<T>> {
        match self {
            Related::One(target) => target.map(Ref::from_raw),
            Related::Many(targets) => targets.into_iter().next().map(Ref::from_raw),
        }
    }

    /// Converts into a to-many field value.
    pub fn to_many<T>(self) -> Vec<Ref<T>> {
        match self {
            Related::One(target) => target.into_iter().map(Ref::from_raw).collect(),
            Related::Many(targets) => targets.into_iter().map(Ref::from_raw).collect(),
        }
    }

    pub fn handles(&self) -> &[RawRef] {
        match self {
            Related::One(target) => target.as_slice(),
            Related::Many(targets) => targets,
        }
    }
}

/// A Rust type that maps onto a wire resource.
///
/// Unknown names passed to the accessors should be ignored: the converter only
/// ever asks for names listed in [`Resource::fields`].
pub trait Resource: Any + fmt::Debug + Default + Send + Sync {
    /// Wire type name, e.g. `"users"`.
    const TYPE: &'static str;

    /// Declared fields. Exactly one must be [`FieldKind::Id`].
    fn fields() -> Vec<FieldDescriptor>;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn attribute(&self, name: &str) -> serde_json::Result<Value>;

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()>;

    fn relationship(&self, _name: &str) -> Option<Related> {
        None
    }

    fn set_relationship(&mut self, _name: &str, _related: Related) {}
}

/// Object-safe view of a [`Resource`] used by the graph, pool and writer.
pub(crate) trait ErasedResource: Any + fmt::Debug + Send + Sync {
    fn wire_type(&self) -> &'static str;
    fn rust_type(&self) -> TypeId;
    fn resource_id(&self) -> &str;
    fn assign_id(&mut self, id: String);
    fn read_attribute(&self, name: &str) -> serde_json::Result<Value>;
    fn write_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()>;
    fn read_relationship(&self, name: &str) -> Option<Related>;
    fn write_relationship(&mut self, name: &str, related: Related);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Resource> ErasedResource for T {
    fn wire_type(&self) -> &'static str {
        T::TYPE
    }

    fn rust_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn resource_id(&self) -> &str {
        Resource::id(self)
    }

    fn assign_id(&mut self, id: String) {
        Resource::set_id(self, id)
    }

    fn read_attribute(&self, name: &str) -> serde_json::Result<Value> {
        Resource::attribute(self, name)
    }

    fn write_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        Resource::set_attribute(self, name, value)
    }

    fn read_relationship(&self, name: &str) -> Option<Related> {
        Resource::relationship(self, name)
    }

    fn write_relationship(&mut self, name: &str, related: Related) {
        Resource::set_relationship(self, name, related)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationships_default_to_serializable() {
        let field = FieldDescriptor::to_one("user", "users");
        let FieldKind::Relationship(meta) = &field.kind else {
            panic!("expected a relationship");
        };
        assert!(meta.serializable);
        assert_eq!(meta.cardinality, Cardinality::One);

        let FieldKind::Relationship(meta) = field.not_serializable().kind else {
            panic!("expected a relationship");
        };
        assert!(!meta.serializable);
    }

    #[test]
    fn not_serializable_leaves_attributes_alone() {
        let field = FieldDescriptor::attribute("name").not_serializable();
        assert_eq!(field.kind, FieldKind::Attribute);
    }

    #[test]
    fn related_converts_between_shapes() {
        let handles = [Ref::<()>::from_raw(RawRef(3)), Ref::from_raw(RawRef(5))];
        let many = Related::many(&handles);
        assert_eq!(many.handles(), &[RawRef(3), RawRef(5)]);
        assert_eq!(many.clone().to_one::<()>(), Some(handles[0]));
        assert_eq!(many.to_many::<()>(), handles.to_vec());
        assert_eq!(Related::One(None).to_many::<()>(), Vec::new());
    }
}

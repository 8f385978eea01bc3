//! # Type Registry
//!
//! Maps wire type names to the metadata the reader and writer need. The
//! registry is filled once before any conversion and then shared read-only
//! (behind an `Arc` inside [`ResourceConverter`](crate::ResourceConverter)).
//!
//! Registration validates each descriptor:
//! - exactly one identifier field,
//! - no duplicate field names,
//! - a wire type name not already claimed by a different Rust type.
//!
//! Relationship targets are *not* checked here. A relationship pointing at an
//! unregistered type is reported when a document actually exercises it.

use crate::error::{ConverterError, Result};
use crate::resource::{ErasedResource, FieldDescriptor, FieldKind, RelationshipMeta, Resource};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Factory = fn() -> Box<dyn ErasedResource>;

fn instantiate<T: Resource>() -> Box<dyn ErasedResource> {
    Box::new(T::default())
}

/// Everything a caller declares about one resource type.
#[derive(Clone)]
pub struct TypeDescriptor {
    type_name: String,
    rust_type: TypeId,
    rust_name: &'static str,
    fields: Vec<FieldDescriptor>,
    factory: Factory,
}

impl TypeDescriptor {
    /// Captures the descriptor of a [`Resource`] implementation.
    pub fn of<T: Resource>() -> Self {
        Self {
            type_name: T::TYPE.to_string(),
            rust_type: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            fields: T::fields(),
            factory: instantiate::<T>,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("rust_name", &self.rust_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Validated, cached metadata for one registered type.
pub struct TypeMetadata {
    type_name: String,
    rust_type: TypeId,
    rust_name: &'static str,
    id_field: String,
    attributes: Vec<String>,
    relationships: Vec<(String, RelationshipMeta)>,
    factory: Factory,
}

impl TypeMetadata {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Declared attribute names, in declaration order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Declared relationships, in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = (&str, &RelationshipMeta)> {
        self.relationships
            .iter()
            .map(|(name, meta)| (name.as_str(), meta))
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipMeta> {
        self.relationships()
            .find(|(field, _)| *field == name)
            .map(|(_, meta)| meta)
    }

    /// Allocates an empty instance of the described type.
    pub(crate) fn instantiate(&self) -> Box<dyn ErasedResource> {
        (self.factory)()
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("type_name", &self.type_name)
            .field("rust_name", &self.rust_name)
            .field("id_field", &self.id_field)
            .field("attributes", &self.attributes)
            .field("relationships", &self.relationships)
            .finish()
    }
}

impl TryFrom<TypeDescriptor> for TypeMetadata {
    type Error = ConverterError;

    fn try_from(descriptor: TypeDescriptor) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut id_fields = Vec::new();
        let mut attributes = Vec::new();
        let mut relationships = Vec::new();

        for field in descriptor.fields {
            if !seen.insert(field.name.clone()) {
                return Err(ConverterError::config(format!(
                    "type `{}` declares field `{}` twice",
                    descriptor.type_name, field.name
                )));
            }
            match field.kind {
                FieldKind::Id => id_fields.push(field.name),
                FieldKind::Attribute => attributes.push(field.name),
                FieldKind::Relationship(meta) => relationships.push((field.name, meta)),
            }
        }

        if id_fields.len() != 1 {
            return Err(ConverterError::config(format!(
                "type `{}` must declare exactly one id field, found {}",
                descriptor.type_name,
                id_fields.len()
            )));
        }

        Ok(Self {
            type_name: descriptor.type_name,
            rust_type: descriptor.rust_type,
            rust_name: descriptor.rust_name,
            id_field: id_fields.remove(0),
            attributes,
            relationships,
            factory: descriptor.factory,
        })
    }
}

/// Registry of resource types, keyed by wire name and by Rust type.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<TypeMetadata>>,
    by_rust_type: HashMap<TypeId, Arc<TypeMetadata>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a descriptor.
    ///
    /// Registering the same Rust type again returns the cached metadata.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<Arc<TypeMetadata>> {
        if let Some(existing) = self.by_rust_type.get(&descriptor.rust_type) {
            return Ok(Arc::clone(existing));
        }
        if let Some(existing) = self.by_name.get(&descriptor.type_name) {
            return Err(ConverterError::config(format!(
                "type name `{}` is already registered by `{}`",
                descriptor.type_name, existing.rust_name
            )));
        }

        let metadata = Arc::new(TypeMetadata::try_from(descriptor)?);
        debug!(
            resource_type = metadata.type_name(),
            attributes = metadata.attributes.len(),
            relationships = metadata.relationships.len(),
            "Registered type"
        );
        self.by_name
            .insert(metadata.type_name.clone(), Arc::clone(&metadata));
        self.by_rust_type
            .insert(metadata.rust_type, Arc::clone(&metadata));
        Ok(metadata)
    }

    pub fn register_type<T: Resource>(&mut self) -> Result<Arc<TypeMetadata>> {
        self.register(TypeDescriptor::of::<T>())
    }

    pub fn lookup(&self, type_name: &str) -> Result<&Arc<TypeMetadata>> {
        self.by_name
            .get(type_name)
            .ok_or_else(|| ConverterError::NotFound(type_name.to_string()))
    }

    pub fn lookup_type<T: Resource>(&self) -> Result<&Arc<TypeMetadata>> {
        self.lookup_rust_type(TypeId::of::<T>())
            .ok_or_else(|| ConverterError::NotFound(std::any::type_name::<T>().to_string()))
    }

    pub(crate) fn lookup_rust_type(&self, rust_type: TypeId) -> Option<&Arc<TypeMetadata>> {
        self.by_rust_type.get(&rust_type)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

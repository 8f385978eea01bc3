//! # Resource Converter
//!
//! The entry point most callers need. A [`ResourceConverter`] bundles the type
//! registry, the resolvers and the attribute naming strategy, all fixed at
//! [`ConverterBuilder::build`] time. It is cheap to clone and can be shared
//! across threads; every read or write gets its own pool and walk state.
//!
//! ```rust
//! use jsonapi_converter::{FieldDescriptor, ResourceConverter, Resource};
//! use serde_json::Value;
//!
//! #[derive(Debug, Default)]
//! struct Tag {
//!     id: String,
//!     label: String,
//! }
//!
//! impl Resource for Tag {
//!     const TYPE: &'static str = "tags";
//!
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![FieldDescriptor::id("id"), FieldDescriptor::attribute("label")]
//!     }
//!
//!     fn id(&self) -> &str { &self.id }
//!     fn set_id(&mut self, id: String) { self.id = id; }
//!
//!     fn attribute(&self, name: &str) -> serde_json::Result<Value> {
//!         match name {
//!             "label" => serde_json::to_value(&self.label),
//!             _ => Ok(Value::Null),
//!         }
//!     }
//!
//!     fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
//!         if name == "label" {
//!             self.label = serde_json::from_value(value)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let converter = ResourceConverter::builder().register::<Tag>().build()?;
//! let read = converter.read_object::<Tag>(
//!     br#"{"data": {"type": "tags", "id": "7", "attributes": {"label": "rust"}}}"#,
//! )?;
//! assert_eq!(read.root().unwrap().label, "rust");
//!
//! let bytes = converter.write_object(read.graph(), read.primary().unwrap())?;
//! assert!(String::from_utf8(bytes).unwrap().contains(r#""label":"rust""#));
//! # Ok::<(), jsonapi_converter::ConverterError>(())
//! ```

use crate::builder::GraphBuilder;
use crate::document::Document;
use crate::error::{ConverterError, Result};
use crate::graph::{Materialized, ResourceGraph};
use crate::naming::NamingStrategy;
use crate::registry::{TypeMetadata, TypeRegistry};
use crate::resolver::{RelationshipResolver, ResolverRegistry};
use crate::resource::{Ref, Resource};
use crate::serializer::Serializer;
use std::sync::Arc;
use tracing::{info, instrument};

/// Reads and writes documents for a fixed set of resource types.
#[derive(Debug, Clone)]
pub struct ResourceConverter {
    registry: Arc<TypeRegistry>,
    resolvers: Arc<ResolverRegistry>,
    naming: NamingStrategy,
}

impl ResourceConverter {
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn naming(&self) -> NamingStrategy {
        self.naming
    }

    /// Reads a document whose primary data is a single resource of type `T`
    /// (or `null`).
    #[instrument(skip_all, fields(resource_type = T::TYPE))]
    pub fn read_object<T: Resource>(&self, bytes: &[u8]) -> Result<Materialized<Option<Ref<T>>>> {
        let target = self.target::<T>()?;
        let built = self.graph_builder().build(Document::parse(bytes)?, &target, false)?;
        info!(resources = built.graph.len(), "Read complete");

        let primary = built.primary.first().copied().map(Ref::from_raw);
        Ok(Materialized::new(built.graph, primary, built.links, built.meta))
    }

    /// Reads a document whose primary data is a collection of `T` (or `null`,
    /// which reads as an empty collection).
    #[instrument(skip_all, fields(resource_type = T::TYPE))]
    pub fn read_collection<T: Resource>(&self, bytes: &[u8]) -> Result<Materialized<Vec<Ref<T>>>> {
        let target = self.target::<T>()?;
        let built = self.graph_builder().build(Document::parse(bytes)?, &target, true)?;
        info!(
            resources = built.graph.len(),
            primary = built.primary.len(),
            "Read complete"
        );

        let primary = built.primary.into_iter().map(Ref::from_raw).collect();
        Ok(Materialized::new(built.graph, primary, built.links, built.meta))
    }

    /// Writes `root` and everything reachable from it through serializable
    /// relationships.
    #[instrument(skip_all, fields(resource_type = T::TYPE))]
    pub fn write_object<T: Resource>(&self, graph: &ResourceGraph, root: Ref<T>) -> Result<Vec<u8>> {
        self.check_handle(graph, root)?;
        let bytes = self.serializer().write_one(graph, Some(root.raw()))?;
        info!(bytes = bytes.len(), "Write complete");
        Ok(bytes)
    }

    /// Writes a collection document with `roots` as primary data, in order.
    #[instrument(skip_all, fields(resource_type = T::TYPE, primary = roots.len()))]
    pub fn write_collection<T: Resource>(
        &self,
        graph: &ResourceGraph,
        roots: &[Ref<T>],
    ) -> Result<Vec<u8>> {
        for root in roots {
            self.check_handle(graph, *root)?;
        }
        let handles: Vec<_> = roots.iter().map(|root| root.raw()).collect();
        let bytes = self.serializer().write_many(graph, &handles)?;
        info!(bytes = bytes.len(), "Write complete");
        Ok(bytes)
    }

    fn target<T: Resource>(&self) -> Result<Arc<TypeMetadata>> {
        self.registry
            .lookup_type::<T>()
            .map(Arc::clone)
            .map_err(|_| {
                ConverterError::config(format!(
                    "`{}` is not registered with this converter",
                    T::TYPE
                ))
            })
    }

    fn check_handle<T: Resource>(&self, graph: &ResourceGraph, handle: Ref<T>) -> Result<()> {
        self.target::<T>()?;
        if graph.get(handle).is_none() {
            return Err(ConverterError::config(format!(
                "{handle:?} does not point at a `{}` in this graph",
                T::TYPE
            )));
        }
        Ok(())
    }

    fn graph_builder(&self) -> GraphBuilder<'_> {
        GraphBuilder::new(&self.registry, &self.resolvers).with_naming(self.naming)
    }

    fn serializer(&self) -> Serializer<'_> {
        Serializer::new(&self.registry).with_naming(self.naming)
    }
}

/// Collects types, resolvers and naming before freezing them into a
/// [`ResourceConverter`]. Registration errors surface from [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    registry: TypeRegistry,
    resolvers: ResolverRegistry,
    naming: NamingStrategy,
    error: Option<ConverterError>,
}

impl ConverterBuilder {
    pub fn register<T: Resource>(mut self) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.registry.register_type::<T>() {
                self.error = Some(err);
            }
        }
        self
    }

    /// Resolver used for every relationship target without a type resolver.
    pub fn global_resolver(mut self, resolver: impl RelationshipResolver + 'static) -> Self {
        self.resolvers.set_global_resolver(resolver);
        self
    }

    /// Resolver used for relationships whose target type is `T`.
    pub fn type_resolver<T: Resource>(mut self, resolver: impl RelationshipResolver + 'static) -> Self {
        self.resolvers.set_type_resolver_for::<T>(resolver);
        self
    }

    /// Replaces the whole resolver set.
    pub fn resolvers(mut self, resolvers: ResolverRegistry) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    pub fn build(self) -> Result<ResourceConverter> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(ResourceConverter {
            registry: Arc::new(self.registry),
            resolvers: Arc::new(self.resolvers),
            naming: self.naming,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::FieldDescriptor;
    use serde_json::{json, Value};

    #[derive(Debug, Default)]
    struct Person {
        id: String,
        first_name: String,
    }

    impl Resource for Person {
        const TYPE: &'static str = "people";

        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::id("id"),
                FieldDescriptor::attribute("first_name"),
            ]
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        fn attribute(&self, name: &str) -> serde_json::Result<Value> {
            match name {
                "first_name" => serde_json::to_value(&self.first_name),
                _ => Ok(Value::Null),
            }
        }

        fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
            if name == "first_name" {
                self.first_name = serde_json::from_value(value)?;
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Anonymous;

    impl Resource for Anonymous {
        const TYPE: &'static str = "anonymous";

        fn fields() -> Vec<FieldDescriptor> {
            Vec::new()
        }

        fn id(&self) -> &str {
            ""
        }

        fn set_id(&mut self, _id: String) {}

        fn attribute(&self, _name: &str) -> serde_json::Result<Value> {
            Ok(Value::Null)
        }

        fn set_attribute(&mut self, _name: &str, _value: Value) -> serde_json::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn registration_errors_surface_at_build() {
        let err = ResourceConverter::builder()
            .register::<Person>()
            .register::<Anonymous>()
            .build()
            .unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(ref msg) if msg.contains("anonymous")));
    }

    #[test]
    fn naming_applies_on_read_and_write() {
        let converter = ResourceConverter::builder()
            .register::<Person>()
            .naming(NamingStrategy::KebabCase)
            .build()
            .unwrap();

        let read = converter
            .read_object::<Person>(
                br#"{"data": {"type": "people", "id": "9", "attributes": {"first-name": "Dan"}}}"#,
            )
            .unwrap();
        assert_eq!(read.root().unwrap().first_name, "Dan");

        let written = converter
            .write_object(read.graph(), read.primary().unwrap())
            .unwrap();
        let value: Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(
            value,
            json!({"data": {"type": "people", "id": "9", "attributes": {"first-name": "Dan"}}})
        );
    }

    #[test]
    fn unregistered_target_is_a_configuration_error() {
        let converter = ResourceConverter::builder().build().unwrap();
        let err = converter
            .read_object::<Person>(br#"{"data": null}"#)
            .unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(_)));
    }

    #[test]
    fn null_data_reads_as_none_or_empty() {
        let converter = ResourceConverter::builder()
            .register::<Person>()
            .build()
            .unwrap();

        assert!(converter
            .read_object::<Person>(br#"{"data": null}"#)
            .unwrap()
            .root()
            .is_none());
        assert!(converter
            .read_collection::<Person>(br#"{"data": null}"#)
            .unwrap()
            .primary()
            .is_empty());
    }

    #[test]
    fn top_level_links_and_meta_are_kept() {
        let converter = ResourceConverter::builder()
            .register::<Person>()
            .build()
            .unwrap();
        let read = converter
            .read_collection::<Person>(
                br#"{"data": [], "links": {"next": "/people?page=2"}, "meta": {"total": 0}}"#,
            )
            .unwrap();
        assert_eq!(read.links().unwrap()["next"], "/people?page=2");
        assert_eq!(read.meta().unwrap()["total"], 0);
    }

    #[test]
    fn foreign_handles_are_rejected_on_write() {
        let converter = ResourceConverter::builder()
            .register::<Person>()
            .build()
            .unwrap();
        let mut other = ResourceGraph::new();
        let handle = other.insert(Person::default());

        let err = converter
            .write_object(&ResourceGraph::new(), handle)
            .unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(_)));
    }

    #[test]
    fn converter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ResourceConverter>();
    }
}

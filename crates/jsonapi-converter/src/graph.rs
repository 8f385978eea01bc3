//! # Resource Graph
//!
//! Arena that owns every instance of one object graph. Relationship fields
//! point into the arena through [`Ref`] handles, so cycles and shared
//! references are plain indices.
//!
//! Graphs come from two places: the reader hands one back inside
//! [`Materialized`], and callers assemble one by hand with
//! [`ResourceGraph::insert`] before writing.

use crate::document::{Links, Meta};
use crate::identifier::ResourceIdentifier;
use crate::resource::{ErasedResource, RawRef, Ref, Resource};

/// Owner of all instances reachable from a conversion result.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    slots: Vec<Box<dyn ErasedResource>>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `value` into the graph and returns its handle.
    pub fn insert<T: Resource>(&mut self, value: T) -> Ref<T> {
        Ref::from_raw(self.push(Box::new(value)))
    }

    pub fn get<T: Resource>(&self, handle: Ref<T>) -> Option<&T> {
        self.erased(handle.raw())?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Resource>(&mut self, handle: Ref<T>) -> Option<&mut T> {
        self.erased_mut(handle.raw())?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Resolves a to-many field into the instances it points at.
    pub fn get_all<'a, T: Resource>(
        &'a self,
        handles: &'a [Ref<T>],
    ) -> impl Iterator<Item = &'a T> + 'a {
        handles.iter().filter_map(move |handle| self.get(*handle))
    }

    /// Wire identity of the instance behind `handle`.
    pub fn identifier(&self, handle: RawRef) -> Option<ResourceIdentifier> {
        self.erased(handle)
            .map(|resource| ResourceIdentifier::new(resource.wire_type(), resource.resource_id()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn push(&mut self, resource: Box<dyn ErasedResource>) -> RawRef {
        self.slots.push(resource);
        RawRef(self.slots.len() - 1)
    }

    pub(crate) fn erased(&self, handle: RawRef) -> Option<&(dyn ErasedResource + 'static)> {
        self.slots.get(handle.0).map(|slot| &**slot)
    }

    pub(crate) fn erased_mut(
        &mut self,
        handle: RawRef,
    ) -> Option<&mut (dyn ErasedResource + 'static)> {
        self.slots.get_mut(handle.0).map(|slot| &mut **slot)
    }
}

/// Result of a read: the populated graph plus the primary handle(s).
///
/// `P` is `Option<Ref<T>>` for single-resource reads and `Vec<Ref<T>>` for
/// collection reads.
#[derive(Debug)]
pub struct Materialized<P> {
    graph: ResourceGraph,
    primary: P,
    links: Option<Links>,
    meta: Option<Meta>,
}

impl<P> Materialized<P> {
    pub(crate) fn new(
        graph: ResourceGraph,
        primary: P,
        links: Option<Links>,
        meta: Option<Meta>,
    ) -> Self {
        Self {
            graph,
            primary,
            links,
            meta,
        }
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ResourceGraph {
        &mut self.graph
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Top-level `links` of the document that was read.
    pub fn links(&self) -> Option<&Links> {
        self.links.as_ref()
    }

    /// Top-level `meta` of the document that was read.
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn into_parts(self) -> (ResourceGraph, P) {
        (self.graph, self.primary)
    }
}

impl<T: Resource> Materialized<Option<Ref<T>>> {
    /// The primary resource, or `None` when the document's data was `null`.
    pub fn root(&self) -> Option<&T> {
        self.primary.and_then(|handle| self.graph.get(handle))
    }
}

impl<T: Resource> Materialized<Vec<Ref<T>>> {
    /// Primary resources in document order.
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.graph.get_all(&self.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::FieldDescriptor;
    use serde_json::Value;

    #[derive(Debug, Default, PartialEq)]
    struct Tag {
        id: String,
    }

    impl Resource for Tag {
        const TYPE: &'static str = "tags";

        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::id("id")]
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        fn attribute(&self, _name: &str) -> serde_json::Result<Value> {
            Ok(Value::Null)
        }

        fn set_attribute(&mut self, _name: &str, _value: Value) -> serde_json::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Other;

    impl Resource for Other {
        const TYPE: &'static str = "others";

        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::id("id")]
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
    fn insert_then_get_round_trips() {
        let mut graph = ResourceGraph::new();
        let tag = graph.insert(Tag { id: "rust".into() });

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(tag).unwrap().id, "rust");
        assert_eq!(
            graph.identifier(tag.raw()),
            Some(ResourceIdentifier::new("tags", "rust"))
        );

        graph.get_mut(tag).unwrap().id = "go".into();
        assert_eq!(graph.get(tag).unwrap().id, "go");
    }

    #[test]
    fn handle_of_wrong_type_yields_none() {
        let mut graph = ResourceGraph::new();
        let tag = graph.insert(Tag::default());
        let forged: Ref<Other> = Ref::from_raw(tag.raw());
        assert!(graph.get(forged).is_none());
        assert!(graph.get(Ref::<Tag>::from_raw(RawRef(7))).is_none());
    }
}

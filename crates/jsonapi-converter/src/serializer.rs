//! # Serializer
//!
//! Write path: walks a [`ResourceGraph`] depth-first from the primary
//! handles and emits one document. Primary instances go to `data`; everything
//! reached through a serializable relationship goes to `included`, once per
//! identifier, in the order the walk first meets it. Relationships marked
//! non-serializable are left out entirely.

use crate::error::{ConverterError, Result};
use crate::graph::ResourceGraph;
use crate::identifier::ResourceIdentifier;
use crate::naming::NamingStrategy;
use crate::registry::TypeRegistry;
use crate::resource::{Cardinality, RawRef, Related};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Debug, Serialize)]
struct WireDocument {
    data: WirePrimary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    included: Vec<WireResource>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WirePrimary {
    One(Option<WireResource>),
    Many(Vec<WireResource>),
}

#[derive(Debug, Serialize)]
struct WireResource {
    #[serde(flatten)]
    identifier: ResourceIdentifier,
    #[serde(skip_serializing_if = "Map::is_empty")]
    attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    relationships: BTreeMap<String, WireRelationship>,
}

#[derive(Debug, Serialize)]
struct WireRelationship {
    data: WireLinkage,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireLinkage {
    One(Option<ResourceIdentifier>),
    Many(Vec<ResourceIdentifier>),
}

/// Emits documents from a graph using the registry's metadata.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    registry: &'a TypeRegistry,
    naming: NamingStrategy,
}

impl<'a> Serializer<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            naming: NamingStrategy::default(),
        }
    }

    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Writes a single-resource document; `None` yields `"data": null`.
    pub fn write_one(&self, graph: &ResourceGraph, primary: Option<RawRef>) -> Result<Vec<u8>> {
        let mut walk = Walk::new(self, graph);
        let data = match primary {
            Some(handle) => Some(walk.primary(handle)?),
            None => None,
        };
        walk.finish(WirePrimary::One(data))
    }

    /// Writes a collection document, preserving the order of `primary`.
    pub fn write_many(&self, graph: &ResourceGraph, primary: &[RawRef]) -> Result<Vec<u8>> {
        let mut walk = Walk::new(self, graph);
        let data = primary
            .iter()
            .map(|handle| walk.primary(*handle))
            .collect::<Result<Vec<_>>>()?;
        walk.finish(WirePrimary::Many(data))
    }
}

/// State of one write: the identities already emitted and the handles still
/// to visit.
struct Walk<'s, 'a> {
    serializer: &'s Serializer<'a>,
    graph: &'s ResourceGraph,
    visited: HashSet<ResourceIdentifier>,
    pending: Vec<RawRef>,
}

impl<'s, 'a> Walk<'s, 'a> {
    fn new(serializer: &'s Serializer<'a>, graph: &'s ResourceGraph) -> Self {
        Self {
            serializer,
            graph,
            visited: HashSet::new(),
            pending: Vec::new(),
        }
    }

    fn primary(&mut self, handle: RawRef) -> Result<WireResource> {
        let (resource, children) = self.emit(handle)?;
        self.visited.insert(resource.identifier.clone());
        self.pending.extend(children);
        Ok(resource)
    }

    fn finish(mut self, data: WirePrimary) -> Result<Vec<u8>> {
        let mut included = Vec::new();
        // Depth-first, preorder: the stack holds children in reverse.
        let mut stack = std::mem::take(&mut self.pending);
        stack.reverse();
        while let Some(handle) = stack.pop() {
            let identifier = self.identifier(handle)?;
            if !self.visited.insert(identifier) {
                continue;
            }
            let (resource, children) = self.emit(handle)?;
            stack.extend(children.into_iter().rev());
            included.push(resource);
        }

        debug!(included = included.len(), "Document written");
        Ok(serde_json::to_vec(&WireDocument { data, included })?)
    }

    fn identifier(&self, handle: RawRef) -> Result<ResourceIdentifier> {
        self.graph
            .identifier(handle)
            .ok_or_else(|| ConverterError::config(format!("dangling handle {handle:?}")))
    }

    /// Converts one instance and returns the handles its serializable
    /// relationships point at, in declaration order.
    fn emit(&self, handle: RawRef) -> Result<(WireResource, Vec<RawRef>)> {
        let resource = self
            .graph
            .erased(handle)
            .ok_or_else(|| ConverterError::config(format!("dangling handle {handle:?}")))?;
        let metadata = self
            .serializer
            .registry
            .lookup_rust_type(resource.rust_type())
            .ok_or_else(|| ConverterError::NotFound(resource.wire_type().to_string()))?;
        let identifier = ResourceIdentifier::new(resource.wire_type(), resource.resource_id());

        let mut attributes = Map::new();
        for name in metadata.attributes() {
            let value = resource
                .read_attribute(name)
                .map_err(|source| ConverterError::Attribute {
                    resource: identifier.clone(),
                    attribute: name.clone(),
                    source,
                })?;
            attributes.insert(self.serializer.naming.apply(name), value);
        }

        let mut relationships = BTreeMap::new();
        let mut children = Vec::new();
        for (name, meta) in metadata.relationships() {
            if !meta.serializable {
                continue;
            }
            let related = resource.read_relationship(name).unwrap_or(match meta.cardinality {
                Cardinality::One => Related::One(None),
                Cardinality::Many => Related::Many(Vec::new()),
            });
            let identifiers = related
                .handles()
                .iter()
                .map(|target| self.identifier(*target))
                .collect::<Result<Vec<_>>>()?;
            let data = match meta.cardinality {
                Cardinality::One => WireLinkage::One(identifiers.into_iter().next()),
                Cardinality::Many => WireLinkage::Many(identifiers),
            };
            children.extend_from_slice(related.handles());
            relationships.insert(name.to_string(), WireRelationship { data });
        }

        Ok((
            WireResource {
                identifier,
                attributes,
                relationships,
            },
            children,
        ))
    }
}

//! # Graph Builder
//!
//! Turns a parsed [`Document`] into a populated [`ResourceGraph`] (read path).
//!
//! The build runs in two phases, so forward references and cycles never need
//! special handling:
//!
//! 1. **Admit**: every resource in primary data and `included` is allocated in
//!    the [`ResourcePool`] before any relationship is looked at.
//! 2. **Populate**: each admitted resource gets its attributes and
//!    relationships. A relationship whose identifiers are all admitted links
//!    straight to their pool handles. Otherwise the relationship's
//!    `links.related` URL is handed to a resolver; the returned document is
//!    admitted into the same pool and its resources join the populate queue.
//!
//! Resources already admitted are never admitted twice, so a resolved
//! document that repeats a known resource links to the existing instance.

use crate::document::{Document, Linkage, Links, Meta, PrimaryData, Relationship, ResourceObject};
use crate::error::{ConverterError, Result};
use crate::graph::ResourceGraph;
use crate::identifier::ResourceIdentifier;
use crate::naming::NamingStrategy;
use crate::pool::ResourcePool;
use crate::registry::{TypeMetadata, TypeRegistry};
use crate::resolver::ResolverRegistry;
use crate::resource::{Cardinality, RawRef, Related, RelationshipMeta};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Untyped result of [`GraphBuilder::build`].
#[derive(Debug)]
pub struct Built {
    pub graph: ResourceGraph,
    /// Primary handles in document order. Empty when `data` was `null`.
    pub primary: Vec<RawRef>,
    pub links: Option<Links>,
    pub meta: Option<Meta>,
}

/// Read-path orchestrator over a shared registry and resolver set.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    registry: &'a TypeRegistry,
    resolvers: &'a ResolverRegistry,
    naming: NamingStrategy,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(registry: &'a TypeRegistry, resolvers: &'a ResolverRegistry) -> Self {
        Self {
            registry,
            resolvers,
            naming: NamingStrategy::default(),
        }
    }

    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Builds the object graph for `document`, whose primary data must be of
    /// type `target` and match `expect_collection`.
    pub fn build(
        &self,
        document: Document,
        target: &TypeMetadata,
        expect_collection: bool,
    ) -> Result<Built> {
        match (&document.data, expect_collection) {
            (PrimaryData::Single(_), true) => {
                return Err(ConverterError::CardinalityMismatch {
                    expected: PrimaryData::COLLECTION,
                    found: document.data.kind(),
                })
            }
            (PrimaryData::Collection(_), false) => {
                return Err(ConverterError::CardinalityMismatch {
                    expected: PrimaryData::SINGLE,
                    found: document.data.kind(),
                })
            }
            _ => {}
        }

        let Document {
            data,
            included,
            links,
            meta,
            ..
        } = document;
        let primary_resources = match data {
            PrimaryData::Null => Vec::new(),
            PrimaryData::Single(resource) => vec![resource],
            PrimaryData::Collection(resources) => resources,
        };
        let primary_ids = primary_resources
            .iter()
            .map(|resource| expect_type(&resource.identifier, target.type_name()).cloned())
            .collect::<Result<Vec<_>>>()?;

        let mut session = BuildSession {
            builder: *self,
            pool: ResourcePool::new(),
            queue: VecDeque::new(),
        };
        session.admit(primary_resources);
        session.admit(included.into_values());

        let primary = primary_ids
            .iter()
            .filter_map(|identifier| session.pool.handle(identifier))
            .collect();

        session.drain()?;
        debug!(
            resource_type = target.type_name(),
            resources = session.pool.len(),
            "Graph built"
        );

        Ok(Built {
            graph: session.pool.into_graph(),
            primary,
            links,
            meta,
        })
    }
}

/// Mutable state of one `build` call.
struct BuildSession<'a> {
    builder: GraphBuilder<'a>,
    pool: ResourcePool,
    queue: VecDeque<ResourceObject>,
}

impl BuildSession<'_> {
    /// Allocates every resource not seen before and queues it for population.
    /// Resources of unregistered types cannot be the target of any declared
    /// relationship, so they are skipped.
    fn admit(&mut self, resources: impl IntoIterator<Item = ResourceObject>) {
        for resource in resources {
            if self.pool.handle(&resource.identifier).is_some() {
                continue;
            }
            let Ok(metadata) = self
                .builder
                .registry
                .lookup(&resource.identifier.resource_type)
            else {
                debug!(identifier = %resource.identifier, "Skipping unregistered type");
                continue;
            };
            self.pool.get_or_allocate(&resource.identifier, metadata);
            self.queue.push_back(resource);
        }
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(resource) = self.queue.pop_front() {
            self.populate(resource)?;
        }
        Ok(())
    }

    fn populate(&mut self, mut resource: ResourceObject) -> Result<()> {
        let metadata = Arc::clone(
            self.builder
                .registry
                .lookup(&resource.identifier.resource_type)?,
        );

        // Attributes without a declared field are ignored.
        let attributes = metadata
            .attributes()
            .iter()
            .filter_map(|name| {
                let wire_name = self.builder.naming.apply(name);
                resource
                    .attributes
                    .remove(&wire_name)
                    .map(|value| (name.clone(), value))
            })
            .collect();

        let mut relationships = Vec::new();
        for (name, meta) in metadata.relationships() {
            let Some(relationship) = resource.relationships.remove(name) else {
                continue;
            };
            let target = Arc::clone(
                self.builder
                    .registry
                    .lookup(&meta.target_type)
                    .map_err(|_| {
                        ConverterError::config(format!(
                            "relationship `{name}` of `{}` targets unregistered type `{}`",
                            metadata.type_name(),
                            meta.target_type
                        ))
                    })?,
            );
            let related = self.link(name, meta, &target, &relationship)?;
            relationships.push((name.to_string(), related));
        }

        debug!(identifier = %resource.identifier, "Populating");
        self.pool
            .populate(&resource.identifier, attributes, relationships)
    }

    fn link(
        &mut self,
        name: &str,
        meta: &RelationshipMeta,
        target: &TypeMetadata,
        relationship: &Relationship,
    ) -> Result<Related> {
        let identifiers = match (&relationship.data, meta.cardinality) {
            (Linkage::Absent, _) => {
                return Ok(self
                    .resolve(meta, target, relationship)?
                    .unwrap_or_else(|| shape(meta.cardinality, Vec::new())));
            }
            (Linkage::ToOne(_), Cardinality::One) | (Linkage::ToMany(_), Cardinality::Many) => {
                relationship.data.identifiers()
            }
            (Linkage::ToOne(_), Cardinality::Many) => {
                return Err(ConverterError::CardinalityMismatch {
                    expected: "to-many relationship",
                    found: "to-one data",
                })
            }
            (Linkage::ToMany(_), Cardinality::One) => {
                return Err(ConverterError::CardinalityMismatch {
                    expected: "to-one relationship",
                    found: "to-many data",
                })
            }
        };

        let mut handles = Vec::with_capacity(identifiers.len());
        let mut missing = 0;
        for identifier in identifiers {
            expect_type(identifier, target.type_name())?;
            match self.pool.handle(identifier) {
                Some(handle) => handles.push(handle),
                None => missing += 1,
            }
        }

        if missing > 0 {
            debug!(relationship = name, missing, "Relationship data not in document");
            if let Some(resolved) = self.resolve(meta, target, relationship)? {
                return Ok(resolved);
            }
        }
        Ok(shape(meta.cardinality, handles))
    }

    /// Fetches a relationship through its `links.related` URL. `Ok(None)` when
    /// there is no URL or no resolver for the target type.
    fn resolve(
        &mut self,
        meta: &RelationshipMeta,
        target: &TypeMetadata,
        relationship: &Relationship,
    ) -> Result<Option<Related>> {
        let Some(url) = relationship.related_link() else {
            return Ok(None);
        };
        let Some(resolver) = self.builder.resolvers.resolver_for(target.type_name()) else {
            return Ok(None);
        };

        debug!(url, resource_type = target.type_name(), "Resolving relationship");
        let bytes = resolver.resolve(url).map_err(|source| {
            warn!(url, error = %source, "Resolver failed");
            ConverterError::Resolver {
                url: url.to_string(),
                source,
            }
        })?;

        let Document { data, included, .. } = Document::parse(&bytes)?;
        let resources = match (data, meta.cardinality) {
            (PrimaryData::Null, _) => Vec::new(),
            (PrimaryData::Single(resource), Cardinality::One) => vec![resource],
            (PrimaryData::Collection(resources), Cardinality::Many) => resources,
            (PrimaryData::Single(_), Cardinality::Many) => {
                return Err(ConverterError::CardinalityMismatch {
                    expected: "resource collection",
                    found: "single resource",
                })
            }
            (PrimaryData::Collection(_), Cardinality::One) => {
                return Err(ConverterError::CardinalityMismatch {
                    expected: "single resource",
                    found: "resource collection",
                })
            }
        };
        let identifiers = resources
            .iter()
            .map(|resource| expect_type(&resource.identifier, target.type_name()).cloned())
            .collect::<Result<Vec<_>>>()?;

        self.admit(resources);
        self.admit(included.into_values());

        let handles = identifiers
            .iter()
            .filter_map(|identifier| self.pool.handle(identifier))
            .collect();
        Ok(Some(shape(meta.cardinality, handles)))
    }
}

fn shape(cardinality: Cardinality, handles: Vec<RawRef>) -> Related {
    match cardinality {
        Cardinality::One => Related::One(handles.into_iter().next()),
        Cardinality::Many => Related::Many(handles),
    }
}

fn expect_type<'i>(
    identifier: &'i ResourceIdentifier,
    expected: &str,
) -> Result<&'i ResourceIdentifier> {
    if identifier.resource_type == expected {
        Ok(identifier)
    } else {
        Err(ConverterError::TypeMismatch {
            expected: expected.to_string(),
            found: identifier.resource_type.clone(),
        })
    }
}

//! # Resource Pool
//!
//! Per-call identity map: exactly one instance per [`ResourceIdentifier`] for
//! the lifetime of one conversion.
//!
//! Construction is split in two steps. [`ResourcePool::get_or_allocate`]
//! registers an empty instance under its identifier *before* any field is
//! filled; [`ResourcePool::populate`] fills it later. A relationship that
//! refers back to an instance still in progress therefore receives the same
//! handle instead of recursing, which is what makes cyclic documents
//! terminate.

use crate::error::{ConverterError, Result};
use crate::graph::ResourceGraph;
use crate::identifier::ResourceIdentifier;
use crate::registry::TypeMetadata;
use crate::resource::{RawRef, Related};
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// Where an entry is in its two-step construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionState {
    Allocated,
    Populated,
}

#[derive(Debug)]
struct PoolEntry {
    handle: RawRef,
    state: ConstructionState,
}

/// Identity map backing one conversion call. Not shared between calls.
#[derive(Debug, Default)]
pub struct ResourcePool {
    graph: ResourceGraph,
    entries: HashMap<ResourceIdentifier, PoolEntry>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle registered for `identifier`, allocating an empty
    /// instance of `metadata`'s type when there is none yet.
    pub fn get_or_allocate(
        &mut self,
        identifier: &ResourceIdentifier,
        metadata: &TypeMetadata,
    ) -> RawRef {
        if let Some(entry) = self.entries.get(identifier) {
            return entry.handle;
        }

        let mut instance = metadata.instantiate();
        instance.assign_id(identifier.id.clone());
        let handle = self.graph.push(instance);
        self.entries.insert(
            identifier.clone(),
            PoolEntry {
                handle,
                state: ConstructionState::Allocated,
            },
        );
        trace!(%identifier, "Allocated");
        handle
    }

    pub fn handle(&self, identifier: &ResourceIdentifier) -> Option<RawRef> {
        self.entries.get(identifier).map(|entry| entry.handle)
    }

    pub fn state(&self, identifier: &ResourceIdentifier) -> Option<ConstructionState> {
        self.entries.get(identifier).map(|entry| entry.state)
    }

    /// Fills a previously allocated instance. Each entry is populated once;
    /// a second call fails with [`ConverterError::AlreadyPopulated`] and leaves
    /// the instance untouched.
    pub fn populate(
        &mut self,
        identifier: &ResourceIdentifier,
        attributes: Vec<(String, Value)>,
        relationships: Vec<(String, Related)>,
    ) -> Result<()> {
        let entry = self.entries.get_mut(identifier).ok_or_else(|| {
            ConverterError::config(format!("{identifier} was populated before allocation"))
        })?;
        if entry.state == ConstructionState::Populated {
            return Err(ConverterError::AlreadyPopulated(identifier.clone()));
        }

        let instance = self
            .graph
            .erased_mut(entry.handle)
            .ok_or_else(|| ConverterError::config(format!("{identifier} has a dangling handle")))?;
        for (name, value) in attributes {
            instance
                .write_attribute(&name, value)
                .map_err(|source| ConverterError::Attribute {
                    resource: identifier.clone(),
                    attribute: name.clone(),
                    source,
                })?;
        }
        for (name, related) in relationships {
            instance.write_relationship(&name, related);
        }

        entry.state = ConstructionState::Populated;
        trace!(%identifier, "Populated");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ends the pool's lifetime and hands over the instances it built.
    pub fn into_graph(self) -> ResourceGraph {
        self.graph
    }
}

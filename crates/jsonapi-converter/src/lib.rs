//! # JSON:API Converter
//!
//! Converts JSON:API documents to and from graphs of typed Rust values.
//!
//! Reading a document resolves every relationship it can: inline identifiers
//! are linked to resources from `data` or `included`, and relationships that
//! only carry a `links.related` URL can be fetched through a caller-supplied
//! resolver. Writing walks the graph and emits `data` plus a deduplicated
//! `included` section.
//!
//! ## Architecture Overview
//!
//! 1. **Type layer** ([`Resource`], [`TypeRegistry`]): each Rust type declares
//!    its wire type name, its id field, its attributes and its relationships.
//! 2. **Document layer** ([`Document`]): structural parse of the wire format,
//!    with no knowledge of Rust types.
//! 3. **Graph layer** ([`ResourcePool`], [`GraphBuilder`], [`ResourceGraph`]):
//!    allocate-then-populate construction keyed by [`ResourceIdentifier`], so
//!    shared references and cycles come out as shared [`Ref`] handles.
//! 4. **Facade** ([`ResourceConverter`]): the frozen configuration plus the
//!    four read/write operations.
//!
//! ## Object graphs
//!
//! Relationship fields hold [`Ref<T>`] handles into a [`ResourceGraph`] arena
//! instead of owning their targets. A user whose statuses point back at the
//! user is therefore just two indices pointing at each other:
//!
//! ```text
//! ResourceGraph
//!   [0] users:1     statuses = [Ref(1), Ref(2)]
//!   [1] statuses:10 user = Some(Ref(0))
//!   [2] statuses:11 user = Some(Ref(0))
//! ```
//!
//! Within one read, one `(type, id)` always maps to one slot. Across reads
//! nothing is shared: every call builds a fresh graph.
//!
//! ## Errors
//!
//! Every call is all-or-nothing and returns [`ConverterError`]. See the
//! [`error`] module for the variants.
//!
//! ## Testing
//!
//! [`mock::MockResolver`] stands in for network-backed resolvers. Logging goes
//! through `tracing`; binaries install a subscriber with
//! [`logging::setup_tracing`].

pub mod builder;
pub mod converter;
pub mod document;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod logging;
pub mod mock;
pub mod naming;
pub mod pool;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod serializer;

pub use builder::{Built, GraphBuilder};
pub use converter::{ConverterBuilder, ResourceConverter};
pub use document::{Document, Linkage, PrimaryData, Relationship, ResourceObject};
pub use error::{BoxError, ConverterError, Result};
pub use graph::{Materialized, ResourceGraph};
pub use identifier::ResourceIdentifier;
pub use naming::NamingStrategy;
pub use pool::{ConstructionState, ResourcePool};
pub use registry::{TypeDescriptor, TypeMetadata, TypeRegistry};
pub use resolver::{resolver_fn, RelationshipResolver, ResolverRegistry};
pub use resource::{
    Cardinality, FieldDescriptor, FieldKind, RawRef, Ref, Related, RelationshipMeta, Resource,
};
pub use serializer::Serializer;

//! # JSON:API Recipe
//!
//! > **Typed JSON:API documents in Rust, cycles and all.**
//!
//! This workspace shows how to read JSON:API documents into graphs of typed
//! Rust values and write them back, with relationships resolved from the
//! document's `included` section or fetched on demand.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Arena instead of `Rc<RefCell<_>>`
//! Relationship fields hold copyable [`Ref<T>`](converter::Ref) handles into a
//! [`ResourceGraph`](converter::ResourceGraph). A status pointing at its user,
//! whose statuses point back at the status, is just indices; no reference
//! counting and no interior mutability.
//!
//! ### Allocate, then populate
//! Every resource in a document is allocated in the identity map before any
//! field is filled. A relationship pointing at something still being built
//! gets the same handle, which is what lets cycles terminate.
//!
//! ### Configure once, share freely
//! [`ResourceConverter`](converter::ResourceConverter) is frozen at `build()`
//! and is `Clone + Send + Sync`. Each call gets its own identity map.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Library ([`converter`])
//! - **Role**: type registry, document parser, resource pool, resolvers,
//!   graph builder and serializer.
//! - **Key items**: [`Resource`](converter::Resource),
//!   [`ResourceConverter`](converter::ResourceConverter),
//!   [`RelationshipResolver`](converter::RelationshipResolver).
//!
//! ### 2. The Sample ([`sample`])
//! - **Role**: a feed domain (statuses ↔ users) and a blog domain (articles,
//!   people, comments), the fixture documents, and converter wiring.
//! - **Key items**: [`SampleConverters`](sample::lifecycle::SampleConverters),
//!   [`StaticResolver`](sample::resolvers::StaticResolver).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run -p jsonapi-sample
//!
//! # Run every test in the workspace
//! cargo test --workspace
//! ```

pub use jsonapi_converter as converter;
pub use jsonapi_sample as sample;

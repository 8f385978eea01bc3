//! # JSON:API Sample
//!
//! Sample domains, fixture documents and converter wiring used by the demo
//! binary and by the integration tests.

pub mod fixtures;
pub mod lifecycle;
pub mod model;
pub mod resolvers;

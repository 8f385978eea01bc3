//! # Logging
//!
//! The converter emits `tracing` events and never installs a subscriber
//! itself. Binaries and tests call [`setup_tracing`] once at startup.
//!
//! ## What gets logged
//!
//! - **Registration**: one `DEBUG Registered type` event per resource type.
//! - **Reads**: `DEBUG` per populated resource and per resolver call, `INFO`
//!   summary with the number of resources built.
//! - **Writes**: `INFO` summary with the number of included resources.
//! - **Resolver failures**: `WARN Resolver failed url=... error=...`.
//!
//! ## Usage
//!
//! ```bash
//! # Summaries only
//! RUST_LOG=info cargo run -p jsonapi-sample
//!
//! # Every resource and resolver call
//! RUST_LOG=jsonapi_converter=debug cargo run -p jsonapi-sample
//!
//! # Pool allocation as well
//! RUST_LOG=jsonapi_converter=trace cargo run -p jsonapi-sample
//! ```
//!
//! Example output at `debug`:
//!
//! ```text
//! DEBUG Registered type resource_type="statuses" attributes=3 relationships=2
//! DEBUG Resolving relationship url="https://api.test/users/1" resource_type="users"
//! DEBUG Populating identifier=users:1
//! INFO read_object: Read complete resource_type="statuses" resources=2
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

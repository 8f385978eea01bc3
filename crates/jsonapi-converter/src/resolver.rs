//! # Relationship Resolvers
//!
//! A relationship that arrives without identifier data but with a
//! `links.related` URL can be fetched through a caller-supplied resolver. The
//! resolver returns the raw bytes of a complete document; the graph builder
//! parses it and merges its resources into the same identity map as the
//! document being read.
//!
//! Lookup precedence for a relationship whose target type is `T`:
//! 1. the resolver registered for `T`,
//! 2. the global resolver,
//! 3. none: the relationship stays empty, which is not an error.
//!
//! Resolvers run synchronously on the caller's thread. Timeouts, retries and
//! cancellation belong to the resolver implementation; a resolver error aborts
//! the whole conversion.

use crate::error::BoxError;
use crate::resource::Resource;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Fetches the document behind a relationship URL.
pub trait RelationshipResolver: Send + Sync {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, BoxError>;
}

impl<R: RelationshipResolver + ?Sized> RelationshipResolver for Arc<R> {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        (**self).resolve(url)
    }
}

/// Adapter returned by [`resolver_fn`].
pub struct FnResolver<F>(F);

impl<F> RelationshipResolver for FnResolver<F>
where
    F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn resolve(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        (self.0)(url)
    }
}

/// Wraps a closure as a [`RelationshipResolver`].
///
/// ```rust
/// use jsonapi_converter::{resolver_fn, RelationshipResolver};
///
/// let resolver = resolver_fn(|url| {
///     Ok(format!(r#"{{"data": null, "meta": {{"url": "{url}"}}}}"#).into_bytes())
/// });
/// assert!(resolver.resolve("http://example.com/users/1").is_ok());
/// ```
pub fn resolver_fn<F>(f: F) -> FnResolver<F>
where
    F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    FnResolver(f)
}

/// Global and per-type resolvers.
///
/// Configure it before handing it to a converter; afterwards it is only read.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    global: Option<Arc<dyn RelationshipResolver>>,
    by_type: HashMap<String, Arc<dyn RelationshipResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback resolver used for every target type without its own.
    pub fn set_global_resolver(&mut self, resolver: impl RelationshipResolver + 'static) {
        self.global = Some(Arc::new(resolver));
    }

    /// Sets the resolver for relationships whose target is `target_type`.
    pub fn set_type_resolver(
        &mut self,
        resolver: impl RelationshipResolver + 'static,
        target_type: impl Into<String>,
    ) {
        self.by_type.insert(target_type.into(), Arc::new(resolver));
    }

    pub fn set_type_resolver_for<T: Resource>(
        &mut self,
        resolver: impl RelationshipResolver + 'static,
    ) {
        self.set_type_resolver(resolver, T::TYPE);
    }

    /// Picks the resolver for `target_type`: type-specific first, then global.
    pub fn resolver_for(&self, target_type: &str) -> Option<&dyn RelationshipResolver> {
        self.by_type
            .get(target_type)
            .or(self.global.as_ref())
            .map(|resolver| &**resolver)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.by_type.is_empty()
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.by_type.keys().collect();
        types.sort();
        f.debug_struct("ResolverRegistry")
            .field("global", &self.global.is_some())
            .field("by_type", &types)
            .finish()
    }
}

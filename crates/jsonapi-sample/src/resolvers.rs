//! # Static Resolver
//!
//! A [`RelationshipResolver`] backed by a fixed URL-to-document table. It plays
//! the part an HTTP client would play in production: the converter hands it a
//! `related` URL and gets the document bytes back.

use jsonapi_converter::{BoxError, RelationshipResolver};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StaticResolverError {
    #[error("No document registered for `{0}`")]
    UnknownUrl(String),
}

/// Serves canned documents by URL.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    documents: HashMap<String, Vec<u8>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(url.into(), body.into());
        self
    }

    /// Answers every URL with the same document.
    pub fn always(body: impl Into<Vec<u8>>) -> AlwaysResolver {
        AlwaysResolver(body.into())
    }
}

impl RelationshipResolver for StaticResolver {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        debug!(url, "Serving static document");
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| StaticResolverError::UnknownUrl(url.to_string()).into())
    }
}

/// Resolver returned by [`StaticResolver::always`].
#[derive(Debug, Clone)]
pub struct AlwaysResolver(Vec<u8>);

impl RelationshipResolver for AlwaysResolver {
    fn resolve(&self, _url: &str) -> Result<Vec<u8>, BoxError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_registered_urls_only() {
        let resolver = StaticResolver::new().with("https://a.test/1", "{}");

        assert_eq!(resolver.resolve("https://a.test/1").unwrap(), b"{}");
        let err = resolver.resolve("https://a.test/2").unwrap_err();
        assert_eq!(err.to_string(), "No document registered for `https://a.test/2`");
    }

    #[test]
    fn always_ignores_the_url() {
        let resolver = StaticResolver::always("x");
        assert_eq!(resolver.resolve("anything").unwrap(), b"x");
    }
}

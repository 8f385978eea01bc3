//! # Converter Wiring
//!
//! Builds the converters the sample uses. Configuration happens exactly once
//! here; afterwards the converters are immutable and can be cloned into any
//! thread that needs them.
//!
//! | Converter | Types | Attribute names |
//! |-----------|-------|-----------------|
//! | `feed` | [`Status`], [`User`] | camelCase (`commentCount`) |
//! | `blog` | [`Article`], [`Author`], [`Comment`] | kebab-case (`first-name`) |
//!
//! Resolvers only matter for the feed: blog documents always arrive as
//! compound documents with everything in `included`.

use crate::model::{Article, Author, Comment, Status, User};
use jsonapi_converter::{NamingStrategy, ResolverRegistry, ResourceConverter, Result};
use tracing::info;

/// The converters for both sample domains.
#[derive(Debug, Clone)]
pub struct SampleConverters {
    pub feed: ResourceConverter,
    pub blog: ResourceConverter,
}

impl SampleConverters {
    /// Builds both converters; `feed_resolvers` is used by the feed converter.
    pub fn new(feed_resolvers: ResolverRegistry) -> Result<Self> {
        let feed = feed_converter(feed_resolvers)?;
        let blog = blog_converter()?;
        info!(
            feed_types = feed.registry().len(),
            blog_types = blog.registry().len(),
            "Converters ready"
        );
        Ok(Self { feed, blog })
    }
}

pub fn feed_converter(resolvers: ResolverRegistry) -> Result<ResourceConverter> {
    ResourceConverter::builder()
        .register::<Status>()
        .register::<User>()
        .naming(NamingStrategy::CamelCase)
        .resolvers(resolvers)
        .build()
}

pub fn blog_converter() -> Result<ResourceConverter> {
    ResourceConverter::builder()
        .register::<Article>()
        .register::<Author>()
        .register::<Comment>()
        .naming(NamingStrategy::KebabCase)
        .build()
}

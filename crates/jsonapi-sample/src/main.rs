//! # JSON:API Converter Sample
//!
//! Walks through the converter on the bundled fixtures:
//! 1. reads a compound status document and follows the user ↔ status cycle,
//! 2. reads a compact status whose user is fetched through a resolver,
//! 3. reads the kebab-case blog document,
//! 4. writes a hand-built graph back to the wire.
//!
//! Run with `RUST_LOG=info` for summaries or `RUST_LOG=debug` to see every
//! resource and resolver call.

use jsonapi_converter::logging::setup_tracing;
use jsonapi_converter::{ResolverRegistry, ResourceGraph};
use jsonapi_sample::fixtures;
use jsonapi_sample::lifecycle::SampleConverters;
use jsonapi_sample::model::{Article, Status, User};
use jsonapi_sample::resolvers::StaticResolver;
use tracing::{info, info_span};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let mut resolvers = ResolverRegistry::new();
    resolvers.set_type_resolver_for::<User>(
        StaticResolver::new().with(fixtures::STATUS_USER_URL, fixtures::USER_JOHN),
    );
    let converters = SampleConverters::new(resolvers)?;

    {
        let _span = info_span!("compound").entered();
        let read = converters.feed.read_object::<Status>(fixtures::STATUS)?;
        let graph = read.graph();
        if let Some(status) = read.root() {
            if let Some(user) = status.user.and_then(|user| graph.get(user)) {
                let contents: Vec<&str> = graph
                    .get_all(&user.statuses)
                    .map(|status| status.content.as_str())
                    .collect();
                info!(user = %user.name, statuses = ?contents, "Status author");
            }
        }
    }

    {
        let _span = info_span!("resolved").entered();
        let read = converters.feed.read_object::<Status>(fixtures::STATUS_COMPACT)?;
        let user = read
            .root()
            .and_then(|status| status.user)
            .and_then(|user| read.graph().get(user));
        info!(user = ?user.map(|user| &user.name), "Resolved through link");
    }

    {
        let _span = info_span!("blog").entered();
        let read = converters.blog.read_collection::<Article>(fixtures::ARTICLES)?;
        for article in read.items() {
            let author = article.author.and_then(|author| read.graph().get(author));
            info!(
                title = %article.title,
                author = ?author.map(|author| &author.first_name),
                comments = article.comments.len(),
                "Article"
            );
        }
    }

    {
        let _span = info_span!("write").entered();
        let mut graph = ResourceGraph::new();
        let liz = graph.insert(User::new("1", "liz"));
        let status = graph.insert(Status {
            comment_count: 2,
            like_count: 5,
            user: Some(liz),
            related_user: Some(liz),
            ..Status::new("7", "Written from Rust")
        });
        if let Some(user) = graph.get_mut(liz) {
            user.statuses.push(status);
        }

        let bytes = converters.feed.write_object(&graph, status)?;
        info!(document = %String::from_utf8_lossy(&bytes), "Written");
    }

    Ok(())
}

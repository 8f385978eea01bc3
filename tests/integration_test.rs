use jsonapi_recipe::converter::mock::MockResolver;
use jsonapi_recipe::converter::{ResolverRegistry, Ref};
use jsonapi_recipe::sample::fixtures;
use jsonapi_recipe::sample::lifecycle::SampleConverters;
use jsonapi_recipe::sample::model::{Article, Comment, Status, User};
use serde_json::Value;
use std::thread;

/// Full end-to-end test: both converters, a resolver double, and a write of
/// what was read.
#[test]
fn test_full_sample_system() {
    let resolver = MockResolver::new();
    resolver
        .expect_resolve(fixtures::STATUS_USER_URL)
        .return_ok(fixtures::USER_JOHN);
    let mut resolvers = ResolverRegistry::new();
    resolvers.set_type_resolver_for::<User>(resolver.clone());

    let converters = SampleConverters::new(resolvers).unwrap();

    // Compact status: user fetched through the link.
    let read = converters
        .feed
        .read_object::<Status>(fixtures::STATUS_COMPACT)
        .unwrap();
    let user = read
        .graph()
        .get(read.root().unwrap().user.unwrap())
        .unwrap();
    assert_eq!(user.name, "john");
    resolver.verify();

    // Write the resolved graph back out: the fetched user lands in `included`.
    let bytes = converters
        .feed
        .write_object(read.graph(), read.primary().unwrap())
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["data"]["attributes"]["commentCount"], 1);
    assert_eq!(value["included"][0]["type"], "users");
    assert_eq!(value["included"][0]["attributes"]["name"], "john");
}

#[test]
fn test_blog_round_trip_keeps_structure() {
    let converters = SampleConverters::new(ResolverRegistry::new()).unwrap();
    let first = converters
        .blog
        .read_collection::<Article>(fixtures::ARTICLES)
        .unwrap();

    let bytes = converters
        .blog
        .write_collection(first.graph(), first.primary())
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["included"][0]["attributes"]["first-name"], "Dan");

    let second = converters
        .blog
        .read_collection::<Article>(&bytes)
        .unwrap();
    let article = second.items().next().unwrap();
    assert_eq!(article.title, "JSON API paints my bikeshed!");

    let bodies: Vec<&str> = second
        .graph()
        .get_all(&article.comments)
        .map(|comment: &Comment| comment.body.as_str())
        .collect();
    assert_eq!(bodies, ["First!", "I like XML better"]);

    let author = second.graph().get(article.author.unwrap()).unwrap();
    assert_eq!(author.twitter.as_deref(), Some("dgeb"));
}

#[test]
fn test_converter_is_shared_across_threads() {
    let converters = SampleConverters::new(ResolverRegistry::new()).unwrap();

    let names: Vec<Vec<String>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let feed = converters.feed.clone();
                scope.spawn(move || {
                    let read = feed.read_collection::<User>(fixtures::USERS).unwrap();
                    read.items()
                        .map(|user| user.name.clone())
                        .collect::<Vec<String>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for run in names {
        assert_eq!(run, ["liz", "john"]);
    }
}

#[test]
fn test_each_read_builds_a_fresh_graph() {
    let converters = SampleConverters::new(ResolverRegistry::new()).unwrap();
    let a = converters.feed.read_object::<Status>(fixtures::STATUS).unwrap();
    let b = converters.feed.read_object::<Status>(fixtures::STATUS).unwrap();

    let (mut graph_a, root_a) = a.into_parts();
    let root_a: Ref<Status> = root_a.unwrap();
    graph_a.get_mut(root_a).unwrap().content = "edited".into();

    assert_eq!(b.root().unwrap().content, "Rust ownership finally clicked");
}

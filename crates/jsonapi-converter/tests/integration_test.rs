use jsonapi_converter::mock::{MockError, MockResolver};
use jsonapi_converter::{
    ConverterError, FieldDescriptor, Ref, Related, Resource, ResourceConverter, ResourceGraph,
};
use serde_json::{json, Value};

// --- Test Resources ---

#[derive(Debug, Default)]
struct Message {
    id: String,
    text: String,
    sender: Option<Ref<Account>>,
    audience: Vec<Ref<Account>>,
    reply_to: Option<Ref<Message>>,
}

#[derive(Debug, Default)]
struct Account {
    id: String,
    name: String,
    pinned: Option<Ref<Message>>,
}

impl Resource for Message {
    const TYPE: &'static str = "messages";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("text"),
            FieldDescriptor::to_one("sender", "user"),
            FieldDescriptor::to_many("audience", "user"),
            FieldDescriptor::to_one("reply_to", "messages").not_serializable(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn attribute(&self, name: &str) -> serde_json::Result<Value> {
        match name {
            "text" => serde_json::to_value(&self.text),
            _ => Ok(Value::Null),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        if name == "text" {
            self.text = serde_json::from_value(value)?;
        }
        Ok(())
    }

    fn relationship(&self, name: &str) -> Option<Related> {
        match name {
            "sender" => Some(Related::one(self.sender)),
            "audience" => Some(Related::many(&self.audience)),
            "reply_to" => Some(Related::one(self.reply_to)),
            _ => None,
        }
    }

    fn set_relationship(&mut self, name: &str, related: Related) {
        match name {
            "sender" => self.sender = related.to_one(),
            "audience" => self.audience = related.to_many(),
            "reply_to" => self.reply_to = related.to_one(),
            _ => {}
        }
    }
}

impl Resource for Account {
    const TYPE: &'static str = "user";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("name"),
            FieldDescriptor::to_one("pinned", "messages"),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn attribute(&self, name: &str) -> serde_json::Result<Value> {
        match name {
            "name" => serde_json::to_value(&self.name),
            _ => Ok(Value::Null),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        if name == "name" {
            self.name = serde_json::from_value(value)?;
        }
        Ok(())
    }

    fn relationship(&self, name: &str) -> Option<Related> {
        (name == "pinned").then(|| Related::one(self.pinned))
    }

    fn set_relationship(&mut self, name: &str, related: Related) {
        if name == "pinned" {
            self.pinned = related.to_one();
        }
    }
}

fn converter() -> ResourceConverter {
    ResourceConverter::builder()
        .register::<Message>()
        .register::<Account>()
        .build()
        .unwrap()
}

const LINKED_SENDER: &str = r#"{
    "data": {
        "type": "messages",
        "id": "1",
        "attributes": {"text": "hello"},
        "relationships": {
            "sender": {"links": {"related": "http://api.test/messages/1/sender"}}
        }
    }
}"#;

// --- Tests ---

#[test]
fn test_included_resource_is_linked() {
    let read = converter()
        .read_object::<Message>(
            br#"{
                "data": {"type": "messages", "id": "1",
                    "relationships": {"sender": {"data": {"type": "user", "id": "42"}}}},
                "included": [{"type": "user", "id": "42", "attributes": {"name": "john"}}]
            }"#,
        )
        .unwrap();

    let message = read.root().unwrap();
    let sender = read.graph().get(message.sender.unwrap()).unwrap();
    assert_eq!(sender.id, "42");
    assert_eq!(sender.name, "john");
}

#[test]
fn test_shared_and_cyclic_references() {
    let read = converter()
        .read_object::<Message>(
            br#"{
                "data": {"type": "messages", "id": "1", "relationships": {
                    "sender": {"data": {"type": "user", "id": "42"}},
                    "audience": {"data": [{"type": "user", "id": "42"}, {"type": "user", "id": "7"}]}
                }},
                "included": [
                    {"type": "user", "id": "42", "relationships": {
                        "pinned": {"data": {"type": "messages", "id": "1"}}}},
                    {"type": "user", "id": "7"}
                ]
            }"#,
        )
        .unwrap();

    let root_ref = read.primary().unwrap();
    let message = read.root().unwrap();
    assert_eq!(message.sender, Some(message.audience[0]));
    assert_ne!(message.audience[0], message.audience[1]);

    let sender = read.graph().get(message.sender.unwrap()).unwrap();
    assert_eq!(sender.pinned, Some(root_ref));
    assert_eq!(read.graph().len(), 3);
}

#[test]
fn test_collection_preserves_order() {
    let read = converter()
        .read_collection::<Account>(
            br#"{"data": [
                {"type": "user", "id": "1", "attributes": {"name": "liz"}},
                {"type": "user", "id": "2", "attributes": {"name": "john"}}
            ]}"#,
        )
        .unwrap();

    let names: Vec<(&str, &str)> = read
        .items()
        .map(|account| (account.id.as_str(), account.name.as_str()))
        .collect();
    assert_eq!(names, [("1", "liz"), ("2", "john")]);
}

#[test]
fn test_type_resolver_wins_over_global() {
    let global = MockResolver::new();
    let typed = MockResolver::new();
    typed
        .expect_resolve("http://api.test/messages/1/sender")
        .return_ok(r#"{"data": {"type": "user", "id": "2", "attributes": {"name": "john"}}}"#);

    let converter = ResourceConverter::builder()
        .register::<Message>()
        .register::<Account>()
        .global_resolver(global.clone())
        .type_resolver::<Account>(typed.clone())
        .build()
        .unwrap();

    let read = converter
        .read_object::<Message>(LINKED_SENDER.as_bytes())
        .unwrap();
    let sender = read.graph().get(read.root().unwrap().sender.unwrap()).unwrap();

    assert_eq!(sender.name, "john");
    typed.verify();
    assert!(global.calls().is_empty());
}

#[test]
fn test_global_resolver_is_the_fallback() {
    let global = MockResolver::new();
    global
        .expect_resolve("http://api.test/messages/1/sender")
        .return_ok(r#"{"data": {"type": "user", "id": "1", "attributes": {"name": "liz"}}}"#);

    let converter = ResourceConverter::builder()
        .register::<Message>()
        .register::<Account>()
        .global_resolver(global.clone())
        .build()
        .unwrap();

    let read = converter
        .read_object::<Message>(LINKED_SENDER.as_bytes())
        .unwrap();
    let sender = read.graph().get(read.root().unwrap().sender.unwrap()).unwrap();
    assert_eq!(sender.name, "liz");
    global.verify();
}

#[test]
fn test_no_resolver_leaves_relationship_empty() {
    let read = converter()
        .read_object::<Message>(LINKED_SENDER.as_bytes())
        .unwrap();
    assert!(read.root().unwrap().sender.is_none());
}

#[test]
fn test_resolver_error_aborts_read() {
    let resolver = MockResolver::new();
    resolver
        .expect_resolve("http://api.test/messages/1/sender")
        .return_err("503 Service Unavailable");

    let converter = ResourceConverter::builder()
        .register::<Message>()
        .register::<Account>()
        .global_resolver(resolver)
        .build()
        .unwrap();

    let err = converter
        .read_object::<Message>(LINKED_SENDER.as_bytes())
        .unwrap_err();
    match err {
        ConverterError::Resolver { url, source } => {
            assert_eq!(url, "http://api.test/messages/1/sender");
            assert_eq!(
                source.downcast_ref::<MockError>(),
                Some(&MockError::Injected("503 Service Unavailable".into()))
            );
        }
        other => panic!("expected a resolver error, got {other:?}"),
    }
}

#[test]
fn test_invalid_documents_are_rejected() {
    let converter = converter();

    let bodies: [&[u8]; 2] = [b"{}", br#"{"data": "attribute"}"#];
    for body in bodies {
        let err = converter.read_object::<Message>(body).unwrap_err();
        assert!(matches!(err, ConverterError::DocumentFormat(_)), "{err:?}");
    }

    let err = converter.read_object::<Message>(b"{\"data\": ").unwrap_err();
    assert!(matches!(err, ConverterError::Json(_)));
}

#[test]
fn test_cardinality_is_enforced() {
    let converter = converter();
    let collection = br#"{"data": [{"type": "messages", "id": "1"}]}"#;
    let single = br#"{"data": {"type": "messages", "id": "1"}}"#;

    assert!(matches!(
        converter.read_object::<Message>(collection),
        Err(ConverterError::CardinalityMismatch { .. })
    ));
    assert!(matches!(
        converter.read_collection::<Message>(single),
        Err(ConverterError::CardinalityMismatch { .. })
    ));
}

#[test]
fn test_write_deduplicates_included_and_skips_private_relationships() {
    let mut graph = ResourceGraph::new();
    let liz = graph.insert(Account {
        id: "1".into(),
        name: "liz".into(),
        pinned: None,
    });
    let earlier = graph.insert(Message {
        id: "9".into(),
        text: "earlier".into(),
        ..Default::default()
    });
    let message = graph.insert(Message {
        id: "10".into(),
        text: "hi".into(),
        sender: Some(liz),
        audience: vec![liz, liz],
        reply_to: Some(earlier),
    });
    // Cycle back to the primary resource.
    graph.get_mut(liz).unwrap().pinned = Some(message);

    let bytes = converter().write_object(&graph, message).unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        value,
        json!({
            "data": {
                "type": "messages",
                "id": "10",
                "attributes": {"text": "hi"},
                "relationships": {
                    "audience": {"data": [{"type": "user", "id": "1"}, {"type": "user", "id": "1"}]},
                    "sender": {"data": {"type": "user", "id": "1"}}
                }
            },
            "included": [{
                "type": "user",
                "id": "1",
                "attributes": {"name": "liz"},
                "relationships": {"pinned": {"data": {"type": "messages", "id": "10"}}}
            }]
        })
    );
}

#[test]
fn test_round_trip_drops_only_private_relationships() {
    let converter = converter();
    let mut graph = ResourceGraph::new();
    let john = graph.insert(Account {
        id: "2".into(),
        name: "john".into(),
        pinned: None,
    });
    let earlier = graph.insert(Message {
        id: "1".into(),
        ..Default::default()
    });
    let message = graph.insert(Message {
        id: "2".into(),
        text: "round trip".into(),
        sender: Some(john),
        audience: Vec::new(),
        reply_to: Some(earlier),
    });

    let bytes = converter.write_object(&graph, message).unwrap();
    let read = converter.read_object::<Message>(&bytes).unwrap();
    let copy = read.root().unwrap();

    assert_eq!(copy.id, "2");
    assert_eq!(copy.text, "round trip");
    assert!(copy.reply_to.is_none());
    assert!(copy.audience.is_empty());
    assert_eq!(read.graph().get(copy.sender.unwrap()).unwrap().name, "john");
}

#[test]
fn test_write_collection_keeps_primaries_out_of_included() {
    let mut graph = ResourceGraph::new();
    let first = graph.insert(Account {
        id: "1".into(),
        ..Default::default()
    });
    let second = graph.insert(Account {
        id: "2".into(),
        ..Default::default()
    });
    let note = graph.insert(Message {
        id: "5".into(),
        sender: Some(second),
        ..Default::default()
    });
    graph.get_mut(first).unwrap().pinned = Some(note);

    let bytes = converter()
        .write_collection(&graph, &[first, second])
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    let ids: Vec<&str> = value["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|resource| resource["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "2"]);

    let included = value["included"].as_array().unwrap();
    assert_eq!(included.len(), 1);
    assert_eq!(included[0]["type"], "messages");
    assert_eq!(included[0]["relationships"]["audience"]["data"], json!([]));
}

use super::Status;
use jsonapi_converter::{FieldDescriptor, Ref, Related, Resource};
use serde_json::Value;

/// Owner of a feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub statuses: Vec<Ref<Status>>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            statuses: Vec::new(),
        }
    }
}

impl Resource for User {
    const TYPE: &'static str = "users";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("name"),
            FieldDescriptor::to_many("statuses", Status::TYPE),
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
        (name == "statuses").then(|| Related::many(&self.statuses))
    }

    fn set_relationship(&mut self, name: &str, related: Related) {
        if name == "statuses" {
            self.statuses = related.to_many();
        }
    }
}

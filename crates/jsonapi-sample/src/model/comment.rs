use super::Author;
use jsonapi_converter::{FieldDescriptor, Ref, Related, Resource};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: Option<Ref<Author>>,
}

impl Resource for Comment {
    const TYPE: &'static str = "comments";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("body"),
            FieldDescriptor::to_one("author", Author::TYPE),
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
            "body" => serde_json::to_value(&self.body),
            _ => Ok(Value::Null),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        if name == "body" {
            self.body = serde_json::from_value(value)?;
        }
        Ok(())
    }

    fn relationship(&self, name: &str) -> Option<Related> {
        (name == "author").then(|| Related::one(self.author))
    }

    fn set_relationship(&mut self, name: &str, related: Related) {
        if name == "author" {
            self.author = related.to_one();
        }
    }
}

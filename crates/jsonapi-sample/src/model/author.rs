use jsonapi_converter::{FieldDescriptor, Resource};
use serde_json::Value;

/// Travels as `people` with kebab-case attributes (`first-name`, `last-name`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub twitter: Option<String>,
}

impl Resource for Author {
    const TYPE: &'static str = "people";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("first_name"),
            FieldDescriptor::attribute("last_name"),
            FieldDescriptor::attribute("twitter"),
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
            "first_name" => serde_json::to_value(&self.first_name),
            "last_name" => serde_json::to_value(&self.last_name),
            "twitter" => serde_json::to_value(&self.twitter),
            _ => Ok(Value::Null),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        match name {
            "first_name" => self.first_name = serde_json::from_value(value)?,
            "last_name" => self.last_name = serde_json::from_value(value)?,
            "twitter" => self.twitter = serde_json::from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}

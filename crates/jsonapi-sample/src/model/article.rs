use super::{Author, Comment};
use jsonapi_converter::{FieldDescriptor, Ref, Related, Resource};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub author: Option<Ref<Author>>,
    pub comments: Vec<Ref<Comment>>,
}

impl Resource for Article {
    const TYPE: &'static str = "articles";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("title"),
            FieldDescriptor::to_one("author", Author::TYPE),
            FieldDescriptor::to_many("comments", Comment::TYPE),
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
            "title" => serde_json::to_value(&self.title),
            _ => Ok(Value::Null),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        if name == "title" {
            self.title = serde_json::from_value(value)?;
        }
        Ok(())
    }

    fn relationship(&self, name: &str) -> Option<Related> {
        match name {
            "author" => Some(Related::one(self.author)),
            "comments" => Some(Related::many(&self.comments)),
            _ => None,
        }
    }

    fn set_relationship(&mut self, name: &str, related: Related) {
        match name {
            "author" => self.author = related.to_one(),
            "comments" => self.comments = related.to_many(),
            _ => {}
        }
    }
}

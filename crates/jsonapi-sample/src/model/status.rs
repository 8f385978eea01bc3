use super::User;
use jsonapi_converter::{FieldDescriptor, Ref, Related, Resource};
use serde_json::Value;

/// A post in a user's feed.
///
/// `related_user` is kept in memory only: it is declared non-serializable, so
/// writing a status never emits it and reading one never fills it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub id: String,
    pub content: String,
    pub comment_count: i64,
    pub like_count: i64,
    pub user: Option<Ref<User>>,
    pub related_user: Option<Ref<User>>,
}

impl Status {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

impl Resource for Status {
    const TYPE: &'static str = "statuses";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::id("id"),
            FieldDescriptor::attribute("content"),
            FieldDescriptor::attribute("comment_count"),
            FieldDescriptor::attribute("like_count"),
            FieldDescriptor::to_one("user", User::TYPE),
            FieldDescriptor::to_one("related_user", User::TYPE).not_serializable(),
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
            "content" => serde_json::to_value(&self.content),
            "comment_count" => serde_json::to_value(self.comment_count),
            "like_count" => serde_json::to_value(self.like_count),
            _ => Ok(Value::Null),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> serde_json::Result<()> {
        match name {
            "content" => self.content = serde_json::from_value(value)?,
            "comment_count" => self.comment_count = serde_json::from_value(value)?,
            "like_count" => self.like_count = serde_json::from_value(value)?,
            _ => {}
        }
        Ok(())
    }

    fn relationship(&self, name: &str) -> Option<Related> {
        match name {
            "user" => Some(Related::one(self.user)),
            "related_user" => Some(Related::one(self.related_user)),
            _ => None,
        }
    }

    fn set_relationship(&mut self, name: &str, related: Related) {
        match name {
            "user" => self.user = related.to_one(),
            "related_user" => self.related_user = related.to_one(),
            _ => {}
        }
    }
}

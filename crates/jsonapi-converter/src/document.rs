//! # Document Model
//!
//! The parsed, structure-validated form of a wire document. Parsing stops at
//! structure: no relationship is followed and no typed instance is created
//! here. That is the [`GraphBuilder`](crate::builder::GraphBuilder)'s job.
//!
//! Tokenizing is delegated to `serde_json`; this module walks the resulting
//! [`Value`] tree and applies the checks needed to tell a single resource from
//! a collection.

use crate::error::{ConverterError, Result};
use crate::identifier::ResourceIdentifier;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level or per-resource `links` object.
pub type Links = Map<String, Value>;

/// Free-form `meta` object.
pub type Meta = Map<String, Value>;

/// Identifier data carried by a relationship.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Linkage {
    /// No `data` key at all; the relationship may still carry links.
    #[default]
    Absent,
    /// `data` is `null` or a single identifier.
    ToOne(Option<ResourceIdentifier>),
    /// `data` is an array of identifiers.
    ToMany(Vec<ResourceIdentifier>),
}

impl Linkage {
    /// Identifiers named by this linkage, in document order.
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self {
            Linkage::Absent | Linkage::ToOne(None) => Vec::new(),
            Linkage::ToOne(Some(ident)) => vec![ident],
            Linkage::ToMany(idents) => idents.iter().collect(),
        }
    }
}

/// One entry of a resource's `relationships` object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Relationship {
    pub data: Linkage,
    pub links: Option<Links>,
    pub meta: Option<Meta>,
}

impl Relationship {
    /// The `links.related` URL, given either as a string or as `{ "href": .. }`.
    pub fn related_link(&self) -> Option<&str> {
        match self.links.as_ref()?.get("related")? {
            Value::String(url) => Some(url),
            Value::Object(link) => link.get("href").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// A single resource as it appears on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject {
    pub identifier: ResourceIdentifier,
    pub attributes: Map<String, Value>,
    pub relationships: BTreeMap<String, Relationship>,
    pub links: Option<Links>,
    pub meta: Option<Meta>,
}

/// The `data` member of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
    Null,
    Single(ResourceObject),
    Collection(Vec<ResourceObject>),
}

impl PrimaryData {
    pub const SINGLE: &'static str = "single resource";
    pub const COLLECTION: &'static str = "resource collection";

    pub fn kind(&self) -> &'static str {
        match self {
            PrimaryData::Null => "null",
            PrimaryData::Single(_) => Self::SINGLE,
            PrimaryData::Collection(_) => Self::COLLECTION,
        }
    }

    pub fn resources(&self) -> &[ResourceObject] {
        match self {
            PrimaryData::Null => &[],
            PrimaryData::Single(resource) => std::slice::from_ref(resource),
            PrimaryData::Collection(resources) => resources,
        }
    }
}

/// A parsed wire document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub data: PrimaryData,
    /// Side-channel resources keyed by identity. The first occurrence wins.
    pub included: BTreeMap<ResourceIdentifier, ResourceObject>,
    pub links: Option<Links>,
    pub meta: Option<Meta>,
    pub errors: Vec<Value>,
}

impl Document {
    /// Parses raw bytes into a [`Document`].
    ///
    /// JSON syntax errors surface as [`ConverterError::Json`]; structural
    /// problems as [`ConverterError::DocumentFormat`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        Self::from_value(root)
    }

    /// Validates an already-decoded JSON tree.
    pub fn from_value(root: Value) -> Result<Self> {
        let Value::Object(mut root) = root else {
            return Err(ConverterError::format("document must be a JSON object"));
        };

        let data = match root.remove("data") {
            None => return Err(ConverterError::format("no data")),
            Some(Value::Null) => PrimaryData::Null,
            Some(Value::Object(resource)) => PrimaryData::Single(parse_resource(resource)?),
            Some(Value::Array(entries)) => PrimaryData::Collection(
                entries
                    .into_iter()
                    .map(|entry| match entry {
                        Value::Object(resource) => parse_resource(resource),
                        _ => Err(ConverterError::format(
                            "data must be resource, resource collection, or null",
                        )),
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(_) => {
                return Err(ConverterError::format(
                    "data must be resource, resource collection, or null",
                ))
            }
        };

        let mut included = BTreeMap::new();
        match root.remove("included") {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                for entry in entries {
                    let Value::Object(resource) = entry else {
                        return Err(ConverterError::format("included entries must be resources"));
                    };
                    let resource = parse_resource(resource)?;
                    included
                        .entry(resource.identifier.clone())
                        .or_insert(resource);
                }
            }
            Some(_) => return Err(ConverterError::format("included must be an array")),
        }

        let errors = match root.remove("errors") {
            Some(Value::Array(errors)) => errors,
            _ => Vec::new(),
        };

        Ok(Self {
            data,
            included,
            links: object_member(&mut root, "links")?,
            meta: object_member(&mut root, "meta")?,
            errors,
        })
    }

    /// Looks up a resource by identity in primary data first, then `included`.
    pub fn find(&self, identifier: &ResourceIdentifier) -> Option<&ResourceObject> {
        self.data
            .resources()
            .iter()
            .find(|resource| &resource.identifier == identifier)
            .or_else(|| self.included.get(identifier))
    }
}

fn parse_resource(mut resource: Map<String, Value>) -> Result<ResourceObject> {
    let identifier = parse_identifier(&resource)?;

    let attributes = match resource.remove("attributes") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(attributes)) => attributes,
        Some(_) => {
            return Err(ConverterError::format(format!(
                "attributes of {identifier} must be an object"
            )))
        }
    };

    let mut relationships = BTreeMap::new();
    match resource.remove("relationships") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (name, entry) in entries {
                let Value::Object(entry) = entry else {
                    return Err(ConverterError::format(format!(
                        "relationship `{name}` of {identifier} must be an object"
                    )));
                };
                relationships.insert(name, parse_relationship(entry)?);
            }
        }
        Some(_) => {
            return Err(ConverterError::format(format!(
                "relationships of {identifier} must be an object"
            )))
        }
    }

    Ok(ResourceObject {
        identifier,
        attributes,
        relationships,
        links: object_member(&mut resource, "links")?,
        meta: object_member(&mut resource, "meta")?,
    })
}

fn parse_relationship(mut entry: Map<String, Value>) -> Result<Relationship> {
    let data = match entry.remove("data") {
        None => Linkage::Absent,
        Some(Value::Null) => Linkage::ToOne(None),
        Some(Value::Object(ident)) => Linkage::ToOne(Some(parse_identifier(&ident)?)),
        Some(Value::Array(idents)) => Linkage::ToMany(
            idents
                .iter()
                .map(|ident| match ident {
                    Value::Object(ident) => parse_identifier(ident),
                    _ => Err(ConverterError::format("incomplete resource identifier")),
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(_) => {
            return Err(ConverterError::format(
                "relationship data must be an identifier, an identifier array, or null",
            ))
        }
    };

    Ok(Relationship {
        data,
        links: object_member(&mut entry, "links")?,
        meta: object_member(&mut entry, "meta")?,
    })
}

fn parse_identifier(resource: &Map<String, Value>) -> Result<ResourceIdentifier> {
    match (
        resource.get("type").and_then(Value::as_str),
        resource.get("id").and_then(Value::as_str),
    ) {
        (Some(resource_type), Some(id)) => Ok(ResourceIdentifier::new(resource_type, id)),
        _ => Err(ConverterError::format("incomplete resource identifier")),
    }
}

fn object_member(map: &mut Map<String, Value>, key: &str) -> Result<Option<Map<String, Value>>> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(_) => Err(ConverterError::format(format!("{key} must be an object"))),
    }
}

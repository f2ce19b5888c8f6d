use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::relationship::Relationship;

/// A resource object: `{type, id?, attributes?, relationships?, links?, meta?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>) -> Self {
        ResourceObject {
            resource_type: resource_type.into(),
            id: None,
            attributes: Map::new(),
            relationships: BTreeMap::new(),
            links: None,
            meta: None,
        }
    }
}

/// A resource identifier: `{type, id}`.
///
/// `id` is optional so references to not-yet-persisted resources serialize
/// without an `id` member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Identifier {
    pub fn new(resource_type: impl Into<String>, id: Option<String>) -> Self {
        Identifier {
            resource_type: resource_type.into(),
            id,
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::ErrorObject;
use super::resource::ResourceObject;

/// A top-level response document: `{data?, included?, meta?, links?, errors?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub data: Option<PrimaryData>,
    #[serde(default)]
    pub included: Vec<ResourceObject>,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorObject>,
}

/// The primary datum: one resource object or a list, by wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(ResourceObject),
    Many(Vec<ResourceObject>),
}

impl Document {
    /// The single primary resource; a list datum yields its first element,
    /// matching how a single-resource view treats a collection body.
    pub fn single(&self) -> Option<&ResourceObject> {
        match &self.data {
            Some(PrimaryData::One(object)) => Some(object),
            Some(PrimaryData::Many(objects)) => objects.first(),
            None => None,
        }
    }

    /// The primary data as a list regardless of wire shape.
    pub fn collection(&self) -> &[ResourceObject] {
        match &self.data {
            Some(PrimaryData::One(object)) => std::slice::from_ref(object),
            Some(PrimaryData::Many(objects)) => objects,
            None => &[],
        }
    }
}

/// The request-side document built by the serializer: `{data, included}`.
///
/// `included` is always present, even when empty, matching the payloads the
/// mapper has always produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDocument {
    pub data: ResourceObject,
    pub included: Vec<ResourceObject>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_document() {
        let doc: Document = serde_json::from_value(json!({
            "data": {"type": "books", "id": "1"},
            "meta": {"count": 1}
        }))
        .unwrap();

        assert_eq!(doc.single().unwrap().id.as_deref(), Some("1"));
        assert_eq!(doc.collection().len(), 1);
        assert_eq!(doc.meta["count"], json!(1));
    }

    #[test]
    fn collection_document() {
        let doc: Document = serde_json::from_value(json!({
            "data": [
                {"type": "books", "id": "1"},
                {"type": "books", "id": "2"}
            ],
            "included": [{"type": "people", "id": "7"}]
        }))
        .unwrap();

        assert_eq!(doc.collection().len(), 2);
        assert_eq!(doc.single().unwrap().id.as_deref(), Some("1"));
        assert_eq!(doc.included.len(), 1);
    }

    #[test]
    fn null_data() {
        let doc: Document = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(doc.single().is_none());
        assert!(doc.collection().is_empty());
    }

    #[test]
    fn error_document() {
        let doc: Document = serde_json::from_value(json!({
            "errors": [{"status": "404", "code": "not_found"}]
        }))
        .unwrap();
        assert_eq!(doc.errors.len(), 1);
        assert_eq!(doc.errors[0].code.as_deref(), Some("not_found"));
    }
}

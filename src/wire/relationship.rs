use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::resource::Identifier;

/// A relationship object: `{data?, links?, meta?}`.
///
/// A missing `data` member and `"data": null` mean different things: the
/// former says nothing about linkage, the latter is an explicitly empty
/// to-one relationship. `data` is `None` only when the member was absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(
        default,
        deserialize_with = "data_member",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<RelationshipData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl Relationship {
    pub fn with_data(data: RelationshipData) -> Self {
        Relationship {
            data: Some(data),
            links: None,
            meta: None,
        }
    }
}

/// The `data` member of a relationship, keeping the wire shape.
///
/// `One` covers both a bare identifier object and `null`; `Many` covers a
/// JSON array of any length. Whether a relationship is to-one is decided by
/// this shape, never by how many references were resolvable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(Option<Identifier>),
    Many(Vec<Identifier>),
}

impl RelationshipData {
    pub fn is_single(&self) -> bool {
        matches!(self, RelationshipData::One(_))
    }

    /// The references, normalized to a list regardless of wire shape.
    pub fn identifiers(&self) -> Vec<&Identifier> {
        match self {
            RelationshipData::One(Some(ident)) => vec![ident],
            RelationshipData::One(None) => Vec::new(),
            RelationshipData::Many(idents) => idents.iter().collect(),
        }
    }
}

// `Option<T>` swallows JSON null before `T` sees it; deserializing the data
// member through `RelationshipData` directly keeps `null` as `One(None)`.
fn data_member<'de, D>(deserializer: D) -> Result<Option<RelationshipData>, D::Error>
where
    D: Deserializer<'de>,
{
    RelationshipData::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> Relationship {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn null_data_is_empty_to_one() {
        let rel = parse(json!({"data": null}));
        let data = rel.data.unwrap();
        assert!(data.is_single());
        assert!(data.identifiers().is_empty());
    }

    #[test]
    fn missing_data_member_is_none() {
        let rel = parse(json!({"links": {"self": "/books/1/relationships/author"}}));
        assert!(rel.data.is_none());
    }

    #[test]
    fn object_data_is_single() {
        let rel = parse(json!({"data": {"type": "people", "id": "2"}}));
        let data = rel.data.unwrap();
        assert!(data.is_single());
        assert_eq!(data.identifiers()[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn array_data_is_many_even_with_one_element() {
        let rel = parse(json!({"data": [{"type": "people", "id": "2"}]}));
        let data = rel.data.unwrap();
        assert!(!data.is_single());
        assert_eq!(data.identifiers().len(), 1);
    }

    #[test]
    fn empty_array_stays_many() {
        let rel = parse(json!({"data": []}));
        let data = rel.data.unwrap();
        assert!(!data.is_single());
        assert!(data.identifiers().is_empty());
    }

    #[test]
    fn shape_survives_serialization() {
        let one = Relationship::with_data(RelationshipData::One(None));
        assert_eq!(serde_json::to_value(&one).unwrap(), json!({"data": null}));

        let many = Relationship::with_data(RelationshipData::Many(Vec::new()));
        assert_eq!(serde_json::to_value(&many).unwrap(), json!({"data": []}));
    }
}

use std::collections::HashSet;

use serde_json::Value;

use crate::resource::{RelationValue, Resource};
use crate::wire::{Identifier, Relationship, RelationshipData, RequestDocument, ResourceObject};

/// Options for [`Resource::to_json_api_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// Serialize only attributes/relationships changed since the last
    /// checkpoint — the PATCH payload.
    pub only_dirty: bool,
    pub pretty: bool,
}

impl SerializeOptions {
    pub fn only_dirty() -> Self {
        SerializeOptions {
            only_dirty: true,
            ..Default::default()
        }
    }
}

/// Build the request document for a resource: its own resource object plus a
/// flattened `included` array of every related full resource, recursively.
///
/// Relationship entries collapse to identifier references; to-one values
/// serialize as a bare object (or null), to-many as an array, mirroring the
/// stored cardinality back onto the wire. `included` is de-duplicated both by
/// instance and by `(type, id)`, and a visited set keeps cyclic graphs from
/// recursing forever.
pub fn to_document(resource: &Resource, only_dirty: bool) -> RequestDocument {
    let mut walk = Walk::default();
    // The primary resource never lands in its own included array.
    walk.visited.insert(resource.instance_key());
    if let Some(identity) = resource.identity() {
        walk.identities.insert(identity);
    }

    let data = walk.resource_object(resource, only_dirty);
    RequestDocument {
        data,
        included: walk.included,
    }
}

pub fn to_json_api(resource: &Resource, options: SerializeOptions) -> String {
    let document = to_document(resource, options.only_dirty);
    let encoded = if options.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    encoded.expect("request document must encode as JSON")
}

#[derive(Default)]
struct Walk {
    included: Vec<ResourceObject>,
    visited: HashSet<usize>,
    identities: HashSet<(String, String)>,
}

impl Walk {
    fn resource_object(&mut self, resource: &Resource, only_dirty: bool) -> ResourceObject {
        let mut object = ResourceObject::new(resource.resource_type());
        object.id = resource.id();

        let attributes = if only_dirty {
            resource.changed_attributes()
        } else {
            resource.attributes()
        };
        for (name, value) in attributes {
            object.attributes.insert(name, Value::from(&value));
        }

        let relationships = if only_dirty {
            resource.changed_relationships()
        } else {
            resource.relationships()
        };
        for (name, value) in relationships {
            let data = match value {
                RelationValue::One(None) => RelationshipData::One(None),
                RelationValue::One(Some(related)) => {
                    self.include(&related);
                    RelationshipData::One(Some(identifier(&related)))
                }
                RelationValue::Many(related) => {
                    for resource in &related {
                        self.include(resource);
                    }
                    RelationshipData::Many(related.iter().map(identifier).collect())
                }
            };
            object.relationships.insert(name, Relationship::with_data(data));
        }

        object
    }

    fn include(&mut self, resource: &Resource) {
        if !self.visited.insert(resource.instance_key()) {
            return;
        }
        if let Some(identity) = resource.identity() {
            if !self.identities.insert(identity) {
                return;
            }
        }
        // Included entries always carry their full state; dirty-only
        // filtering applies to the primary resource alone.
        let object = self.resource_object(resource, false);
        self.included.push(object);
    }
}

fn identifier(resource: &Resource) -> Identifier {
    Identifier::new(resource.resource_type(), resource.id())
}

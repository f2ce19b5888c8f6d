use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::dirty::DirtyMap;
use crate::serializer::{self, SerializeOptions};
use crate::value::AttrValue;
use crate::wire::RequestDocument;

/// One JSON:API resource instance.
///
/// `Resource` is a cheap-to-clone handle: clones share state, so a
/// deserialized graph where two relationships point at the same `(type, id)`
/// holds one instance, observable through [`Resource::ptr_eq`]. Attribute and
/// relationship stores are dirty-tracked; server hydration clears tracking so
/// only local edits count toward a PATCH payload.
///
/// Attributes and relationships hold resolved values only — wire wrapper
/// shapes (`{"data": ...}`) never appear here.
#[derive(Clone)]
pub struct Resource {
    inner: Rc<RefCell<State>>,
}

/// A resolved relationship value: a single optional resource or a list.
///
/// Which arm is used mirrors the wire shape of the relationship's `data`
/// member, never the number of resolved references. There is no arm for
/// "something else", so unserializable relationship values cannot exist.
#[derive(Clone)]
pub enum RelationValue {
    One(Option<Resource>),
    Many(Vec<Resource>),
}

struct State {
    id: Option<String>,
    persisted: bool,
    resource_type: String,
    endpoint: Option<String>,
    attributes: DirtyMap<String, AttrValue>,
    relationships: DirtyMap<String, RelationValue>,
    links: Map<String, Value>,
    meta: Map<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Resource {
            inner: Rc::new(RefCell::new(State {
                id: None,
                persisted: false,
                resource_type: resource_type.into(),
                endpoint: None,
                attributes: DirtyMap::new(),
                relationships: DirtyMap::new(),
                links: Map::new(),
                meta: Map::new(),
            })),
        }
    }

    pub fn with_endpoint(self, endpoint: impl Into<String>) -> Self {
        self.inner.borrow_mut().endpoint = Some(endpoint.into());
        self
    }

    /// Object identity: do two handles refer to the same instance?
    pub fn ptr_eq(a: &Resource, b: &Resource) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    pub(crate) fn instance_key(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub fn id(&self) -> Option<String> {
        self.inner.borrow().id.clone()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.inner.borrow_mut().id = Some(id.into());
    }

    pub fn is_persisted(&self) -> bool {
        self.inner.borrow().persisted
    }

    pub fn set_persisted(&self, persisted: bool) {
        self.inner.borrow_mut().persisted = persisted;
    }

    pub fn resource_type(&self) -> String {
        self.inner.borrow().resource_type.clone()
    }

    /// The URL segment for this resource kind; falls back to the type.
    pub fn endpoint(&self) -> String {
        let state = self.inner.borrow();
        state
            .endpoint
            .clone()
            .unwrap_or_else(|| state.resource_type.clone())
    }

    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.inner.borrow_mut().endpoint = Some(endpoint.into());
    }

    /// `(type, id)` when persisted enough to be addressable.
    pub fn identity(&self) -> Option<(String, String)> {
        let state = self.inner.borrow();
        state
            .id
            .clone()
            .map(|id| (state.resource_type.clone(), id))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attr(&self, name: &str) -> Option<AttrValue> {
        self.inner.borrow().attributes.get(&name.to_string()).cloned()
    }

    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
    }

    pub fn remove_attr(&self, name: &str) -> Option<AttrValue> {
        self.inner.borrow_mut().attributes.remove(&name.to_string())
    }

    /// Mutate an attribute value in place, marking it dirty when present.
    pub fn update_attr<F>(&self, name: &str, f: F) -> bool
    where
        F: FnOnce(&mut AttrValue),
    {
        self.inner
            .borrow_mut()
            .attributes
            .update(&name.to_string(), f)
    }

    /// Typed attribute read. Missing and explicit-null both give `None`.
    ///
    /// A value that exists but cannot decode as `T` panics: that is a typed
    /// accessor disagreeing with the data it was declared for, the same
    /// programmer error a dynamic cast failure would surface.
    pub fn attr_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.attr(name)?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(Value::from(value)) {
            Ok(decoded) => Some(decoded),
            Err(e) => panic!(
                "attribute `{}` of `{}` does not decode as {}: {}",
                name,
                self.resource_type(),
                std::any::type_name::<T>(),
                e
            ),
        }
    }

    /// Typed attribute write through serde.
    pub fn set_attr_from<T: Serialize>(&self, name: impl Into<String>, value: &T) {
        let json = serde_json::to_value(value)
            .expect("attribute value must serialize to JSON");
        self.set_attr(name, AttrValue::from(json));
    }

    pub fn attributes(&self) -> HashMap<String, AttrValue> {
        self.inner.borrow().attributes.data().clone()
    }

    pub fn changed_attributes(&self) -> HashMap<String, AttrValue> {
        self.inner.borrow().attributes.changes()
    }

    // ------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------

    pub fn relationship(&self, name: &str) -> Option<RelationValue> {
        self.inner
            .borrow()
            .relationships
            .get(&name.to_string())
            .cloned()
    }

    /// The single resolved target of a relationship, if any.
    pub fn related_one(&self, name: &str) -> Option<Resource> {
        match self.relationship(name)? {
            RelationValue::One(resource) => resource,
            RelationValue::Many(resources) => resources.into_iter().next(),
        }
    }

    /// The resolved targets of a relationship as a list (empty when unset).
    pub fn related_many(&self, name: &str) -> Vec<Resource> {
        match self.relationship(name) {
            Some(RelationValue::Many(resources)) => resources,
            Some(RelationValue::One(Some(resource))) => vec![resource],
            _ => Vec::new(),
        }
    }

    pub fn set_related_one(&self, name: impl Into<String>, resource: Option<Resource>) {
        self.inner
            .borrow_mut()
            .relationships
            .insert(name.into(), RelationValue::One(resource));
    }

    pub fn set_related_many(&self, name: impl Into<String>, resources: Vec<Resource>) {
        self.inner
            .borrow_mut()
            .relationships
            .insert(name.into(), RelationValue::Many(resources));
    }

    pub fn remove_relationship(&self, name: &str) -> Option<RelationValue> {
        self.inner
            .borrow_mut()
            .relationships
            .remove(&name.to_string())
    }

    pub fn relationships(&self) -> HashMap<String, RelationValue> {
        self.inner.borrow().relationships.data().clone()
    }

    pub fn changed_relationships(&self) -> HashMap<String, RelationValue> {
        self.inner.borrow().relationships.changes()
    }

    // ------------------------------------------------------------------
    // Links / meta passthrough (not change-tracked)
    // ------------------------------------------------------------------

    pub fn links(&self) -> Map<String, Value> {
        self.inner.borrow().links.clone()
    }

    pub fn set_links(&self, links: Map<String, Value>) {
        self.inner.borrow_mut().links = links;
    }

    pub fn meta(&self) -> Map<String, Value> {
        self.inner.borrow().meta.clone()
    }

    pub fn set_meta(&self, meta: Map<String, Value>) {
        self.inner.borrow_mut().meta = meta;
    }

    // ------------------------------------------------------------------
    // Change tracking
    // ------------------------------------------------------------------

    pub fn has_changes(&self) -> bool {
        let state = self.inner.borrow();
        state.attributes.has_changes() || state.relationships.has_changes()
    }

    /// Checkpoint: discard tracked changes on attributes and relationships.
    /// Called after hydration so server state never looks like a local edit.
    pub fn clear_changes(&self) {
        let mut state = self.inner.borrow_mut();
        state.attributes.clear_changes();
        state.relationships.clear_changes();
    }

    // ------------------------------------------------------------------
    // Wire boundary
    // ------------------------------------------------------------------

    /// Populate this record from a wire resource object, resolving
    /// relationship references against `included` through the given
    /// deserialization pass.
    pub fn from_json_api(
        &self,
        datum: &crate::wire::ResourceObject,
        included: &[crate::wire::ResourceObject],
        deserializer: &mut crate::deserializer::Deserializer<'_>,
    ) -> Result<(), crate::error::ClientError> {
        deserializer.deserialize_into(self, datum, included)
    }

    /// Build the request document for this resource.
    pub fn to_document(&self, only_dirty: bool) -> RequestDocument {
        serializer::to_document(self, only_dirty)
    }

    /// Compact JSON:API text with the full attribute/relationship state.
    pub fn to_json_api(&self) -> String {
        self.to_json_api_with(SerializeOptions::default())
    }

    pub fn to_json_api_with(&self, options: SerializeOptions) -> String {
        serializer::to_json_api(self, options)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Resource")
            .field("type", &state.resource_type)
            .field("id", &state.id)
            .field("persisted", &state.persisted)
            .field("attributes", &state.attributes.len())
            .field("relationships", &state.relationships.len())
            .finish()
    }
}

// Printed by identity, not by recursion: relationship graphs may be cyclic.
impl fmt::Debug for RelationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationValue::One(None) => write!(f, "One(None)"),
            RelationValue::One(Some(r)) => {
                write!(f, "One({}/{})", r.resource_type(), r.id().unwrap_or_default())
            }
            RelationValue::Many(list) => write!(f, "Many(len={})", list.len()),
        }
    }
}

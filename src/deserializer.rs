use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::ClientError;
use crate::registry::ResourceRegistry;
use crate::resource::Resource;
use crate::value::AttrValue;
use crate::wire::{Identifier, ResourceObject};

/// Turns wire resource objects plus their `included` array into a linked
/// [`Resource`] graph.
///
/// One `Deserializer` value is one pass: its identity cache maps `(type, id)`
/// to the instance materialized for it, so every reference to the same
/// identity — across relationships, across the records of a collection
/// response, or around a cycle — resolves to the same handle. The cache must
/// not outlive the pass; drop the deserializer when the response is mapped.
pub struct Deserializer<'a> {
    registry: &'a ResourceRegistry,
    cache: HashMap<(String, String), Resource>,
}

impl<'a> Deserializer<'a> {
    pub fn new(registry: &'a ResourceRegistry) -> Self {
        Deserializer {
            registry,
            cache: HashMap::new(),
        }
    }

    /// Materialize a primary resource object into a fresh (or cached)
    /// instance of its registered kind.
    pub fn deserialize(
        &mut self,
        datum: &ResourceObject,
        included: &[ResourceObject],
    ) -> Result<Resource, ClientError> {
        if let Some(id) = &datum.id {
            let key = (datum.resource_type.clone(), id.clone());
            if let Some(cached) = self.cache.get(&key) {
                return Ok(cached.clone());
            }
        }
        let resource = self.registry.create_instance(&datum.resource_type)?;
        self.deserialize_into(&resource, datum, included)?;
        Ok(resource)
    }

    /// Populate an existing instance from a resource object.
    ///
    /// The instance is registered in the identity cache *before* its
    /// relationships are resolved; that registration is what terminates
    /// cyclic `included` graphs.
    pub fn deserialize_into(
        &mut self,
        resource: &Resource,
        datum: &ResourceObject,
        included: &[ResourceObject],
    ) -> Result<(), ClientError> {
        debug!(
            resource_type = %datum.resource_type,
            id = datum.id.as_deref().unwrap_or("-"),
            "deserializing resource"
        );

        if let Some(id) = &datum.id {
            resource.set_id(id.clone());
        }
        resource.set_persisted(true);

        if let Some(identity) = resource.identity() {
            self.cache.insert(identity, resource.clone());
        }

        for (name, value) in &datum.attributes {
            resource.set_attr(name.clone(), AttrValue::from(value));
        }

        for (name, relationship) in &datum.relationships {
            // A relationship without a data member says nothing about
            // linkage; skip it entirely.
            let Some(data) = &relationship.data else {
                continue;
            };

            let mut resolved = Vec::new();
            for ident in data.identifiers() {
                if let Some(related) = self.resolve(ident, included)? {
                    resolved.push(related);
                }
            }

            // The wire shape, not the resolved count, decides the stored
            // cardinality.
            if data.is_single() {
                resource.set_related_one(name.clone(), resolved.into_iter().next());
            } else {
                resource.set_related_many(name.clone(), resolved);
            }
        }

        if let Some(links) = &datum.links {
            resource.set_links(links.clone());
        }
        if let Some(meta) = &datum.meta {
            resource.set_meta(meta.clone());
        }

        // Hydration from the server is not a local edit.
        resource.clear_changes();
        Ok(())
    }

    /// Resolve one relationship reference against `included`.
    ///
    /// References whose target is absent from `included` resolve to nothing:
    /// a server may legitimately omit resources the caller did not ask to
    /// side-load, and that must not fail the pass.
    fn resolve(
        &mut self,
        ident: &Identifier,
        included: &[ResourceObject],
    ) -> Result<Option<Resource>, ClientError> {
        let Some(id) = &ident.id else {
            return Ok(None);
        };

        let Some(datum) = included.iter().find(|object| {
            object.resource_type == ident.resource_type && object.id.as_deref() == Some(id)
        }) else {
            trace!(
                resource_type = %ident.resource_type,
                id = %id,
                "reference has no included entry; dropped"
            );
            return Ok(None);
        };

        let key = (ident.resource_type.clone(), id.clone());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(cached.clone()));
        }

        let resource = self.registry.create_instance(&ident.resource_type)?;
        self.deserialize_into(&resource, datum, included)?;
        Ok(Some(resource))
    }
}

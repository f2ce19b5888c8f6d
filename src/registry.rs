use std::any::TypeId;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use tracing::debug;

use crate::model::Model;
use crate::resource::Resource;

/// Process-wide mapping from resource type strings to descriptors.
///
/// Built explicitly at startup, before the client is constructed, and
/// read-only afterwards. A registry is a plain value — tests construct a
/// fresh one instead of sharing global state. A type string maps to exactly
/// one descriptor: re-registering is an error unless overwrite is requested.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    by_type: HashMap<String, ResourceDescriptor>,
    by_class: HashMap<TypeId, String>,
}

/// Everything the mapper needs to know about one resource kind.
pub struct ResourceDescriptor {
    pub resource_type: String,
    pub endpoint: String,
    factory: Box<dyn Fn() -> Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateRegistration(String),
    UnknownType(String),
    UnknownClass(&'static str),
}

impl ResourceDescriptor {
    pub fn new(
        resource_type: impl Into<String>,
        endpoint: impl Into<String>,
        factory: impl Fn() -> Resource + 'static,
    ) -> Self {
        ResourceDescriptor {
            resource_type: resource_type.into(),
            endpoint: endpoint.into(),
            factory: Box::new(factory),
        }
    }

    /// A fresh unpersisted record of this kind.
    pub fn create(&self) -> Resource {
        (self.factory)()
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("resource_type", &self.resource_type)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ResourceRegistry {
    pub fn new() -> Self {
        ResourceRegistry::default()
    }

    /// Register a typed resource definition.
    pub fn register<M: Model + 'static>(&mut self) -> Result<(), RegistryError> {
        self.register_model::<M>(false)
    }

    /// Register a typed resource definition, replacing any existing entry
    /// for the same type string.
    pub fn register_or_replace<M: Model + 'static>(&mut self) -> Result<(), RegistryError> {
        self.register_model::<M>(true)
    }

    fn register_model<M: Model + 'static>(
        &mut self,
        allow_overwrite: bool,
    ) -> Result<(), RegistryError> {
        let resource_type = M::resource_type();
        let endpoint = M::endpoint().unwrap_or_else(M::resource_type);
        let descriptor = ResourceDescriptor::new(resource_type.clone(), endpoint, || {
            M::create().record().clone()
        });
        self.register_descriptor(descriptor, allow_overwrite)?;
        self.by_class.insert(TypeId::of::<M>(), resource_type);
        Ok(())
    }

    /// Register a descriptor without binding it to a Rust type.
    pub fn register_descriptor(
        &mut self,
        descriptor: ResourceDescriptor,
        allow_overwrite: bool,
    ) -> Result<(), RegistryError> {
        let resource_type = descriptor.resource_type.clone();
        if !allow_overwrite && self.by_type.contains_key(&resource_type) {
            return Err(RegistryError::DuplicateRegistration(resource_type));
        }
        debug!(resource_type = %resource_type, endpoint = %descriptor.endpoint, "registered resource kind");
        self.by_type.insert(resource_type, descriptor);
        Ok(())
    }

    /// Instantiate an empty resource for a wire `type` string.
    pub fn create_instance(&self, resource_type: &str) -> Result<Resource, RegistryError> {
        Ok(self.descriptor(resource_type)?.create())
    }

    pub fn descriptor(&self, resource_type: &str) -> Result<&ResourceDescriptor, RegistryError> {
        self.by_type
            .get(resource_type)
            .ok_or_else(|| RegistryError::UnknownType(resource_type.to_string()))
    }

    pub fn descriptor_of<M: Model + 'static>(&self) -> Result<&ResourceDescriptor, RegistryError> {
        let resource_type = self
            .by_class
            .get(&TypeId::of::<M>())
            .ok_or(RegistryError::UnknownClass(std::any::type_name::<M>()))?;
        self.descriptor(resource_type)
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.by_type.contains_key(resource_type)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateRegistration(t) => {
                write!(f, "resource type `{}` is already registered", t)
            }
            RegistryError::UnknownType(t) => {
                write!(f, "no resource registered for type `{}`", t)
            }
            RegistryError::UnknownClass(name) => {
                write!(f, "`{}` is not a registered resource", name)
            }
        }
    }
}

impl Error for RegistryError {}

mod client;
mod deserializer;
mod dirty;
mod error;
mod http;
pub mod inflect;
mod model;
mod registry;
mod resource;
mod scope;
mod serializer;
mod value;
pub mod wire;

pub use client::{Client, Collection, Config, PaginationStrategy, Record};
pub use deserializer::Deserializer;
pub use dirty::{DirtyList, DirtyMap};
pub use error::ClientError;
pub use http::{HttpClient, HttpResponse, TransportError, TransportResult};
pub use model::Model;
pub use registry::{RegistryError, ResourceDescriptor, ResourceRegistry};
pub use resource::{RelationValue, Resource};
pub use scope::{Scope, SortDirection};
pub use serializer::SerializeOptions;
pub use value::AttrValue;

// Re-export the attribute macro so `jsonapi_mapper::resource` is the only
// import typed definitions need.
#[cfg(feature = "derive")]
pub use jsonapi_mapper_macros::resource;

#[cfg(test)]
pub(crate) mod test_util {
    use async_trait::async_trait;

    use crate::http::{HttpClient, HttpResponse, TransportResult};

    /// A transport that answers everything with an empty 204.
    pub struct NullHttp;

    #[async_trait(?Send)]
    impl HttpClient for NullHttp {
        async fn get(&self, _url: &str, _parameters: &[(String, String)]) -> TransportResult {
            Ok(HttpResponse::new(204, ""))
        }

        async fn post(
            &self,
            _url: &str,
            _body: &str,
            _parameters: &[(String, String)],
        ) -> TransportResult {
            Ok(HttpResponse::new(204, ""))
        }

        async fn patch(
            &self,
            _url: &str,
            _body: &str,
            _parameters: &[(String, String)],
        ) -> TransportResult {
            Ok(HttpResponse::new(204, ""))
        }

        async fn put(
            &self,
            _url: &str,
            _body: &str,
            _parameters: &[(String, String)],
        ) -> TransportResult {
            Ok(HttpResponse::new(204, ""))
        }

        async fn delete(&self, _url: &str, _parameters: &[(String, String)]) -> TransportResult {
            Ok(HttpResponse::new(204, ""))
        }
    }
}

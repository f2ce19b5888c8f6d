use serde_json::{Map, Value};
use tracing::debug;

use crate::deserializer::Deserializer;
use crate::error::ClientError;
use crate::http::HttpClient;
use crate::model::Model;
use crate::registry::ResourceRegistry;
use crate::resource::Resource;
use crate::scope::Scope;
use crate::serializer::SerializeOptions;
use crate::wire::Document;

/// Which page parameter family the server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationStrategy {
    /// `page[number]` / `page[size]`
    #[default]
    PageBased,
    /// `page[limit]` / `page[offset]`
    OffsetBased,
}

/// Connection configuration for a [`Client`].
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub namespace: String,
    pub pagination_strategy: PaginationStrategy,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            namespace: String::new(),
            pagination_strategy: PaginationStrategy::default(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn pagination_strategy(mut self, strategy: PaginationStrategy) -> Self {
        self.pagination_strategy = strategy;
        self
    }
}

/// A single fetched resource plus the response metadata it arrived with.
#[derive(Debug)]
pub struct Record<T> {
    pub data: T,
    pub meta: Map<String, Value>,
    pub raw: Document,
}

/// A fetched collection plus the response metadata it arrived with.
#[derive(Debug)]
pub struct Collection<T> {
    pub data: Vec<T>,
    pub meta: Map<String, Value>,
    pub raw: Document,
}

/// A client for one JSON:API server.
///
/// Owns the registry (populated before construction, read-only afterwards)
/// and the injected transport. All network operations are async and leave
/// resource state untouched until a response is known; the only
/// post-response mutation is the 201 rehydration after a create.
pub struct Client {
    config: Config,
    http: Box<dyn HttpClient>,
    registry: ResourceRegistry,
}

impl Client {
    pub fn new(config: Config, http: impl HttpClient + 'static, registry: ResourceRegistry) -> Self {
        Client {
            config,
            http: Box::new(http),
            registry,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Start building a query.
    pub fn scope(&self) -> Scope<'_> {
        Scope::new(self)
    }

    // ------------------------------------------------------------------
    // Fetching (conveniences over an empty scope)
    // ------------------------------------------------------------------

    pub async fn all<T: Model + 'static>(&self) -> Result<Collection<T>, ClientError> {
        self.scope().all().await
    }

    pub async fn find<T: Model + 'static>(&self, id: &str) -> Result<Record<T>, ClientError> {
        self.scope().find(id).await
    }

    /// Like [`find`](Client::find), but a 404 response becomes `None`
    /// instead of an error.
    pub async fn find_optional<T: Model + 'static>(
        &self,
        id: &str,
    ) -> Result<Option<Record<T>>, ClientError> {
        self.scope().find_optional(id).await
    }

    pub async fn first<T: Model + 'static>(&self) -> Result<Record<T>, ClientError> {
        self.scope().first().await
    }

    pub async fn last<T: Model + 'static>(&self) -> Result<Record<T>, ClientError> {
        self.scope().last().await
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    pub async fn save<T: Model>(&self, model: &T) -> Result<(), ClientError> {
        self.save_record(model.record()).await
    }

    /// Persist a resource: PATCH with the dirty-only payload when it already
    /// exists on the server, POST with the full payload otherwise. On a 201
    /// the response body is deserialized back into the same instance, which
    /// assigns `id` and flips `is_persisted`.
    pub async fn save_record(&self, resource: &Resource) -> Result<(), ClientError> {
        let response = if resource.is_persisted() {
            let url = self.url_for_record(resource);
            let body = resource.to_json_api_with(SerializeOptions::only_dirty());
            debug!(%url, "PATCH");
            self.http
                .patch(&url, &body, &[])
                .await
                .map_err(ClientError::Transport)?
        } else {
            let url = self.url_for_record(resource);
            let body = resource.to_json_api();
            debug!(%url, "POST");
            self.http
                .post(&url, &body, &[])
                .await
                .map_err(ClientError::Transport)?
        };

        if !(200..=204).contains(&response.status_code) {
            return Err(ClientError::Response {
                status_code: response.status_code,
                body: response.body,
            });
        }

        if !resource.is_persisted() && response.status_code == 201 {
            let document: Document = serde_json::from_str(&response.body)?;
            let datum = document
                .single()
                .ok_or_else(|| ClientError::MissingData("created resource body".to_string()))?;
            Deserializer::new(&self.registry).deserialize_into(resource, datum, &document.included)?;
        }

        Ok(())
    }

    pub async fn destroy<T: Model>(&self, model: &T) -> Result<(), ClientError> {
        self.destroy_record(model.record()).await
    }

    pub async fn destroy_record(&self, resource: &Resource) -> Result<(), ClientError> {
        let url = self.url_for_record(resource);
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(&url, &[])
            .await
            .map_err(ClientError::Transport)?;
        if !matches!(response.status_code, 200 | 204) {
            return Err(ClientError::Response {
                status_code: response.status_code,
                body: response.body,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // URLs and plumbing
    // ------------------------------------------------------------------

    /// The URL for a resource instance: base / namespace / endpoint / id,
    /// with redundant separators trimmed and empty segments omitted.
    pub fn url_for_record(&self, resource: &Resource) -> String {
        let id = resource.id();
        join_url(&[
            &self.config.base_url,
            &self.config.namespace,
            &resource.endpoint(),
            id.as_deref().unwrap_or(""),
        ])
    }

    pub(crate) fn collection_url<T: Model + 'static>(&self) -> Result<String, ClientError> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        Ok(join_url(&[
            &self.config.base_url,
            &self.config.namespace,
            &descriptor.endpoint,
        ]))
    }

    pub(crate) fn record_url<T: Model + 'static>(&self, id: &str) -> Result<String, ClientError> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        Ok(join_url(&[
            &self.config.base_url,
            &self.config.namespace,
            &descriptor.endpoint,
            id,
        ]))
    }

    pub(crate) async fn request_document(
        &self,
        url: &str,
        parameters: &[(String, String)],
    ) -> Result<Document, ClientError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url, parameters)
            .await
            .map_err(ClientError::Transport)?;
        debug!(status = response.status_code, "response");
        if response.status_code >= 400 {
            return Err(ClientError::Response {
                status_code: response.status_code,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}

fn join_url(segments: &[&str]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect();
    parts.join("/")
}

use std::error::Error;
use std::fmt;

use async_trait::async_trait;

/// What an HTTP exchange produced, however the transport got it.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status_code,
            body: body.into(),
        }
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status_code)
    }
}

/// A transport-level failure (connection refused, I/O, timeout). HTTP error
/// statuses are not transport failures — they come back as a response.
pub type TransportError = Box<dyn Error + Send + Sync>;

pub type TransportResult = Result<HttpResponse, TransportError>;

/// The injected HTTP transport.
///
/// The mapper sends and receives UTF-8 JSON:API text; content negotiation
/// headers, timeouts, and retries are the implementor's concern. Futures do
/// not need to be `Send` — the resource graph is single-threaded.
#[async_trait(?Send)]
pub trait HttpClient {
    async fn get(&self, url: &str, parameters: &[(String, String)]) -> TransportResult;

    async fn post(
        &self,
        url: &str,
        body: &str,
        parameters: &[(String, String)],
    ) -> TransportResult;

    async fn patch(
        &self,
        url: &str,
        body: &str,
        parameters: &[(String, String)],
    ) -> TransportResult;

    async fn put(&self, url: &str, body: &str, parameters: &[(String, String)])
        -> TransportResult;

    async fn delete(&self, url: &str, parameters: &[(String, String)]) -> TransportResult;
}

use std::error::Error;
use std::fmt;

use crate::registry::RegistryError;
use crate::wire::{ErrorDocument, ErrorObject};

/// Error type for client operations.
#[derive(Debug)]
pub enum ClientError {
    /// The server answered with a non-success status. Carries the raw body;
    /// `errors()` parses it as a JSON:API error document on demand.
    Response { status_code: u16, body: String },
    /// The injected transport failed outright (connection, I/O).
    Transport(Box<dyn Error + Send + Sync>),
    /// The response body does not parse as a JSON:API document.
    MalformedDocument(String),
    /// The document parsed but a required `data` member is absent.
    MissingData(String),
    /// Resource kind registration problem (missing or duplicate).
    Registry(RegistryError),
    /// Scope pagination calls contradict the configured strategy.
    Pagination(String),
}

impl ClientError {
    /// The error objects from the response body. Empty when the body is not
    /// a parseable error document; parse failures are never re-thrown.
    pub fn errors(&self) -> Vec<ErrorObject> {
        match self {
            ClientError::Response { body, .. } => serde_json::from_str::<ErrorDocument>(body)
                .map(|doc| doc.errors)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Response { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Response { status_code, .. } => {
                write!(f, "server responded with status {}", status_code)
            }
            ClientError::Transport(e) => write!(f, "transport error: {}", e),
            ClientError::MalformedDocument(msg) => {
                write!(f, "malformed document: {}", msg)
            }
            ClientError::MissingData(what) => write!(f, "missing data: {}", what),
            ClientError::Registry(e) => write!(f, "{}", e),
            ClientError::Pagination(msg) => write!(f, "pagination: {}", msg),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e.as_ref()),
            ClientError::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for ClientError {
    fn from(err: RegistryError) -> Self {
        ClientError::Registry(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedDocument(err.to_string())
    }
}

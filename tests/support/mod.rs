#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use jsonapi_mapper::{
    resource, Client, Config, HttpClient, HttpResponse, PaginationStrategy, ResourceRegistry,
    TransportResult,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// ============================================================================
// Fixture models
// ============================================================================

#[resource(resource_type = "books", endpoint = "Books")]
pub struct Book {
    #[attr]
    title: String,
    #[attr]
    published: Option<String>,
    #[attr(default)]
    stock: i64,
    #[attr(default = 5)]
    rating: i64,
    #[has_one]
    publisher: Option<Publisher>,
    #[has_one]
    author: Option<Person>,
    #[has_many]
    reviews: Vec<Review>,
}

#[resource(resource_type = "publishers", endpoint = "Publishers")]
pub struct Publisher {
    #[attr]
    name: Option<String>,
    #[attr(name = "custom_field")]
    custom: Option<String>,
    #[has_many]
    books: Vec<Book>,
}

#[resource(resource_type = "people")]
pub struct Person {
    #[attr]
    name: Option<String>,
    #[attr]
    email: Option<String>,
    #[has_one]
    mentor: Option<Person>,
}

#[resource(resource_type = "reviews", endpoint = "Reviews")]
pub struct Review {
    #[attr]
    review: Option<String>,
    #[has_one]
    book: Option<Book>,
    #[has_one]
    reader: Option<Person>,
}

pub fn registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    registry.register::<Book>().unwrap();
    registry.register::<Publisher>().unwrap();
    registry.register::<Person>().unwrap();
    registry.register::<Review>().unwrap();
    registry
}

pub fn client(http: MockHttp) -> Client {
    client_with(http, PaginationStrategy::PageBased)
}

pub fn client_with(http: MockHttp, strategy: PaginationStrategy) -> Client {
    Client::new(
        Config::new("https://api.example.com/")
            .namespace("/api")
            .pagination_strategy(strategy),
        http,
        registry(),
    )
}

// ============================================================================
// Mock transport
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
    pub parameters: Vec<(String, String)>,
}

/// Canned-response transport. Clones share state, so tests keep one handle
/// for assertions and hand another to the client.
#[derive(Clone, Default)]
pub struct MockHttp {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    responses: VecDeque<HttpResponse>,
    requests: Vec<RecordedRequest>,
}

impl MockHttp {
    pub fn new() -> Self {
        MockHttp::default()
    }

    pub fn enqueue(&self, status_code: u16, body: impl Into<String>) {
        self.inner
            .borrow_mut()
            .responses
            .push_back(HttpResponse::new(status_code, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.borrow().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.inner
            .borrow()
            .requests
            .last()
            .cloned()
            .expect("no request was made")
    }

    fn exchange(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&str>,
        parameters: &[(String, String)],
    ) -> TransportResult {
        let mut inner = self.inner.borrow_mut();
        inner.requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.map(str::to_string),
            parameters: parameters.to_vec(),
        });
        let response = inner
            .responses
            .pop_front()
            .unwrap_or_else(|| panic!("no canned response for {} {}", method, url));
        Ok(response)
    }
}

#[async_trait(?Send)]
impl HttpClient for MockHttp {
    async fn get(&self, url: &str, parameters: &[(String, String)]) -> TransportResult {
        self.exchange("GET", url, None, parameters)
    }

    async fn post(
        &self,
        url: &str,
        body: &str,
        parameters: &[(String, String)],
    ) -> TransportResult {
        self.exchange("POST", url, Some(body), parameters)
    }

    async fn patch(
        &self,
        url: &str,
        body: &str,
        parameters: &[(String, String)],
    ) -> TransportResult {
        self.exchange("PATCH", url, Some(body), parameters)
    }

    async fn put(&self, url: &str, body: &str, parameters: &[(String, String)]) -> TransportResult {
        self.exchange("PUT", url, Some(body), parameters)
    }

    async fn delete(&self, url: &str, parameters: &[(String, String)]) -> TransportResult {
        self.exchange("DELETE", url, None, parameters)
    }
}

mod support;

use jsonapi_mapper::{ClientError, Model, RegistryError, ResourceRegistry};
use serde_json::json;
use support::{Book, MockHttp, Person};

#[tokio::test]
async fn not_found_carries_status_and_parsed_errors() {
    support::init_tracing();

    let http = MockHttp::new();
    http.enqueue(
        404,
        json!({"errors": [{"status": "404", "code": "not_found"}]}).to_string(),
    );
    let client = support::client(http);

    let err = client.find::<Person>("99").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));

    let errors = err.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code.as_deref(), Some("not_found"));
    assert_eq!(errors[0].status.as_deref(), Some("404"));
}

#[tokio::test]
async fn error_body_that_is_not_a_document_parses_to_nothing() {
    let http = MockHttp::new();
    http.enqueue(500, "<html>boom</html>");
    let client = support::client(http);

    let err = client.find::<Person>("1").await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert!(err.errors().is_empty());
}

#[tokio::test]
async fn find_optional_maps_404_to_none() {
    let http = MockHttp::new();
    http.enqueue(404, json!({"errors": []}).to_string());
    let client = support::client(http);

    let found = client.find_optional::<Person>("99").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_optional_propagates_other_statuses() {
    let http = MockHttp::new();
    http.enqueue(500, "");
    let client = support::client(http);

    let err = client.find_optional::<Person>("99").await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
}

#[tokio::test]
async fn malformed_body_is_distinct_from_transport_errors() {
    let http = MockHttp::new();
    http.enqueue(200, "not json at all");
    let client = support::client(http);

    let err = client.find::<Person>("1").await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedDocument(_)));
}

#[tokio::test]
async fn missing_data_member_is_fatal() {
    let http = MockHttp::new();
    http.enqueue(200, json!({"meta": {"count": 0}}).to_string());
    let client = support::client(http);

    let err = client.find::<Person>("1").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingData(_)));
}

#[tokio::test]
async fn unregistered_wire_type_is_a_configuration_error() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({"data": {"type": "ghosts", "id": "1"}}).to_string(),
    );
    let client = support::client(http);

    let err = client.find::<Book>("1").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Registry(RegistryError::UnknownType(_))
    ));
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ResourceRegistry::new();
    registry.register::<Person>().unwrap();

    let err = registry.register::<Person>().unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateRegistration("people".to_string())
    );

    registry.register_or_replace::<Person>().unwrap();
}

#[test]
fn class_lookup_requires_registration() {
    let registry = ResourceRegistry::new();
    let err = registry.descriptor_of::<Person>().unwrap_err();
    assert!(matches!(err, RegistryError::UnknownClass(_)));
}

#[tokio::test]
async fn unregistered_model_cannot_build_urls() {
    #[jsonapi_mapper::resource(resource_type = "ghosts")]
    struct Ghost {
        #[attr]
        name: Option<String>,
    }
    let _ = Ghost::resource_type();

    let http = MockHttp::new();
    let client = support::client(http);

    let err = client.find::<Ghost>("1").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Registry(RegistryError::UnknownClass(_))
    ));
}

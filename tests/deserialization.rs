mod support;

use jsonapi_mapper::Resource;
use serde_json::json;
use support::{Book, MockHttp, Person, Review};

#[tokio::test]
async fn collection_response_deserializes() {
    support::init_tracing();

    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": [
                {"type": "books", "id": "1", "attributes": {"title": "Dune"}}
            ]
        })
        .to_string(),
    );
    let client = support::client(http.clone());

    let collection = client.all::<Book>().await.unwrap();
    assert_eq!(collection.data.len(), 1);

    let book = &collection.data[0];
    assert_eq!(book.title(), "Dune");
    assert_eq!(book.record().resource_type(), "books");
    assert_eq!(book.record().id().as_deref(), Some("1"));
    assert!(book.record().is_persisted());

    assert_eq!(
        http.last_request().url,
        "https://api.example.com/api/Books"
    );
}

#[tokio::test]
async fn nested_included_graph_resolves() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": {
                "type": "reviews",
                "id": "r75",
                "attributes": {"review": "review 37"},
                "links": {"self": "/api/Reviews/r75/"},
                "relationships": {
                    "book": {
                        "data": {"type": "books", "id": "b1"},
                        "links": {"self": "/api/Reviews/r75/book"}
                    },
                    "reader": {"data": null}
                }
            },
            "included": [
                {
                    "type": "books",
                    "id": "b1",
                    "attributes": {"title": "book_title37", "published": null},
                    "relationships": {
                        "author": {"data": null},
                        "publisher": {"data": {"type": "publishers", "id": "38"}},
                        "reviews": {"data": []}
                    }
                },
                {
                    "type": "publishers",
                    "id": "38",
                    "attributes": {"name": "publisher37", "custom_field": "some customization"},
                    "relationships": {"books": {"data": []}}
                }
            ],
            "meta": {"count": 1, "total": 1}
        })
        .to_string(),
    );
    let client = support::client(http);

    let response = client.find::<Review>("r75").await.unwrap();
    let review = response.data;

    assert_eq!(response.meta["count"], json!(1));
    assert_eq!(review.record().id().as_deref(), Some("r75"));
    assert_eq!(review.review().as_deref(), Some("review 37"));
    // data: null reader stays an empty to-one
    assert!(review.reader().is_none());

    let book = review.book().expect("book resolved from included");
    assert_eq!(book.title(), "book_title37");
    assert_eq!(book.published(), None);
    assert!(book.reviews().is_empty());

    let publisher = book.publisher().expect("nested include resolved");
    assert_eq!(publisher.name().as_deref(), Some("publisher37"));
    assert_eq!(publisher.custom().as_deref(), Some("some customization"));

    // links/meta copied verbatim onto the resource
    assert_eq!(review.record().links()["self"], json!("/api/Reviews/r75/"));

    // hydration is not an edit
    assert!(!review.record().has_changes());
    assert!(!book.record().has_changes());
}

#[tokio::test]
async fn identity_shared_across_collection_records() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": [
                {
                    "type": "reviews", "id": "1",
                    "relationships": {"reader": {"data": {"type": "people", "id": "7"}}}
                },
                {
                    "type": "reviews", "id": "2",
                    "relationships": {"reader": {"data": {"type": "people", "id": "7"}}}
                }
            ],
            "included": [
                {"type": "people", "id": "7", "attributes": {"name": "Toby"}}
            ]
        })
        .to_string(),
    );
    let client = support::client(http);

    let collection = client.all::<Review>().await.unwrap();
    let first_reader = collection.data[0].reader().unwrap();
    let second_reader = collection.data[1].reader().unwrap();

    // same instance, not a structurally equal copy
    assert!(Resource::ptr_eq(
        first_reader.record(),
        second_reader.record()
    ));

    // mutate through one handle, observe through the other
    first_reader.set_name(Some("Toby2".to_string()));
    assert_eq!(second_reader.name().as_deref(), Some("Toby2"));
}

#[tokio::test]
async fn cyclic_includes_terminate() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": {
                "type": "people", "id": "1",
                "relationships": {"mentor": {"data": {"type": "people", "id": "2"}}}
            },
            "included": [
                {
                    "type": "people", "id": "1",
                    "relationships": {"mentor": {"data": {"type": "people", "id": "2"}}}
                },
                {
                    "type": "people", "id": "2",
                    "relationships": {"mentor": {"data": {"type": "people", "id": "1"}}}
                }
            ]
        })
        .to_string(),
    );
    let client = support::client(http);

    let person = client.find::<Person>("1").await.unwrap().data;
    let mentor = person.mentor().unwrap();
    let back = mentor.mentor().unwrap();

    assert_eq!(mentor.record().id().as_deref(), Some("2"));
    assert!(Resource::ptr_eq(back.record(), person.record()));
}

#[tokio::test]
async fn sparse_inclusion_resolves_to_nothing() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": {
                "type": "books", "id": "1",
                "attributes": {"title": "Dune"},
                "relationships": {
                    "author": {"data": {"type": "people", "id": "9"}},
                    "reviews": {"data": [
                        {"type": "reviews", "id": "10"},
                        {"type": "reviews", "id": "11"}
                    ]}
                }
            },
            "included": [
                {"type": "reviews", "id": "11", "attributes": {"review": "ok"}}
            ]
        })
        .to_string(),
    );
    let client = support::client(http);

    // no error: unresolvable references are dropped individually
    let book = client.find::<Book>("1").await.unwrap().data;
    assert!(book.author().is_none());

    let reviews = book.reviews();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].record().id().as_deref(), Some("11"));
}

#[tokio::test]
async fn single_response_with_array_data_takes_first() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": [
                {"type": "books", "id": "1", "attributes": {"title": "Dune"}},
                {"type": "books", "id": "2", "attributes": {"title": "Messiah"}}
            ]
        })
        .to_string(),
    );
    let client = support::client(http);

    let book = client.first::<Book>().await.unwrap().data;
    assert_eq!(book.record().id().as_deref(), Some("1"));
}

#[tokio::test]
async fn last_takes_final_datum() {
    let http = MockHttp::new();
    http.enqueue(
        200,
        json!({
            "data": [
                {"type": "books", "id": "1", "attributes": {"title": "Dune"}},
                {"type": "books", "id": "2", "attributes": {"title": "Messiah"}}
            ]
        })
        .to_string(),
    );
    let client = support::client(http);

    let book = client.last::<Book>().await.unwrap().data;
    assert_eq!(book.record().id().as_deref(), Some("2"));
    assert_eq!(book.title(), "Messiah");
}

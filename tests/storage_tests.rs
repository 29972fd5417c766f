use blog_api::storage::{
    Document, DocumentStore, FieldValue, Fields, InMemoryDocumentStore, Query, StoreError,
};
use chrono::{TimeZone, Utc};

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
        .collect()
}

#[tokio::test]
async fn test_add_then_get_returns_same_fields() {
    let store = InMemoryDocumentStore::new();
    let id = store
        .add("categories", fields(&[("name", "Rust")]))
        .await
        .unwrap();

    assert!(!id.is_empty());

    let doc = store.get("categories", &id).await.unwrap().unwrap();
    assert_eq!(doc.id, id);
    assert_eq!(doc.get_str("name"), Some("Rust"));
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let store = InMemoryDocumentStore::new();
    assert!(store.get("categories", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let store = InMemoryDocumentStore::new();
    store.add("posts", fields(&[("title", "a")])).await.unwrap();

    assert!(store.get_all("comments").await.unwrap().is_empty());
    assert_eq!(store.get_all("posts").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_merges_fields() {
    let store = InMemoryDocumentStore::new();
    let id = store
        .add("posts", fields(&[("title", "Old"), ("content", "Body")]))
        .await
        .unwrap();

    store
        .update("posts", &id, fields(&[("title", "New")]))
        .await
        .unwrap();

    let doc = store.get("posts", &id).await.unwrap().unwrap();
    assert_eq!(doc.get_str("title"), Some("New"));
    assert_eq!(doc.get_str("content"), Some("Body"));
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let store = InMemoryDocumentStore::new();
    let err = store
        .update("posts", "ghost", fields(&[("title", "x")]))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = InMemoryDocumentStore::new();
    let id = store.add("comments", Fields::new()).await.unwrap();

    store.delete("comments", &id).await.unwrap();
    store.delete("comments", &id).await.unwrap();

    assert!(store.get("comments", &id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_query_filters_before_window() {
    let store = InMemoryDocumentStore::new();
    for i in 0..6 {
        let category = if i % 2 == 0 { "even" } else { "odd" };
        let title = format!("post {i}");
        store
            .add(
                "posts",
                fields(&[("title", title.as_str()), ("categoryId", category)]),
            )
            .await
            .unwrap();
    }

    let query = Query::new().where_eq("categoryId", "even").offset(1).limit(5);
    let docs = store.query("posts", &query).await.unwrap();

    let titles: Vec<_> = docs.iter().filter_map(|d| d.get_str("title")).collect();
    assert_eq!(titles, vec!["post 2", "post 4"]);
}

#[tokio::test]
async fn test_query_window_past_end_is_empty() {
    let store = InMemoryDocumentStore::new();
    store.add("posts", Fields::new()).await.unwrap();

    let docs = store
        .query("posts", &Query::new().offset(10).limit(10))
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[test]
fn test_document_timestamp_accessors() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let mut f = Fields::new();
    f.insert("createdAt".to_string(), FieldValue::from(ts));
    f.insert(
        "updatedAt".to_string(),
        FieldValue::from("2024-05-02T08:30:00Z"),
    );
    f.insert("broken".to_string(), FieldValue::from("yesterday"));
    f.insert("count".to_string(), FieldValue::Integer(3));

    let doc = Document::new("d1", f);

    assert_eq!(doc.get_timestamp("createdAt"), Some(ts));
    assert_eq!(
        doc.get_timestamp("updatedAt"),
        Some(Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap())
    );
    assert_eq!(doc.get_timestamp("broken"), None);
    assert_eq!(doc.get_timestamp("missing"), None);
    assert_eq!(doc.get_str("count"), None);
}

use blog_api::{
    error::{ApiError, Resource},
    models::{
        CreateCategoryRequest, CreateCommentRequest, CreatePostRequest, UpdateCategoryRequest,
        UpdatePostRequest,
    },
    services::{CategoryService, CommentService, PostService},
    storage::{DocumentStore, FieldValue, Fields, InMemoryDocumentStore, StorageState},
};
use chrono::{SubsecRound, Timelike, Utc};
use std::sync::Arc;

fn memory() -> StorageState {
    Arc::new(InMemoryDocumentStore::new())
}

fn rust_category() -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: "Rust".to_string(),
        description: "Systems programming posts".to_string(),
    }
}

fn post_in(category_id: &str, n: usize) -> CreatePostRequest {
    CreatePostRequest {
        title: format!("Post number {n}"),
        content: "A body that is comfortably long enough.".to_string(),
        author_id: "author-1".to_string(),
        category_id: category_id.to_string(),
    }
}

// --- Categories ---

#[tokio::test]
async fn test_create_category_assigns_id_and_timestamps() {
    let service = CategoryService::new(memory());
    let before = Utc::now().trunc_subsecs(3);

    let created = service.create(rust_category()).await.unwrap();

    assert!(!created.id.is_empty());
    let created_at = created.created_at.expect("createdAt should be set");
    assert!(created_at >= before);
    // Stamped at millisecond precision so a document store round-trip is lossless.
    assert_eq!(created_at.nanosecond() % 1_000_000, 0);
    assert_eq!(created.created_at, created.updated_at);

    // What came back is what was stored.
    let fetched = service.get(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_category_changes_only_listed_fields() {
    let service = CategoryService::new(memory());
    let created = service.create(rust_category()).await.unwrap();

    let updated = service
        .update(
            &created.id,
            UpdateCategoryRequest {
                name: Some("Rustacean".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Rustacean");
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = service.get(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_missing_category_is_not_found() {
    let service = CategoryService::new(memory());

    let err = service
        .update(
            "missing",
            UpdateCategoryRequest {
                name: Some("Anything".to_string()),
                description: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(Resource::Category)));
    assert_eq!(err.to_string(), "Category not found");
}

#[tokio::test]
async fn test_get_missing_category_is_none() {
    let service = CategoryService::new(memory());
    assert!(service.get("does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_category_does_not_cascade_to_posts() {
    let store = memory();
    let categories = CategoryService::new(store.clone());
    let posts = PostService::new(store);

    let category = categories.create(rust_category()).await.unwrap();
    let post = posts.create(post_in(&category.id, 1)).await.unwrap();

    categories.delete(&category.id).await.unwrap();

    assert!(categories.get(&category.id).await.unwrap().is_none());
    let survivor = posts.get(&post.id).await.unwrap().unwrap();
    assert_eq!(survivor.category_id, category.id);
}

#[tokio::test]
async fn test_documents_with_missing_fields_map_to_defaults() {
    let store = memory();
    let id = store
        .add(
            "categories",
            Fields::from([("name".to_string(), FieldValue::Integer(7))]),
        )
        .await
        .unwrap();

    let category = CategoryService::new(store)
        .get(&id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(category.name, "");
    assert_eq!(category.description, "");
    assert_eq!(category.created_at, None);
}

// --- Posts ---

#[tokio::test]
async fn test_list_posts_pages_and_filters() {
    let posts = PostService::new(memory());
    for n in 0..7 {
        let category = if n < 5 { "alpha" } else { "beta" };
        posts.create(post_in(category, n)).await.unwrap();
    }

    let page_two = posts.list(Some(2), Some(3), None).await.unwrap();
    let titles: Vec<_> = page_two.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Post number 3", "Post number 4", "Post number 5"]);

    let beta = posts.list(None, None, Some("beta")).await.unwrap();
    assert_eq!(beta.len(), 2);
    assert!(beta.iter().all(|p| p.category_id == "beta"));
}

#[tokio::test]
async fn test_list_posts_defaults_to_ten_per_page() {
    let posts = PostService::new(memory());
    for n in 0..12 {
        posts.create(post_in("alpha", n)).await.unwrap();
    }

    assert_eq!(posts.list(None, None, None).await.unwrap().len(), 10);
    assert_eq!(posts.list(Some(2), None, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_post_keeps_author() {
    let posts = PostService::new(memory());
    let post = posts.create(post_in("alpha", 1)).await.unwrap();

    let updated = posts
        .update(
            &post.id,
            UpdatePostRequest {
                title: None,
                content: None,
                category_id: Some("beta".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.category_id, "beta");
    assert_eq!(updated.title, post.title);
    assert_eq!(updated.author_id, "author-1");
}

// --- Comments ---

#[tokio::test]
async fn test_comments_filter_by_post() {
    let comments = CommentService::new(memory());
    for post_id in ["p1", "p1", "p2"] {
        comments
            .create(CreateCommentRequest {
                content: "Great read!".to_string(),
                post_id: post_id.to_string(),
                user_id: "reader".to_string(),
            })
            .await
            .unwrap();
    }

    assert_eq!(comments.list(Some("p1")).await.unwrap().len(), 2);
    assert_eq!(comments.list(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_comment_create_and_delete() {
    let comments = CommentService::new(memory());
    let comment = comments
        .create(CreateCommentRequest {
            content: "First!".to_string(),
            post_id: "p1".to_string(),
            user_id: "reader".to_string(),
        })
        .await
        .unwrap();

    assert!(!comment.id.is_empty());
    assert!(comment.created_at.is_some());

    comments.delete(&comment.id).await.unwrap();
    assert!(comments.get(&comment.id).await.unwrap().is_none());
    // Second delete is still a success.
    comments.delete(&comment.id).await.unwrap();
}

use axum::{
    body::Body,
    extract::FromRequest,
    http::{Request, header},
};
use blog_api::{
    error::ApiError,
    handlers::{ListCommentsParams, ListPostsParams, PostListing},
    models::{
        CreateCategoryRequest, CreateCommentRequest, CreatePostRequest, PageRequest,
        UpdateCategoryRequest, UpdatePostRequest,
    },
    validation::{ValidatedJson, ValidatedPayload, validate_payload},
};
use serde_json::{Value, json};
use validator::Validate;

fn errors_of<T: ValidatedPayload + std::fmt::Debug>(payload: Value) -> Vec<String> {
    validate_payload::<T>(&payload).expect_err("payload should be rejected")
}

// --- Category Rules ---

#[test]
fn test_create_category_valid_payload() {
    let payload = json!({ "name": "Rust", "description": "Systems programming posts" });
    let category = validate_payload::<CreateCategoryRequest>(&payload).unwrap();
    assert_eq!(category.name, "Rust");
    assert_eq!(category.description, "Systems programming posts");
}

#[test]
fn test_create_category_reports_every_violation() {
    let errors = errors_of::<CreateCategoryRequest>(json!({ "name": "R", "description": "short" }));

    assert_eq!(
        errors,
        vec![
            "Name must be at least 3 characters".to_string(),
            "Description must be at least 10 characters".to_string(),
        ]
    );
}

#[test]
fn test_create_category_missing_fields() {
    let errors = errors_of::<CreateCategoryRequest>(json!({}));
    assert_eq!(errors, vec!["Name is required", "Description is required"]);
}

#[test]
fn test_derived_rules_apply_to_typed_requests() {
    let request = CreateCategoryRequest {
        name: "Rust".to_string(),
        description: String::new(),
    };
    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("description"));
    assert!(!errors.field_errors().contains_key("name"));

    assert!(UpdatePostRequest::default().validate().is_err());
}

#[test]
fn test_length_bounds_are_inclusive() {
    let at_max = json!({ "name": "n".repeat(50), "description": "d".repeat(200) });
    assert!(validate_payload::<CreateCategoryRequest>(&at_max).is_ok());

    let over_max = json!({ "name": "n".repeat(51), "description": "d".repeat(201) });
    let errors = errors_of::<CreateCategoryRequest>(over_max);
    assert_eq!(
        errors,
        vec![
            "Name must not exceed 50 characters",
            "Description must not exceed 200 characters"
        ]
    );
}

#[test]
fn test_length_counts_characters_not_bytes() {
    // Three characters, nine bytes.
    let payload = json!({ "name": "日本語", "description": "ten chars!" });
    assert!(validate_payload::<CreateCategoryRequest>(&payload).is_ok());
}

#[test]
fn test_update_category_requires_one_field() {
    let errors = errors_of::<UpdateCategoryRequest>(json!({}));
    assert_eq!(errors, vec!["At least one field must be provided for update"]);

    // Unknown fields do not count towards the minimum.
    let errors = errors_of::<UpdateCategoryRequest>(json!({ "color": "red" }));
    assert_eq!(errors, vec!["At least one field must be provided for update"]);
}

#[test]
fn test_update_category_partial_and_empty_string() {
    let update = validate_payload::<UpdateCategoryRequest>(&json!({ "name": "Databases" })).unwrap();
    assert_eq!(update.name.as_deref(), Some("Databases"));
    assert_eq!(update.description, None);

    let errors = errors_of::<UpdateCategoryRequest>(json!({ "name": "" }));
    assert_eq!(errors, vec!["Name is not allowed to be empty"]);
}

#[test]
fn test_update_with_only_mistyped_field_reports_type_only() {
    let errors = errors_of::<UpdateCategoryRequest>(json!({ "name": 5 }));
    assert_eq!(errors, vec!["Name must be a string"]);
}

// --- Post Rules ---

#[test]
fn test_create_post_strips_unknown_fields() {
    let payload = json!({
        "title": "Hello world",
        "content": "This content is long enough to pass.",
        "authorId": "author-1",
        "categoryId": "cat-1",
        "isAdmin": true,
    });

    let post = validate_payload::<CreatePostRequest>(&payload).unwrap();
    let echoed = serde_json::to_value(&post).unwrap();
    assert!(echoed.get("isAdmin").is_none());
    assert_eq!(echoed.as_object().unwrap().len(), 4);
}

#[test]
fn test_create_post_type_and_presence_errors() {
    let payload = json!({
        "title": 42,
        "content": null,
        "authorId": "",
    });

    let errors = errors_of::<CreatePostRequest>(payload);
    assert_eq!(
        errors,
        vec![
            "Title must be a string",
            "Content must be a string",
            "Author ID is required",
            "Category ID is required",
        ]
    );
}

#[test]
fn test_non_object_body_is_rejected() {
    let errors = errors_of::<CreatePostRequest>(json!(["title"]));
    assert_eq!(errors, vec!["Request body must be a JSON object"]);
}

#[test]
fn test_update_post_validates_only_provided_fields() {
    let update = validate_payload::<UpdatePostRequest>(&json!({ "categoryId": "cat-2" })).unwrap();
    assert_eq!(update.category_id.as_deref(), Some("cat-2"));

    let errors = errors_of::<UpdatePostRequest>(json!({ "title": "Hey" }));
    assert_eq!(errors, vec!["Title must be at least 5 characters"]);
}

#[test]
fn test_update_post_ignores_author_id() {
    let errors = errors_of::<UpdatePostRequest>(json!({ "authorId": "someone-else" }));
    assert_eq!(errors, vec!["At least one field must be provided for update"]);
}

// --- Comment Rules ---

#[test]
fn test_create_comment_rules() {
    let ok = json!({ "content": "Nice post", "postId": "p1", "userId": "u1" });
    assert!(validate_payload::<CreateCommentRequest>(&ok).is_ok());

    let errors = errors_of::<CreateCommentRequest>(json!({ "content": "Hi" }));
    assert_eq!(
        errors,
        vec![
            "Content must be at least 5 characters",
            "Post ID is required",
            "User ID is required",
        ]
    );
}

// --- ValidatedJson Extractor ---

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_validated_json_builds_typed_payload() {
    let body = json!({
        "title": "Hello world",
        "content": "This content is long enough to pass.",
        "authorId": "author-1",
        "categoryId": "cat-1",
    });

    let ValidatedJson(post) =
        ValidatedJson::<CreatePostRequest>::from_request(json_request(&body.to_string()), &())
            .await
            .unwrap();

    assert_eq!(post.author_id, "author-1");
    assert_eq!(post.category_id, "cat-1");
}

#[tokio::test]
async fn test_validated_json_rejects_with_validation_error() {
    let err = ValidatedJson::<UpdateCategoryRequest>::from_request(json_request("{}"), &())
        .await
        .unwrap_err();

    match err {
        ApiError::Validation(errors) => {
            assert_eq!(errors, vec!["At least one field must be provided for update"])
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validated_json_malformed_body_is_400() {
    let err = ValidatedJson::<UpdateCategoryRequest>::from_request(json_request("{not json"), &())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.status_code(), 400);
}

// --- Listing Parameters ---

#[test]
fn test_list_posts_params_parse() {
    let params = ListPostsParams {
        page: Some("2".to_string()),
        limit: Some("5".to_string()),
        category_id: Some("cat-1".to_string()),
    };

    assert_eq!(
        params.parse().unwrap(),
        PostListing {
            page: Some(2),
            limit: Some(5),
            category_id: Some("cat-1".to_string()),
        }
    );
}

#[test]
fn test_list_posts_params_empty_values_are_absent() {
    let params = ListPostsParams {
        page: Some(String::new()),
        limit: None,
        category_id: Some(String::new()),
    };

    assert_eq!(params.parse().unwrap(), PostListing::default());
}

#[test]
fn test_list_posts_params_rejects_non_positive() {
    let params = ListPostsParams {
        page: Some("0".to_string()),
        limit: Some("-3".to_string()),
        category_id: None,
    };

    match params.parse().unwrap_err() {
        ApiError::Validation(errors) => assert_eq!(
            errors,
            vec![
                "page must be a positive integer",
                "limit must be a positive integer"
            ]
        ),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_list_comments_params_empty_post_id_is_absent() {
    let params = ListCommentsParams {
        post_id: Some(String::new()),
    };
    assert_eq!(params.post_id(), None);
}

#[test]
fn test_page_request_offset() {
    assert_eq!(PageRequest { page: 1, limit: 10 }.offset(), 0);
    assert_eq!(PageRequest { page: 2, limit: 5 }.offset(), 5);
    assert_eq!(PageRequest::default(), PageRequest { page: 1, limit: 10 });
}

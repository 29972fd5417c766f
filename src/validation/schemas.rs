use super::{FieldSpec, ValidatedPayload};
use crate::models::{
    CreateCategoryRequest, CreateCommentRequest, CreatePostRequest, UpdateCategoryRequest,
    UpdatePostRequest,
};

// --- Categories ---

const CATEGORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "name", "Name"),
    FieldSpec::new("description", "description", "Description"),
];

impl ValidatedPayload for CreateCategoryRequest {
    const FIELDS: &'static [FieldSpec] = CATEGORY_FIELDS;
}

impl ValidatedPayload for UpdateCategoryRequest {
    const FIELDS: &'static [FieldSpec] = CATEGORY_FIELDS;
}

// --- Posts ---

impl ValidatedPayload for CreatePostRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "title", "Title"),
        FieldSpec::new("content", "content", "Content"),
        FieldSpec::new("authorId", "author_id", "Author ID"),
        FieldSpec::new("categoryId", "category_id", "Category ID"),
    ];
}

// authorId is not accepted: a post keeps its author.
impl ValidatedPayload for UpdatePostRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "title", "Title"),
        FieldSpec::new("content", "content", "Content"),
        FieldSpec::new("categoryId", "category_id", "Category ID"),
    ];
}

// --- Comments ---

impl ValidatedPayload for CreateCommentRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("content", "content", "Content"),
        FieldSpec::new("postId", "post_id", "Post ID"),
        FieldSpec::new("userId", "user_id", "User ID"),
    ];
}

use super::{text, timestamp};
use crate::{
    error::ApiError,
    models::{Comment, CreateCommentRequest},
    repository::CommentRepository,
    storage::{Document, FieldValue, Fields, StorageState},
};

fn to_comment(doc: &Document) -> Comment {
    Comment {
        id: doc.id.clone(),
        content: text(doc, "content"),
        post_id: text(doc, "postId"),
        user_id: text(doc, "userId"),
        created_at: doc.get_timestamp("createdAt"),
    }
}

/// CommentService
///
/// Comments are write-once: there is no update operation.
#[derive(Clone)]
pub struct CommentService {
    repo: CommentRepository,
}

impl CommentService {
    pub fn new(store: StorageState) -> Self {
        Self {
            repo: CommentRepository::new(store),
        }
    }

    pub async fn list(&self, post_id: Option<&str>) -> Result<Vec<Comment>, ApiError> {
        let docs = self.repo.find_for_post(post_id).await?;
        Ok(docs.iter().map(to_comment).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Comment>, ApiError> {
        Ok(self.repo.find_by_id(id).await?.as_ref().map(to_comment))
    }

    pub async fn create(&self, req: CreateCommentRequest) -> Result<Comment, ApiError> {
        let now = timestamp();
        let fields = Fields::from([
            ("content".to_string(), FieldValue::from(req.content.as_str())),
            ("postId".to_string(), FieldValue::from(req.post_id.as_str())),
            ("userId".to_string(), FieldValue::from(req.user_id.as_str())),
            ("createdAt".to_string(), FieldValue::from(now)),
        ]);

        let id = self.repo.create(fields).await?;

        Ok(Comment {
            id,
            content: req.content,
            post_id: req.post_id,
            user_id: req.user_id,
            created_at: Some(now),
        })
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.repo.delete(id).await?;
        Ok(())
    }
}

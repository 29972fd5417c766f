use std::ops::Deref;

use super::CollectionRepository;
use crate::storage::{Document, Query, StorageState, StoreError};

/// CommentRepository
#[derive(Clone)]
pub struct CommentRepository(CollectionRepository);

impl CommentRepository {
    pub const COLLECTION: &'static str = "comments";

    pub fn new(store: StorageState) -> Self {
        Self(CollectionRepository::new(store, Self::COLLECTION))
    }

    /// Lists comments, optionally only those attached to `post_id`. No pagination.
    pub async fn find_for_post(&self, post_id: Option<&str>) -> Result<Vec<Document>, StoreError> {
        match post_id {
            Some(post_id) => {
                let query = Query::new().where_eq("postId", post_id);
                self.store().query(self.collection(), &query).await
            }
            None => self.find_all().await,
        }
    }
}

impl Deref for CommentRepository {
    type Target = CollectionRepository;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

//! Per-resource persistence.
//!
//! Each repository owns one collection name and turns CRUD intents into
//! `DocumentStore` calls. Repositories return raw `Document`s; typed mapping
//! happens one layer up in `services`.

pub mod category;
pub mod comment;
pub mod post;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use post::PostRepository;

use crate::storage::{Document, Fields, StorageState, StoreError};

/// CollectionRepository
///
/// The CRUD operations every resource shares, bound to a single collection.
#[derive(Clone)]
pub struct CollectionRepository {
    store: StorageState,
    collection: &'static str,
}

impl CollectionRepository {
    pub fn new(store: StorageState, collection: &'static str) -> Self {
        Self { store, collection }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub(crate) fn store(&self) -> &StorageState {
        &self.store
    }

    pub async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        self.store.get_all(self.collection).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.store.get(self.collection, id).await
    }

    /// Stores a new document and returns its store-assigned id.
    pub async fn create(&self, fields: Fields) -> Result<String, StoreError> {
        self.store.add(self.collection, fields).await
    }

    pub async fn update(&self, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.store.update(self.collection, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(self.collection, id).await
    }
}

use std::ops::Deref;

use super::CollectionRepository;
use crate::storage::StorageState;

/// CategoryRepository
///
/// Categories only need the shared CRUD operations.
#[derive(Clone)]
pub struct CategoryRepository(CollectionRepository);

impl CategoryRepository {
    pub const COLLECTION: &'static str = "categories";

    pub fn new(store: StorageState) -> Self {
        Self(CollectionRepository::new(store, Self::COLLECTION))
    }
}

impl Deref for CategoryRepository {
    type Target = CollectionRepository;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

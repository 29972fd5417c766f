use std::ops::Deref;

use super::CollectionRepository;
use crate::{
    models::PageRequest,
    storage::{Document, Query, StorageState, StoreError},
};

/// PostRepository
#[derive(Clone)]
pub struct PostRepository(CollectionRepository);

impl PostRepository {
    pub const COLLECTION: &'static str = "posts";

    pub fn new(store: StorageState) -> Self {
        Self(CollectionRepository::new(store, Self::COLLECTION))
    }

    /// find_page
    ///
    /// Lists posts, optionally narrowed to one category, then windowed by
    /// `page`. The category filter is applied before the window, so a page
    /// always contains posts of that category only. With neither argument
    /// this is a plain collection scan.
    pub async fn find_page(
        &self,
        page: Option<PageRequest>,
        category_id: Option<&str>,
    ) -> Result<Vec<Document>, StoreError> {
        if page.is_none() && category_id.is_none() {
            return self.find_all().await;
        }

        let mut query = Query::new();
        if let Some(category_id) = category_id {
            query = query.where_eq("categoryId", category_id);
        }
        if let Some(page) = page {
            query = query.offset(page.offset()).limit(u64::from(page.limit));
        }

        self.store().query(self.collection(), &query).await
    }
}

impl Deref for PostRepository {
    type Target = CollectionRepository;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

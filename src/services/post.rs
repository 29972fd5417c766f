use super::{not_found_as, text, timestamp};
use crate::{
    error::{ApiError, Resource},
    models::{CreatePostRequest, PageRequest, Post, UpdatePostRequest},
    repository::PostRepository,
    storage::{Document, FieldValue, Fields, StorageState},
};

fn to_post(doc: &Document) -> Post {
    Post {
        id: doc.id.clone(),
        title: text(doc, "title"),
        content: text(doc, "content"),
        author_id: text(doc, "authorId"),
        category_id: text(doc, "categoryId"),
        created_at: doc.get_timestamp("createdAt"),
        updated_at: doc.get_timestamp("updatedAt"),
    }
}

/// PostService
#[derive(Clone)]
pub struct PostService {
    repo: PostRepository,
}

impl PostService {
    pub fn new(store: StorageState) -> Self {
        Self {
            repo: PostRepository::new(store),
        }
    }

    /// list
    ///
    /// Lists one page of posts. A missing `page` or `limit` falls back to
    /// `PageRequest::DEFAULT_PAGE` / `DEFAULT_LIMIT`, so the store never
    /// receives an unbounded post query.
    pub async fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        category_id: Option<&str>,
    ) -> Result<Vec<Post>, ApiError> {
        let page = PageRequest {
            page: page.unwrap_or(PageRequest::DEFAULT_PAGE),
            limit: limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        };

        let docs = self.repo.find_page(Some(page), category_id).await?;
        Ok(docs.iter().map(to_post).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Post>, ApiError> {
        Ok(self.repo.find_by_id(id).await?.as_ref().map(to_post))
    }

    pub async fn create(&self, req: CreatePostRequest) -> Result<Post, ApiError> {
        let now = timestamp();
        let fields = Fields::from([
            ("title".to_string(), FieldValue::from(req.title.as_str())),
            ("content".to_string(), FieldValue::from(req.content.as_str())),
            ("authorId".to_string(), FieldValue::from(req.author_id.as_str())),
            ("categoryId".to_string(), FieldValue::from(req.category_id.as_str())),
            ("createdAt".to_string(), FieldValue::from(now)),
            ("updatedAt".to_string(), FieldValue::from(now)),
        ]);

        let id = self.repo.create(fields).await?;

        Ok(Post {
            id,
            title: req.title,
            content: req.content,
            author_id: req.author_id,
            category_id: req.category_id,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    pub async fn update(&self, id: &str, req: UpdatePostRequest) -> Result<Post, ApiError> {
        let mut fields = Fields::new();
        if let Some(title) = req.title {
            fields.insert("title".to_string(), title.into());
        }
        if let Some(content) = req.content {
            fields.insert("content".to_string(), content.into());
        }
        if let Some(category_id) = req.category_id {
            fields.insert("categoryId".to_string(), category_id.into());
        }
        fields.insert("updatedAt".to_string(), timestamp().into());

        self.repo
            .update(id, fields)
            .await
            .map_err(not_found_as(Resource::Post))?;

        self.get(id).await?.ok_or(ApiError::NotFound(Resource::Post))
    }

    /// Removes the post. Its comments are left untouched.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.repo.delete(id).await?;
        Ok(())
    }
}

use super::{not_found_as, text, timestamp};
use crate::{
    error::{ApiError, Resource},
    models::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    repository::CategoryRepository,
    storage::{Document, FieldValue, Fields, StorageState},
};

fn to_category(doc: &Document) -> Category {
    Category {
        id: doc.id.clone(),
        name: text(doc, "name"),
        description: text(doc, "description"),
        created_at: doc.get_timestamp("createdAt"),
        updated_at: doc.get_timestamp("updatedAt"),
    }
}

/// CategoryService
#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(store: StorageState) -> Self {
        Self {
            repo: CategoryRepository::new(store),
        }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let docs = self.repo.find_all().await?;
        Ok(docs.iter().map(to_category).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Category>, ApiError> {
        Ok(self.repo.find_by_id(id).await?.as_ref().map(to_category))
    }

    /// Stores a new category. `createdAt` and `updatedAt` share one timestamp.
    pub async fn create(&self, req: CreateCategoryRequest) -> Result<Category, ApiError> {
        let now = timestamp();
        let fields = Fields::from([
            ("name".to_string(), FieldValue::from(req.name.as_str())),
            ("description".to_string(), FieldValue::from(req.description.as_str())),
            ("createdAt".to_string(), FieldValue::from(now)),
            ("updatedAt".to_string(), FieldValue::from(now)),
        ]);

        let id = self.repo.create(fields).await?;

        Ok(Category {
            id,
            name: req.name,
            description: req.description,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Writes only the provided fields plus `updatedAt`, then re-reads the
    /// stored category.
    pub async fn update(&self, id: &str, req: UpdateCategoryRequest) -> Result<Category, ApiError> {
        let mut fields = Fields::new();
        if let Some(name) = req.name {
            fields.insert("name".to_string(), name.into());
        }
        if let Some(description) = req.description {
            fields.insert("description".to_string(), description.into());
        }
        fields.insert("updatedAt".to_string(), timestamp().into());

        self.repo
            .update(id, fields)
            .await
            .map_err(not_found_as(Resource::Category))?;

        self.get(id).await?.ok_or(ApiError::NotFound(Resource::Category))
    }

    /// Removes the category. Posts that reference it are left untouched.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.repo.delete(id).await?;
        Ok(())
    }
}

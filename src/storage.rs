use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Bson, Document as BsonDocument, doc, oid::ObjectId},
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};
use thiserror::Error;
use uuid::Uuid;

// --- Document Model ---

/// FieldValue
///
/// A single untyped value inside a stored document. The store hands these back
/// as-is; turning them into typed entities is the service layer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// Field name to value map for one document.
pub type Fields = BTreeMap<String, FieldValue>;

/// Document
///
/// A stored record: the store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns the field as a string slice, or `None` when it is absent or not a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the field as a timestamp. RFC 3339 strings are accepted as well,
    /// since records written by other tools may store dates that way.
    pub fn get_timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(field) {
            Some(FieldValue::Timestamp(value)) => Some(*value),
            Some(FieldValue::String(value)) => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            _ => None,
        }
    }
}

// --- Queries ---

/// Filter
///
/// Equality condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: FieldValue,
}

/// Query
///
/// Collection query composed of equality filters, then an optional offset and
/// limit. Filters are always applied before the offset/limit window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, fields: &Fields) -> bool {
        self.filters
            .iter()
            .all(|filter| fields.get(&filter.field) == Some(&filter.value))
    }
}

// --- Store Contract ---

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {id} not found in collection {collection}")]
    NotFound { collection: String, id: String },

    #[error("document store error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// DocumentStore
///
/// The contract consumed from the external document database. Every operation
/// is scoped to a named collection. Implementations must be shareable across
/// request tasks, hence `Send + Sync`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection, in the store's natural order.
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// `Ok(None)` when no document has this id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Inserts a new document and returns the id the store assigned to it.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Merges `fields` into an existing document. Fails with
    /// `StoreError::NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Removes the document. Deleting an absent id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;
}

/// StorageState
///
/// The concrete type used to share the document store across the application state.
pub type StorageState = Arc<dyn DocumentStore>;

// --- MongoDB Implementation ---

/// MongoDocumentStore
///
/// Production implementation on top of MongoDB. Documents are keyed by
/// `ObjectId`; their hex form is the public id. An id that does not parse as an
/// `ObjectId` cannot exist in the collection, so lookups treat it as absent.
#[derive(Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Connects to the cluster and verifies the connection with a `ping`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        tracing::info!(database, "connected to MongoDB");

        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection::<BsonDocument>(name)
    }
}

fn to_bson(value: FieldValue) -> Bson {
    match value {
        FieldValue::Null => Bson::Null,
        FieldValue::Bool(b) => Bson::Boolean(b),
        FieldValue::Integer(i) => Bson::Int64(i),
        FieldValue::Float(f) => Bson::Double(f),
        FieldValue::String(s) => Bson::String(s),
        FieldValue::Timestamp(ts) => {
            Bson::DateTime(bson::DateTime::from_millis(ts.timestamp_millis()))
        }
    }
}

fn from_bson(value: Bson) -> Option<FieldValue> {
    match value {
        Bson::Null => Some(FieldValue::Null),
        Bson::Boolean(b) => Some(FieldValue::Bool(b)),
        Bson::Int32(i) => Some(FieldValue::Integer(i64::from(i))),
        Bson::Int64(i) => Some(FieldValue::Integer(i)),
        Bson::Double(f) => Some(FieldValue::Float(f)),
        Bson::String(s) => Some(FieldValue::String(s)),
        Bson::ObjectId(oid) => Some(FieldValue::String(oid.to_hex())),
        Bson::DateTime(dt) => DateTime::from_timestamp_millis(dt.timestamp_millis())
            .map(FieldValue::Timestamp),
        _ => None,
    }
}

fn to_bson_document(fields: Fields) -> BsonDocument {
    fields
        .into_iter()
        .map(|(name, value)| (name, to_bson(value)))
        .collect()
}

fn from_bson_document(mut raw: BsonDocument) -> Document {
    let id = match raw.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let fields = raw
        .into_iter()
        .filter_map(|(name, value)| {
            let converted = from_bson(value);
            if converted.is_none() {
                tracing::debug!(field = %name, "skipping unsupported BSON field");
            }
            converted.map(|v| (name, v))
        })
        .collect();

    Document { id, fields }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.query(collection, &Query::new()).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let found = self.collection(collection).find_one(doc! { "_id": oid }).await?;
        Ok(found.map(from_bson_document))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let result = self
            .collection(collection)
            .insert_one(to_bson_document(fields))
            .await?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        tracing::debug!(collection, %id, "document inserted");
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let oid = ObjectId::parse_str(id).map_err(|_| not_found())?;

        let result = self
            .collection(collection)
            .update_one(doc! { "_id": oid }, doc! { "$set": to_bson_document(fields) })
            .await?;

        if result.matched_count == 0 {
            return Err(not_found());
        }

        tracing::debug!(collection, id, "document updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(());
        };

        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": oid })
            .await?;

        tracing::debug!(collection, id, deleted = result.deleted_count, "document deleted");
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let filter: BsonDocument = query
            .filters
            .iter()
            .map(|f| (f.field.clone(), to_bson(f.value.clone())))
            .collect();

        let coll = self.collection(collection);
        let mut find = coll.find(filter);
        if let Some(offset) = query.offset {
            find = find.skip(offset);
        }
        if let Some(limit) = query.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let raw: Vec<BsonDocument> = find.await?.try_collect().await?;
        Ok(raw.into_iter().map(from_bson_document).collect())
    }
}

// --- In-Memory Implementation ---

/// InMemoryDocumentStore
///
/// Process-local store used for local development (`DOCUMENT_STORE=memory`)
/// and by the test suite. Collections keep insertion order so offset/limit
/// windows are deterministic.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        existing.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        let offset = usize::try_from(query.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| query.matches(&d.fields))
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SubsecRound;

    #[test]
    fn bson_round_trip_keeps_millisecond_timestamps() {
        let now = Utc::now().trunc_subsecs(3);
        let fields = Fields::from([
            ("title".to_string(), FieldValue::from("Hello")),
            ("createdAt".to_string(), FieldValue::from(now)),
            ("views".to_string(), FieldValue::Integer(7)),
        ]);

        let mut raw = to_bson_document(fields.clone());
        raw.insert("_id", ObjectId::new());
        let doc = from_bson_document(raw);

        assert_eq!(doc.fields, fields);
        assert_eq!(doc.get_timestamp("createdAt"), Some(now));
    }

    #[test]
    fn bson_drops_sub_millisecond_precision() {
        let precise = Utc::now();
        let raw = to_bson_document(Fields::from([(
            "createdAt".to_string(),
            FieldValue::from(precise),
        )]));

        let doc = from_bson_document(raw);
        assert_eq!(doc.get_timestamp("createdAt"), Some(precise.trunc_subsecs(3)));
    }
}

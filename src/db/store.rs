use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository::{self, Document};
use crate::error::AppError;

/// Read side of the document store, as the batch job and identity fallback see it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, AppError>;
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;
}

#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        repository::list_documents(&self.db, collection).await
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        repository::get_document(&self.db, collection, id).await
    }
}

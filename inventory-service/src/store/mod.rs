//! Persistence adapters for inventory rows.

use crate::filters::Filter;
use crate::model::InventoryItem;
use crate::restock::RestockOutcome;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::MemoryInventoryStore;
pub use postgres::PgInventoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("inventory item {0} already exists")]
    DuplicateId(i32),
    #[error("stored row for item {id} is unreadable: {reason}")]
    CorruptRow { id: i32, reason: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find(&self, id: i32) -> Result<Option<InventoryItem>, StoreError>;

    /// Fails with `StoreError::DuplicateId` when the id is taken.
    async fn insert(&self, item: &InventoryItem) -> Result<InventoryItem, StoreError>;

    /// Replaces every column of an existing row; `None` when the id is absent.
    async fn update(&self, item: &InventoryItem) -> Result<Option<InventoryItem>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Matching items ordered by id.
    async fn scan(&self, filter: &Filter) -> Result<Vec<InventoryItem>, StoreError>;

    /// Applies the restock policy as one atomic read-modify-write.
    async fn restock(
        &self,
        id: i32,
        today: NaiveDate,
    ) -> Result<Option<(InventoryItem, RestockOutcome)>, StoreError>;
}

use crate::filters::InventoryQuery;
use crate::model::{today, InventoryItem, ValidationError};
use crate::restock::RestockOutcome;
use crate::store::{InventoryStore, StoreError};
use common_http_errors::ApiError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Inventory item {0} was not found")]
    NotFound(i32),
    #[error("Inventory item {0} already exists")]
    Conflict(i32),
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for InventoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => InventoryError::Conflict(id),
            other => InventoryError::Storage(other),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(
                e @ (ValidationError::UnknownCondition(_) | ValidationError::InvalidQuantity(_)),
            ) => ApiError::bad_request("invalid_filter", e.to_string()),
            InventoryError::Validation(e) => ApiError::bad_request("invalid_inventory", e.to_string()),
            e @ InventoryError::NotFound(_) => ApiError::not_found("item_not_found", e.to_string()),
            e @ InventoryError::Conflict(_) => ApiError::conflict("item_exists", e.to_string()),
            InventoryError::Storage(e) => {
                tracing::error!(error = %e, "inventory storage failure");
                ApiError::internal(e)
            }
        }
    }
}

/// Resource operations over an injected store handle.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: InventoryItem) -> Result<InventoryItem, InventoryError> {
        info!(item_id = item.id, "creating inventory item");
        item.validate()?;
        let created = self.store.insert(&item).await?;
        info!(item_id = created.id, "inventory item created");
        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<InventoryItem, InventoryError> {
        debug!(item_id = id, "looking up inventory item");
        self.store.find(id).await?.ok_or(InventoryError::NotFound(id))
    }

    /// Full replace of the mutable fields. The path id always wins over the
    /// payload id.
    pub async fn update(&self, id: i32, mut item: InventoryItem) -> Result<InventoryItem, InventoryError> {
        info!(item_id = id, payload_id = item.id, "updating inventory item");
        item.validate()?;
        item.id = id;
        self.store.update(&item).await?.ok_or(InventoryError::NotFound(id))
    }

    /// Idempotent; returns whether anything was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, InventoryError> {
        let removed = self.store.delete(id).await?;
        if removed {
            info!(item_id = id, "inventory item deleted");
        } else {
            debug!(item_id = id, "delete of absent inventory item");
        }
        Ok(removed)
    }

    pub async fn list(&self, query: &InventoryQuery) -> Result<Vec<InventoryItem>, InventoryError> {
        let filter = query.resolve()?;
        debug!(?filter, "listing inventory");
        let items = self.store.scan(&filter).await?;
        info!(count = items.len(), "returning inventory items");
        Ok(items)
    }

    pub async fn restock(&self, id: i32) -> Result<(InventoryItem, RestockOutcome), InventoryError> {
        let (item, outcome) = self
            .store
            .restock(id, today())
            .await?
            .ok_or(InventoryError::NotFound(id))?;
        info!(
            item_id = id,
            added = outcome.added(),
            restock_level = item.restock_level,
            quantity = item.quantity,
            "inventory item restocked"
        );
        Ok((item, outcome))
    }
}

use super::{InventoryStore, StoreError};
use crate::filters::Filter;
use crate::model::InventoryItem;
use crate::restock::{restock, RestockOutcome};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local store; rows live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    items: RwLock<BTreeMap<i32, InventoryItem>>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn find(&self, id: i32) -> Result<Option<InventoryItem>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn insert(&self, item: &InventoryItem) -> Result<InventoryItem, StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        items.insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn update(&self, item: &InventoryItem) -> Result<Option<InventoryItem>, StoreError> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(&item.id).map(|slot| {
            *slot = item.clone();
            slot.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

    async fn scan(&self, filter: &Filter) -> Result<Vec<InventoryItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items.values().filter(|item| filter.matches(item)).cloned().collect())
    }

    async fn restock(
        &self,
        id: i32,
        today: NaiveDate,
    ) -> Result<Option<(InventoryItem, RestockOutcome)>, StoreError> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(&id).map(|item| {
            let outcome = restock(item, today);
            (item.clone(), outcome)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;
    use std::sync::Arc;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 14).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = MemoryInventoryStore::new();
        store.insert(&InventoryItem::new(1, day())).await.unwrap();
        let mut other = InventoryItem::new(1, day());
        other.name = Some("different".into());
        let err = store.insert(&other).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(1)));
        assert_eq!(store.find(1).await.unwrap().unwrap().name, None);
    }

    #[tokio::test]
    async fn update_and_delete_report_absence() {
        let store = MemoryInventoryStore::new();
        assert!(store.update(&InventoryItem::new(3, day())).await.unwrap().is_none());
        assert!(!store.delete(3).await.unwrap());

        store.insert(&InventoryItem::new(3, day())).await.unwrap();
        let mut changed = InventoryItem::new(3, day());
        changed.condition = Condition::Used;
        assert_eq!(store.update(&changed).await.unwrap(), Some(changed));
        assert!(store.delete(3).await.unwrap());
        assert!(store.find(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn scan_is_ordered_by_id() {
        let store = MemoryInventoryStore::new();
        for id in [9, 2, 5] {
            store.insert(&InventoryItem::new(id, day())).await.unwrap();
        }
        let ids: Vec<_> = store.scan(&Filter::All).await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn concurrent_restocks_do_not_lose_updates() {
        let store = Arc::new(MemoryInventoryStore::new());
        let mut item = InventoryItem::new(1, day());
        item.restock_level = 10;
        store.insert(&item).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.restock(1, day()).await.unwrap().unwrap().1 })
            })
            .collect();
        let mut topped = 0;
        for h in handles {
            if matches!(h.await.unwrap(), RestockOutcome::ToppedUp { .. }) {
                topped += 1;
            }
        }
        assert_eq!(topped, 1);
        let stored = store.find(1).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 10);
        assert_eq!(stored.restock_count, 1);
    }
}

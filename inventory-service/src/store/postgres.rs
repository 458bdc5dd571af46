use super::{InventoryStore, StoreError};
use crate::filters::Filter;
use crate::model::{Condition, InventoryItem};
use crate::restock::{restock, RestockOutcome};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{query, query_as, PgPool};

pub(crate) const SELECT_ITEM_SQL: &str =
    "SELECT id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date FROM inventory WHERE id = $1";

pub(crate) const LOCK_ITEM_SQL: &str =
    "SELECT id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date FROM inventory WHERE id = $1 FOR UPDATE";

pub(crate) const INSERT_ITEM_SQL: &str =
    "INSERT INTO inventory (id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) ON CONFLICT (id) DO NOTHING RETURNING id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date";

pub(crate) const UPDATE_ITEM_SQL: &str =
    "UPDATE inventory SET name = $2, quantity = $3, restock_level = $4, restock_count = $5, condition = $6, first_entry_date = $7, last_restock_date = $8 WHERE id = $1 RETURNING id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date";

pub(crate) const RESTOCK_ITEM_SQL: &str =
    "UPDATE inventory SET quantity = $2, restock_count = $3, last_restock_date = $4 WHERE id = $1";

pub(crate) const DELETE_ITEM_SQL: &str = "DELETE FROM inventory WHERE id = $1";

pub(crate) const LIST_ALL_SQL: &str =
    "SELECT id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date FROM inventory ORDER BY id";

pub(crate) const LIST_BY_NAME_SQL: &str =
    "SELECT id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date FROM inventory WHERE name = $1 ORDER BY id";

pub(crate) const LIST_BY_CONDITION_SQL: &str =
    "SELECT id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date FROM inventory WHERE condition = $1 ORDER BY id";

pub(crate) const LIST_BY_QUANTITY_SQL: &str =
    "SELECT id, name, quantity, restock_level, restock_count, condition, first_entry_date, last_restock_date FROM inventory WHERE quantity = $1 ORDER BY id";

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i32,
    name: Option<String>,
    quantity: i32,
    restock_level: i32,
    restock_count: i32,
    condition: String,
    first_entry_date: NaiveDate,
    last_restock_date: NaiveDate,
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = StoreError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let condition = Condition::from_name(&row.condition).ok_or_else(|| StoreError::CorruptRow {
            id: row.id,
            reason: format!("unknown condition '{}'", row.condition),
        })?;
        Ok(InventoryItem {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            restock_level: row.restock_level,
            restock_count: row.restock_count,
            condition,
            first_entry_date: row.first_entry_date,
            last_restock_date: row.last_restock_date,
        })
    }
}

fn into_items(rows: Vec<InventoryRow>) -> Result<Vec<InventoryItem>, StoreError> {
    rows.into_iter().map(InventoryItem::try_from).collect()
}

#[derive(Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn find(&self, id: i32) -> Result<Option<InventoryItem>, StoreError> {
        query_as::<_, InventoryRow>(SELECT_ITEM_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(InventoryItem::try_from)
            .transpose()
    }

    async fn insert(&self, item: &InventoryItem) -> Result<InventoryItem, StoreError> {
        let row = query_as::<_, InventoryRow>(INSERT_ITEM_SQL)
            .bind(item.id)
            .bind(item.name.as_deref())
            .bind(item.quantity)
            .bind(item.restock_level)
            .bind(item.restock_count)
            .bind(item.condition.as_str())
            .bind(item.first_entry_date)
            .bind(item.last_restock_date)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::DuplicateId(item.id)),
        }
    }

    async fn update(&self, item: &InventoryItem) -> Result<Option<InventoryItem>, StoreError> {
        query_as::<_, InventoryRow>(UPDATE_ITEM_SQL)
            .bind(item.id)
            .bind(item.name.as_deref())
            .bind(item.quantity)
            .bind(item.restock_level)
            .bind(item.restock_count)
            .bind(item.condition.as_str())
            .bind(item.first_entry_date)
            .bind(item.last_restock_date)
            .fetch_optional(&self.pool)
            .await?
            .map(InventoryItem::try_from)
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = query(DELETE_ITEM_SQL).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self, filter: &Filter) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = match filter {
            Filter::All => query_as::<_, InventoryRow>(LIST_ALL_SQL).fetch_all(&self.pool).await?,
            Filter::Name(name) => {
                query_as::<_, InventoryRow>(LIST_BY_NAME_SQL)
                    .bind(name.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            Filter::Condition(condition) => {
                query_as::<_, InventoryRow>(LIST_BY_CONDITION_SQL)
                    .bind(condition.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            Filter::Quantity(quantity) => {
                query_as::<_, InventoryRow>(LIST_BY_QUANTITY_SQL)
                    .bind(*quantity)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        into_items(rows)
    }

    async fn restock(
        &self,
        id: i32,
        today: NaiveDate,
    ) -> Result<Option<(InventoryItem, RestockOutcome)>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let locked = query_as::<_, InventoryRow>(LOCK_ITEM_SQL)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut item = match locked {
            Some(row) => InventoryItem::try_from(row)?,
            None => return Ok(None),
        };
        let outcome = restock(&mut item, today);

        query(RESTOCK_ITEM_SQL)
            .bind(item.id)
            .bind(item.quantity)
            .bind(item.restock_count)
            .bind(item.last_restock_date)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some((item, outcome)))
    }
}

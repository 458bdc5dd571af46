use crate::model::InventoryItem;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockOutcome {
    /// Quantity was below the restock level and has been raised to it.
    ToppedUp { added: i32 },
    AlreadyStocked,
}

impl RestockOutcome {
    pub fn added(self) -> i32 {
        match self {
            RestockOutcome::ToppedUp { added } => added,
            RestockOutcome::AlreadyStocked => 0,
        }
    }
}

/// Top-up policy. Below the restock level the quantity is raised exactly to
/// the level and `restock_count` goes up by one; at or above it the counters
/// are left alone. `last_restock_date` moves to `today` either way.
pub fn restock(item: &mut InventoryItem, today: NaiveDate) -> RestockOutcome {
    item.last_restock_date = today;
    if item.quantity < item.restock_level {
        let added = item.restock_level.saturating_sub(item.quantity);
        item.quantity = item.restock_level;
        item.restock_count = item.restock_count.saturating_add(1);
        RestockOutcome::ToppedUp { added }
    } else {
        RestockOutcome::AlreadyStocked
    }
}

use crate::model::{Condition, InventoryItem, ValidationError};
use serde::Deserialize;

/// Raw `GET /inventory` query parameters.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InventoryQuery {
    pub name: Option<String>,
    pub condition: Option<String>,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Name(String),
    Condition(Condition),
    Quantity(i32),
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl InventoryQuery {
    /// Filters are not combined: name wins over condition, condition over
    /// quantity.
    pub fn resolve(&self) -> Result<Filter, ValidationError> {
        if let Some(name) = present(&self.name) {
            return Ok(Filter::Name(name.to_string()));
        }
        if let Some(token) = present(&self.condition) {
            return Condition::parse_token(token).map(Filter::Condition);
        }
        if let Some(raw) = present(&self.quantity) {
            return raw
                .trim()
                .parse::<i32>()
                .map(Filter::Quantity)
                .map_err(|_| ValidationError::InvalidQuantity(raw.to_string()));
        }
        Ok(Filter::All)
    }
}

impl Filter {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        match self {
            Filter::All => true,
            Filter::Name(name) => item.name.as_deref() == Some(name.as_str()),
            Filter::Condition(condition) => item.condition == *condition,
            Filter::Quantity(quantity) => item.quantity == *quantity,
        }
    }
}

use chrono::{NaiveDate, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const NAME_MAX_LEN: usize = 63;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid inventory item: {0}")]
    Payload(String),
    #[error("Invalid inventory item: name exceeds {} characters", NAME_MAX_LEN)]
    NameTooLong,
    #[error("Unrecognized condition '{0}' (expected NEW, OPEN_BOX, USED or 0-2)")]
    UnknownCondition(String),
    #[error("Invalid quantity filter '{0}': expected an integer")]
    InvalidQuantity(String),
}

/// Physical state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    New,
    OpenBox,
    Used,
}

// name <-> ordinal; the ordinal is the position in this table.
const CONDITIONS: [(Condition, &str); 3] = [
    (Condition::New, "NEW"),
    (Condition::OpenBox, "OPEN_BOX"),
    (Condition::Used, "USED"),
];

impl Condition {
    pub fn as_str(self) -> &'static str {
        CONDITIONS[self.ordinal() as usize].1
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Condition::New => 0,
            Condition::OpenBox => 1,
            Condition::Used => 2,
        }
    }

    /// Exact, case-sensitive match on the stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        CONDITIONS.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
    }

    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        CONDITIONS.get(usize::try_from(ordinal).ok()?).map(|(c, _)| *c)
    }

    /// Query-string form: all digits selects by ordinal, anything else is a
    /// case-insensitive name.
    pub fn parse_token(token: &str) -> Result<Self, ValidationError> {
        let token = token.trim();
        let parsed = if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            token.parse::<u64>().ok().and_then(Self::from_ordinal)
        } else {
            Self::from_name(&token.to_ascii_uppercase())
        };
        parsed.ok_or_else(|| ValidationError::UnknownCondition(token.to_string()))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

struct ConditionVisitor;

impl<'de> Visitor<'de> for ConditionVisitor {
    type Value = Condition;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one of NEW, OPEN_BOX, USED or its ordinal 0-2")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Condition, E> {
        Condition::from_name(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Condition, E> {
        Condition::from_ordinal(v).ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Condition, E> {
        u64::try_from(v)
            .ok()
            .and_then(Condition::from_ordinal)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ConditionVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i32,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: i32,
    pub restock_level: i32,
    pub restock_count: i32,
    pub condition: Condition,
    pub first_entry_date: NaiveDate,
    pub last_restock_date: NaiveDate,
}

impl InventoryItem {
    /// An item carrying every column default, entered on `today`.
    pub fn new(id: i32, today: NaiveDate) -> Self {
        Self {
            id,
            name: None,
            quantity: 0,
            restock_level: 0,
            restock_count: 0,
            condition: Condition::New,
            first_entry_date: today,
            last_restock_date: today,
        }
    }

    /// Parses a request payload. Every failure (bad JSON, missing key, wrong
    /// type, unparseable date or condition) comes back as a `ValidationError`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ValidationError> {
        let item: InventoryItem =
            serde_json::from_slice(bytes).map_err(|e| ValidationError::Payload(e.to_string()))?;
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) if name.chars().count() > NAME_MAX_LEN => Err(ValidationError::NameTooLong),
            _ => Ok(()),
        }
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

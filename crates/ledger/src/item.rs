use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use quotegen_core::{Money, ValueObject};

/// One editable row of a quotation.
///
/// `quantity` and `rate` are `None` when the input surface could not read a
/// number out of what was typed. Such rows stay in the ledger, contribute a
/// zero amount and are never eligible for the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_operand")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_operand")]
    pub rate: Option<Decimal>,
}

impl ValueObject for LineItem {}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity: Some(quantity),
            rate: Some(rate),
        }
    }

    /// The row appended by "add item": empty description, zero quantity and rate.
    pub fn blank() -> Self {
        Self::new(String::new(), Decimal::ZERO, Decimal::ZERO)
    }

    pub fn amount(&self) -> Money {
        compute_amount(self)
    }

    /// Non-empty description and strictly positive quantity and rate.
    pub fn is_eligible(&self) -> bool {
        let positive = |v: Option<Decimal>| v.is_some_and(|v| v > Decimal::ZERO);
        !self.description.is_empty() && positive(self.quantity) && positive(self.rate)
    }

    pub fn apply(&mut self, update: ItemUpdate) {
        match update {
            ItemUpdate::Description(text) => self.description = text,
            ItemUpdate::Quantity(value) => self.quantity = value,
            ItemUpdate::Rate(value) => self.rate = value,
        }
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::blank()
    }
}

/// `quantity × rate`, or zero.
///
/// Total by construction: an absent operand or a product outside the decimal
/// range yields a zero amount instead of an error.
pub fn compute_amount(item: &LineItem) -> Money {
    match (item.quantity, item.rate) {
        (Some(quantity), Some(rate)) => quantity
            .checked_mul(rate)
            .map(Money::new)
            .unwrap_or(Money::ZERO),
        _ => Money::ZERO,
    }
}

/// Reads a number the way a form field would: surrounding whitespace is
/// ignored, plain and scientific notation are accepted, anything else is `None`.
pub fn parse_operand(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Which column of a row an update targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Description,
    Quantity,
    Rate,
}

/// A new value for one field of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ItemUpdate {
    Description(String),
    #[serde(deserialize_with = "lenient_operand")]
    Quantity(Option<Decimal>),
    #[serde(deserialize_with = "lenient_operand")]
    Rate(Option<Decimal>),
}

impl ItemUpdate {
    pub fn field(&self) -> ItemField {
        match self {
            ItemUpdate::Description(_) => ItemField::Description,
            ItemUpdate::Quantity(_) => ItemField::Quantity,
            ItemUpdate::Rate(_) => ItemField::Rate,
        }
    }

    /// Input-surface clamping: negative numbers become zero.
    pub fn clamped(self) -> Self {
        let clamp = |v: Option<Decimal>| v.map(|v| v.max(Decimal::ZERO));
        match self {
            ItemUpdate::Quantity(v) => ItemUpdate::Quantity(clamp(v)),
            ItemUpdate::Rate(v) => ItemUpdate::Rate(clamp(v)),
            other => other,
        }
    }
}

fn lenient_operand<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        serde_json::Value::String(s) => parse_operand(&s),
        _ => None,
    })
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One sales row as supplied by ingestion, before any cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: String,
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub unit_price: Decimal,
    pub quantity_sold: Option<String>,
    pub total_sale: Decimal,
}

/// A row whose text fields have been trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub date: String,
    pub item_name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity_sold: Option<String>,
    pub total_sale: Decimal,
}

/// A row whose quantity has been coerced, imputed and truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantifiedRecord {
    pub date: String,
    pub item_name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity_sold: u32,
    pub total_sale: Decimal,
}

/// Pipeline output unit.
///
/// `total_sale` always equals `unit_price * quantity_sold`; the reconciler
/// assigns it rather than trusting the stored value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CleanRecord {
    pub date: NaiveDate,
    pub item_name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity_sold: u32,
    pub total_sale: Decimal,
}

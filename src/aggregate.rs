use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{error::Error, record::CleanRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemShare {
    pub item_name: String,
    pub quantity: u64,
    /// Share of all units sold, in percent.
    pub percent: Decimal,
}

/// Everything the report needs, computed once from the reconciled batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub total_revenue: Decimal,
    pub best_selling_item: Option<String>,
    pub revenue_by_category: BTreeMap<String, Decimal>,
    pub item_shares: Vec<ItemShare>,
    pub daily_revenue: BTreeMap<NaiveDate, Decimal>,
}

impl Aggregates {
    pub fn from_records(records: &[CleanRecord]) -> Result<Self, Error> {
        Ok(Self {
            total_revenue: total_revenue(records)?,
            best_selling_item: best_selling_item(records),
            revenue_by_category: revenue_by_category(records)?,
            item_shares: item_shares(records),
            daily_revenue: daily_revenue(records)?,
        })
    }
}

fn add_revenue(sum: Decimal, amount: Decimal) -> Result<Decimal, Error> {
    sum.checked_add(amount).ok_or(Error::RevenueOutOfRange)
}

fn revenue_by<K, F>(records: &[CleanRecord], key: F) -> Result<BTreeMap<K, Decimal>, Error>
where
    K: Ord,
    F: Fn(&CleanRecord) -> K,
{
    let mut revenue = BTreeMap::new();
    for r in records {
        let sum = revenue.entry(key(r)).or_insert(Decimal::ZERO);
        *sum = add_revenue(*sum, r.total_sale)?;
    }
    Ok(revenue)
}

pub fn total_revenue(records: &[CleanRecord]) -> Result<Decimal, Error> {
    records
        .iter()
        .try_fold(Decimal::ZERO, |sum, r| add_revenue(sum, r.total_sale))
}

pub fn item_quantities(records: &[CleanRecord]) -> BTreeMap<String, u64> {
    let mut quantities = BTreeMap::new();
    for r in records {
        *quantities.entry(r.item_name.clone()).or_insert(0) += u64::from(r.quantity_sold);
    }
    quantities
}

/// Item with the most units sold. Ties go to the lexicographically smallest
/// name.
pub fn best_selling_item(records: &[CleanRecord]) -> Option<String> {
    // `max_by_key` keeps the last maximum, so walk the names in reverse.
    item_quantities(records)
        .into_iter()
        .rev()
        .max_by_key(|(_, quantity)| *quantity)
        .map(|(name, _)| name)
}

pub fn revenue_by_category(records: &[CleanRecord]) -> Result<BTreeMap<String, Decimal>, Error> {
    revenue_by(records, |r| r.category.clone())
}

/// Per-item share of total units, ordered by item name. Empty when nothing
/// was sold.
pub fn item_shares(records: &[CleanRecord]) -> Vec<ItemShare> {
    let quantities = item_quantities(records);
    let total: u64 = quantities.values().sum();
    if total == 0 {
        return Vec::new();
    }
    quantities
        .into_iter()
        .map(|(item_name, quantity)| ItemShare {
            percent: Decimal::from(quantity) * Decimal::ONE_HUNDRED / Decimal::from(total),
            item_name,
            quantity,
        })
        .collect()
}

/// Revenue per calendar day, in chronological order.
pub fn daily_revenue(records: &[CleanRecord]) -> Result<BTreeMap<NaiveDate, Decimal>, Error> {
    revenue_by(records, |r| r.date)
}

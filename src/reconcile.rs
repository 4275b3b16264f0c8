use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::Error,
    record::{CleanRecord, QuantifiedRecord},
};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A stored total that disagreed with `unit_price * quantity_sold` by more
/// than the tolerance. Reported for audit, then overwritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Discrepancy {
    pub date: NaiveDate,
    pub item_name: String,
    pub stored_total: Decimal,
    pub calculated_total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub records: Vec<CleanRecord>,
    pub discrepancies: Vec<Discrepancy>,
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Recompute every total from unit price and quantity.
///
/// Records whose stored total is off by more than `tolerance` are flagged,
/// but every record gets the recomputed total: price and quantity are
/// authoritative, the stored total is not.
pub fn reconcile(
    records: Vec<QuantifiedRecord>,
    tolerance: Decimal,
) -> Result<Reconciliation, Error> {
    let mut clean = Vec::with_capacity(records.len());
    let mut discrepancies = Vec::new();

    for (row, rec) in records.into_iter().enumerate() {
        let date = parse_date(&rec.date).ok_or_else(|| Error::InvalidDate {
            row: row + 1,
            value: rec.date.clone(),
        })?;
        let out_of_range = || Error::TotalOutOfRange { row: row + 1 };
        let calculated = rec
            .unit_price
            .checked_mul(Decimal::from(rec.quantity_sold))
            .ok_or_else(out_of_range)?;
        let difference = rec
            .total_sale
            .checked_sub(calculated)
            .ok_or_else(out_of_range)?;

        if difference.abs() > tolerance {
            log::warn!(
                "{} `{}`: stored total {} differs from calculated {}, correcting",
                date,
                rec.item_name,
                rec.total_sale,
                calculated
            );
            discrepancies.push(Discrepancy {
                date,
                item_name: rec.item_name.clone(),
                stored_total: rec.total_sale,
                calculated_total: calculated,
            });
        }

        clean.push(CleanRecord {
            date,
            item_name: rec.item_name,
            category: rec.category,
            unit_price: rec.unit_price,
            quantity_sold: rec.quantity_sold,
            total_sale: calculated,
        });
    }

    log::info!(
        "reconciled {} records, {} discrepancies corrected",
        clean.len(),
        discrepancies.len()
    );
    Ok(Reconciliation {
        records: clean,
        discrepancies,
    })
}

use std::str::FromStr;

use itertools::Itertools;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    error::Error,
    record::{NormalizedRecord, QuantifiedRecord},
};

/// A record after coercion; `candidate` is `None` when the quantity was
/// absent or unusable.
#[derive(Debug, Clone, PartialEq)]
struct Coerced {
    record: NormalizedRecord,
    candidate: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImputationSummary {
    pub median: Decimal,
    /// Number of records whose quantity was replaced by the median.
    pub imputed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Imputed {
    pub records: Vec<QuantifiedRecord>,
    pub summary: ImputationSummary,
}

/// Parse a quantity cell. Plain and scientific notation are accepted;
/// negative values and values beyond `u32` are treated as unusable.
pub fn parse_quantity(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()?;
    if value < Decimal::ZERO || value > Decimal::from(u32::MAX) {
        return None;
    }
    Some(value)
}

/// Middle value of the sorted candidates, mean of the two central values
/// for an even count. `None` for an empty slice.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    let sorted = values.iter().copied().sorted().collect_vec();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(sorted[mid]),
        _ => Some((sorted[mid - 1] + sorted[mid]) / Decimal::from(2)),
    }
}

fn coerce(records: Vec<NormalizedRecord>) -> Vec<Coerced> {
    records
        .into_iter()
        .map(|record| {
            let candidate = record.quantity_sold.as_deref().and_then(parse_quantity);
            if candidate.is_none() {
                log::debug!(
                    "unusable quantity {:?} for `{}` on {}",
                    record.quantity_sold,
                    record.item_name,
                    record.date
                );
            }
            Coerced { record, candidate }
        })
        .collect()
}

fn impute(coerced: Vec<Coerced>, median: Decimal) -> Vec<(NormalizedRecord, Decimal)> {
    coerced
        .into_iter()
        .map(|c| (c.record, c.candidate.unwrap_or(median)))
        .collect()
}

/// Truncates toward zero, so 2.5 and 2.9 both become 2.
fn finalize(imputed: Vec<(NormalizedRecord, Decimal)>) -> Result<Vec<QuantifiedRecord>, Error> {
    imputed
        .into_iter()
        .map(|(rec, quantity)| {
            let quantity_sold = quantity
                .trunc()
                .to_u32()
                .ok_or(Error::QuantityOutOfRange(quantity))?;
            Ok(QuantifiedRecord {
                date: rec.date,
                item_name: rec.item_name,
                category: rec.category,
                unit_price: rec.unit_price,
                quantity_sold,
                total_sale: rec.total_sale,
            })
        })
        .collect()
}

/// Coerce every quantity, impute the missing ones with the batch median and
/// truncate the result to whole units.
///
/// Coercion runs over the whole batch before the median is taken, so the
/// median only ever sees this batch's parsed values.
pub fn impute_quantities(records: Vec<NormalizedRecord>) -> Result<Imputed, Error> {
    let coerced = coerce(records);

    let parsed = coerced.iter().filter_map(|c| c.candidate).collect_vec();
    let median = median(&parsed).ok_or(Error::EmptyQuantityDomain)?;
    let imputed = coerced.len() - parsed.len();
    log::info!(
        "median quantity {} over {} parsed values, imputing {} records",
        median,
        parsed.len(),
        imputed
    );

    let records = finalize(impute(coerced, median))?;
    Ok(Imputed {
        records,
        summary: ImputationSummary { median, imputed },
    })
}

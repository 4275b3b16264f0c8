use std::{fs::File, iter, path::Path, str::FromStr};

use itertools::Either;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{error::Error, record::RawRecord};

const COLUMNS: [&str; 6] = [
    "Date",
    "ItemName",
    "Category",
    "UnitPrice",
    "QuantitySold",
    "TotalSale",
];

#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
struct ParsedRecord {
    date: String,
    item_name: Option<String>,
    category: Option<String>,
    // Money is read as text, csv's type inference turns wide integers into
    // u128, which `Decimal` refuses.
    unit_price: String,
    // Kept as text: malformed quantities are repaired later, not rejected here.
    quantity_sold: Option<String>,
    total_sale: String,
}

fn parse_money(column: &str, text: &str) -> Result<Decimal, Error> {
    let invalid = || Error::ParsingFailure(format!("invalid {} `{}`", column, text));
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| invalid())
}

/// Every column must be present in the header, even though some cells
/// may be empty.
fn check_columns<R>(rdr: &mut csv::Reader<R>) -> Result<(), Error>
where
    R: std::io::Read,
{
    let headers = rdr
        .headers()
        .map_err(|e| Error::ParsingFailure(e.to_string()))?;
    let missing: Vec<_> = COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::ParsingFailure(format!(
            "missing column(s): {}",
            missing.join(", ")
        )))
    }
}

pub fn parse<R>(mut rdr: csv::Reader<R>) -> impl Iterator<Item = Result<RawRecord, Error>>
where
    R: std::io::Read,
{
    if let Err(e) = check_columns(&mut rdr) {
        return Either::Left(iter::once(Err(e)));
    }
    Either::Right(rdr.into_deserialize::<ParsedRecord>().map(|rec| {
        let rec = rec.map_err(|e| Error::ParsingFailure(e.to_string()))?;
        let unit_price = parse_money("UnitPrice", &rec.unit_price)?;
        if unit_price < Decimal::ZERO {
            return Err(Error::ParsingFailure(format!(
                "unit price must not be negative, got {}",
                unit_price
            )));
        }
        Ok(RawRecord {
            date: rec.date,
            item_name: rec.item_name,
            category: rec.category,
            unit_price,
            quantity_sold: rec.quantity_sold,
            total_sale: parse_money("TotalSale", &rec.total_sale)?,
        })
    }))
}

/// Read the whole sales batch from a CSV file.
///
/// A row that fails to parse aborts the load, there is no point in
/// analysing a partial batch.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::SourceUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let records = parse(rdr).collect::<Result<Vec<_>, _>>()?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

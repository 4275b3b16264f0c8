use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("sales source `{path}` is unavailable: {reason}")]
    SourceUnavailable { path: String, reason: String },
    #[error("failed to parse input, reason: `{0}`")]
    ParsingFailure(String),
    #[error("no usable quantities in batch: every QuantitySold value is missing or malformed")]
    EmptyQuantityDomain,
    #[error("record {row} has an unparseable date `{value}`")]
    InvalidDate { row: usize, value: String },
    /// Guard only: coercion already rejects quantities beyond `u32`, so a
    /// finalized quantity cannot reach this.
    #[error("quantity {0} does not fit in an integer quantity")]
    QuantityOutOfRange(Decimal),
    #[error("record {row}: total sale is too large to compute")]
    TotalOutOfRange { row: usize },
    #[error("revenue is too large to sum")]
    RevenueOutOfRange,
    #[error("failed to write report, reason: `{0}`")]
    ReportFailure(String),
}

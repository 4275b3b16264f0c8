use rust_decimal::Decimal;

use crate::{
    aggregate::Aggregates,
    error::Error,
    normalizer::normalize,
    quantity::{impute_quantities, parse_quantity, ImputationSummary},
    reconcile::{reconcile, Discrepancy},
    record::{CleanRecord, RawRecord},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Largest stored/calculated total difference that is not flagged.
    pub tolerance: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }
}

/// Missing values per column, as seen before cleaning. A quantity that
/// does not parse counts as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MissingValues {
    pub item_name: usize,
    pub category: usize,
    pub quantity_sold: usize,
}

impl MissingValues {
    fn count(records: &[RawRecord]) -> Self {
        let mut missing = Self::default();
        for r in records {
            let quantity = r.quantity_sold.as_deref().and_then(parse_quantity);
            missing.item_name += usize::from(r.item_name.is_none());
            missing.category += usize::from(r.category.is_none());
            missing.quantity_sold += usize::from(quantity.is_none());
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub records: Vec<CleanRecord>,
    pub discrepancies: Vec<Discrepancy>,
    pub missing: MissingValues,
    pub imputation: ImputationSummary,
    pub aggregates: Aggregates,
}

#[derive(Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Clean, reconcile and aggregate one batch.
    ///
    /// The batch moves through each stage by value; nothing is shared between
    /// runs, so the same input always gives the same output.
    pub fn run(&self, raw: Vec<RawRecord>) -> Result<PipelineOutput, Error> {
        log::info!("cleaning batch of {} records", raw.len());
        let missing = MissingValues::count(&raw);

        let normalized = normalize(raw);
        let imputed = impute_quantities(normalized)?;
        let reconciled = reconcile(imputed.records, self.config.tolerance)?;
        let aggregates = Aggregates::from_records(&reconciled.records)?;

        Ok(PipelineOutput {
            records: reconciled.records,
            discrepancies: reconciled.discrepancies,
            missing,
            imputation: imputed.summary,
            aggregates,
        })
    }
}

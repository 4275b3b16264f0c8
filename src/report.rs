use std::io::Write;

use itertools::Itertools;
use rust_decimal::Decimal;

use crate::{error::Error, pipeline::PipelineOutput};

/// Upper-case every letter that follows a non-letter, lower-case the rest:
/// `"iced tea"` becomes `"Iced Tea"`.
pub fn title_case(text: &str) -> String {
    let mut previous_is_letter = false;
    text.chars()
        .map(|c| {
            let mapped = if previous_is_letter {
                c.to_lowercase().collect::<String>()
            } else {
                c.to_uppercase().collect::<String>()
            };
            previous_is_letter = c.is_alphabetic();
            mapped
        })
        .collect()
}

/// Two-column table with the label column padded to its widest entry.
fn table(rows: Vec<(String, String)>) -> String {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    rows.into_iter()
        .map(|(label, value)| format!("{:<width$}  {}", label, value, width = width))
        .join("\n")
}

fn money(amount: &Decimal) -> String {
    format!("{:.2}", amount)
}

fn percent(share: &Decimal) -> String {
    format!("{:.1}%", share)
}

/// Text rendering of a pipeline run: the cleaning log followed by the data
/// behind each chart.
pub struct Report<'a> {
    output: &'a PipelineOutput,
    preview_rows: usize,
}

impl<'a> Report<'a> {
    pub fn new(output: &'a PipelineOutput, preview_rows: usize) -> Self {
        Self {
            output,
            preview_rows,
        }
    }

    fn csv<S: serde::Serialize>(rows: impl Iterator<Item = S>) -> Result<String, Error> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| Error::ReportFailure(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::ReportFailure(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| Error::ReportFailure(e.to_string()))
    }

    pub fn render(&self) -> Result<String, Error> {
        let out = self.output;
        let agg = &out.aggregates;
        let mut sections = Vec::new();

        sections.push(format!(
            "Missing values before cleaning:\n{}",
            table(vec![
                ("ItemName".to_string(), out.missing.item_name.to_string()),
                ("Category".to_string(), out.missing.category.to_string()),
                ("QuantitySold".to_string(), out.missing.quantity_sold.to_string()),
            ])
        ));
        sections.push(format!(
            "Imputed {} quantities with the batch median {}",
            out.imputation.imputed, out.imputation.median
        ));

        if out.discrepancies.is_empty() {
            sections.push("No calculation errors found in 'TotalSale'".to_string());
        } else {
            sections.push(format!(
                "Found and fixed calculation errors in 'TotalSale':\n{}",
                Self::csv(out.discrepancies.iter())?.trim_end()
            ));
        }

        sections.push(format!(
            "Cleaned Data (First {} Rows):\n{}",
            self.preview_rows,
            Self::csv(out.records.iter().take(self.preview_rows))?.trim_end()
        ));

        sections.push(format!("Total Revenue: ${}", money(&agg.total_revenue)));
        sections.push(format!(
            "Best-Selling Item (by quantity): {}",
            agg.best_selling_item
                .as_deref()
                .map(title_case)
                .unwrap_or_else(|| "-".to_string())
        ));

        sections.push(format!(
            "Total Revenue by Category:\n{}",
            table(
                agg.revenue_by_category
                    .iter()
                    .map(|(category, revenue)| (category.clone(), money(revenue)))
                    .collect()
            )
        ));
        sections.push(format!(
            "Proportion of Total Items Sold:\n{}",
            table(
                agg.item_shares
                    .iter()
                    .map(|s| (title_case(&s.item_name), percent(&s.percent)))
                    .collect()
            )
        ));
        sections.push(format!(
            "Total Daily Sales Over Time (revenue axis from 0):\n{}",
            table(
                agg.daily_revenue
                    .iter()
                    .map(|(date, revenue)| (date.to_string(), money(revenue)))
                    .collect()
            )
        ));

        Ok(sections.join("\n\n") + "\n")
    }

    pub fn write(&self, mut output: impl Write) -> Result<(), Error> {
        output
            .write_all(self.render()?.as_bytes())
            .and_then(|_| output.flush())
            .map_err(|e| Error::ReportFailure(e.to_string()))
    }
}

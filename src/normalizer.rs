use crate::record::{NormalizedRecord, RawRecord};

/// Trim and lower-case a free-text field. An absent field becomes `""`,
/// the row itself is kept.
pub fn normalize_text(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// Normalize the text fields of every record, keeping length and order.
pub fn normalize(records: Vec<RawRecord>) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .map(|rec| NormalizedRecord {
            item_name: normalize_text(rec.item_name.as_deref()),
            category: normalize_text(rec.category.as_deref()),
            date: rec.date,
            unit_price: rec.unit_price,
            quantity_sold: rec.quantity_sold,
            total_sale: rec.total_sale,
        })
        .collect()
}

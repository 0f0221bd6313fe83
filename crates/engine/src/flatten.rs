use crate::model::{CatalogRow, CrossEntry};
use crate::normalize::normalize;

/// Un-pivot the wide equivalence catalog into cross-reference entries.
///
/// One entry per (SKU, brand column) pair with a non-empty cell. A cell that
/// normalizes to the empty string is treated as absent, not as a valid key;
/// rows with an empty SKU are skipped entirely. Re-running against an
/// unchanged catalog yields an identical entry set: the output replaces,
/// never appends to, any prior mapping.
pub fn flatten_catalog(rows: &[CatalogRow], strip: &[char]) -> Vec<CrossEntry> {
    let mut entries = Vec::new();

    for row in rows {
        let sku = row.sku.trim();
        if sku.is_empty() {
            continue;
        }
        for (label, raw) in &row.cells {
            let key = normalize(raw, strip);
            if key.is_empty() {
                continue;
            }
            entries.push(CrossEntry {
                brand: label.clone(),
                key,
                sku: sku.to_string(),
            });
        }
    }

    entries
}

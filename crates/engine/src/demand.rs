use crate::model::{DemandRecord, DemandRow, ResolvedMapping};
use crate::normalize::normalize;

/// Attach a resolved SKU to each demand row via its canonical key.
///
/// Left-outer semantics: every input row appears exactly once in the output.
/// Unmatched rows carry `sku = None`; they stay in the relation for gap
/// analysis and are excluded only from SKU-keyed rollups.
pub fn attach(
    rows: &[DemandRow],
    mapping: &ResolvedMapping,
    strip: &[char],
) -> Vec<DemandRecord> {
    rows.iter()
        .map(|row| {
            let key = normalize(&row.part_number, strip);
            let hit = mapping.get(&key);
            DemandRecord {
                record_id: row.record_id.clone(),
                brand: row.brand.clone(),
                part_number: row.part_number.clone(),
                key,
                matched_brand: hit.map(|e| e.brand.clone()),
                sku: hit.map(|e| e.sku.clone()),
                quantity: row.quantity,
                region: row.region.clone(),
                period: row.period.clone(),
            }
        })
        .collect()
}

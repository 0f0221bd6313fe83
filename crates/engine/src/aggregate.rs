use std::collections::{BTreeMap, HashSet};

use crate::model::{DemandRecord, RegionalAggregate};

/// Roll up resolved demand by SKU and region, then rank by total.
///
/// Subtotals exist only for configured regions with at least one record; an
/// empty (SKU, region) group stays absent rather than zero. Records tagged
/// with an unconfigured region still count toward the SKU total, just not
/// toward any subtotal. Rank is dense over descending total, 1 = highest;
/// rows with equal totals share a rank and are ordered by SKU so the output
/// relation is byte-stable.
pub fn aggregate(records: &[DemandRecord], regions: &[String]) -> Vec<RegionalAggregate> {
    let configured: HashSet<&str> = regions.iter().map(String::as_str).collect();

    let mut groups: BTreeMap<&str, (BTreeMap<String, i64>, i64, usize)> = BTreeMap::new();
    for record in records {
        let Some(sku) = record.sku.as_deref() else {
            continue;
        };
        let entry = groups.entry(sku).or_insert_with(|| (BTreeMap::new(), 0, 0));
        entry.1 += record.quantity;
        entry.2 += 1;
        if configured.contains(record.region.as_str()) {
            *entry.0.entry(record.region.clone()).or_insert(0) += record.quantity;
        }
    }

    let mut aggregates: Vec<RegionalAggregate> = groups
        .into_iter()
        .map(|(sku, (region_totals, total, record_count))| RegionalAggregate {
            sku: sku.to_string(),
            region_totals,
            total,
            record_count,
            rank: 0,
        })
        .collect();

    aggregates.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.sku.cmp(&b.sku)));

    let mut rank = 0;
    let mut prev_total = None;
    for agg in aggregates.iter_mut() {
        if prev_total != Some(agg.total) {
            rank += 1;
            prev_total = Some(agg.total);
        }
        agg.rank = rank;
    }

    aggregates
}

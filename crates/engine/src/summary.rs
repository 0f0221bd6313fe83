use std::collections::HashSet;

use crate::model::{Conflict, DemandRecord, PipelineSummary, RegionalAggregate, RejectedRow};

/// Compute the run summary from the materialized pipeline outputs.
pub fn compute_summary(
    records: &[DemandRecord],
    rejects: &[RejectedRow],
    cross_entries: usize,
    mapping_keys: usize,
    conflicts: &[Conflict],
    aggregates: &[RegionalAggregate],
    regions: &[String],
) -> PipelineSummary {
    let configured: HashSet<&str> = regions.iter().map(String::as_str).collect();

    let resolved_records = records.iter().filter(|r| r.sku.is_some()).count();
    let unknown_region_records = records
        .iter()
        .filter(|r| !configured.contains(r.region.as_str()))
        .count();

    PipelineSummary {
        input_rows: records.len() + rejects.len(),
        rejected_rows: rejects.len(),
        resolved_records,
        unresolved_records: records.len() - resolved_records,
        unknown_region_records,
        cross_entries,
        mapping_keys,
        ambiguous_keys: conflicts.len(),
        distinct_skus: aggregates.len(),
    }
}

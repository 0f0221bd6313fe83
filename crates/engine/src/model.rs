use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single raw demand row from the retailer staging relation.
///
/// Quantities arrive already annualized; the loader rejects rows missing a
/// part number, quantity, or region before this struct is built.
#[derive(Debug, Clone)]
pub struct DemandRow {
    pub record_id: String,
    pub brand: String,
    pub part_number: String,
    pub quantity: i64,
    pub region: String,
    pub period: String,
}

/// One row of the wide equivalence catalog: an internal SKU plus the raw
/// cell value for each configured brand column, in config order.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub sku: String,
    pub cells: Vec<(String, String)>,
}

/// Sales figure for one (internal SKU, region), sourced from the BI tool.
#[derive(Debug, Clone)]
pub struct SalesRow {
    pub sku: String,
    pub region: String,
    pub quantity: i64,
}

// ---------------------------------------------------------------------------
// Cross-reference
// ---------------------------------------------------------------------------

/// One brand-to-internal equivalence fact from the flattened catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossEntry {
    pub brand: String,
    pub key: String,
    pub sku: String,
}

/// Winner for one canonical key after conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub key: String,
    pub brand: String,
    pub sku: String,
}

/// Deduplicated mapping: every canonical key maps to exactly one (brand, SKU).
///
/// Keyed storage keeps iteration in key order so the persisted mapping
/// relation is byte-stable across re-runs.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMapping {
    pub entries: BTreeMap<String, ResolvedEntry>,
}

impl ResolvedMapping {
    pub fn get(&self, key: &str) -> Option<&ResolvedEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ambiguous canonical key and every candidate it matched.
/// The first candidate is the winner under the configured tie-break order.
#[derive(Debug, Clone, Serialize)]
pub struct Conflict {
    pub key: String,
    pub winner: ResolvedEntry,
    pub candidates: Vec<CrossEntry>,
}

// ---------------------------------------------------------------------------
// Resolved demand
// ---------------------------------------------------------------------------

/// A demand row enriched with its canonical key and resolution outcome.
/// `sku` is None when no cross-reference matched; such rows are kept for
/// gap analysis and excluded only from SKU-keyed rollups.
#[derive(Debug, Clone, Serialize)]
pub struct DemandRecord {
    pub record_id: String,
    pub brand: String,
    pub part_number: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub quantity: i64,
    pub region: String,
    pub period: String,
}

/// A demand row excluded from the run, with the reason.
/// `row` is the 1-based data row index in the demand input.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub record_id: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-SKU demand rollup across the configured regions.
///
/// `region_totals` holds only regions with at least one record: an absent
/// region means "no reported demand", which downstream gap analysis keeps
/// distinct from an explicit zero. `total` sums every resolved record for
/// the SKU, including records tagged with an unconfigured region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionalAggregate {
    pub sku: String,
    pub region_totals: BTreeMap<String, i64>,
    pub total: i64,
    pub record_count: usize,
    pub rank: usize,
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Benchmarking figures for one SKU. Ratios are None where the metric is
/// undefined (reported as N/A, never a divide-by-zero).
#[derive(Debug, Clone, Serialize)]
pub struct SkuKpi {
    pub sku: String,
    pub demand: i64,
    pub sales: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_opportunity_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penetration_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_rate_pct: Option<f64>,
}

/// Reporting-time KPI document: per-SKU figures plus the catalog coverage
/// ratio over the SKU universe of this run.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_ratio: Option<f64>,
    pub skus: Vec<SkuKpi>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub input_rows: usize,
    pub rejected_rows: usize,
    pub resolved_records: usize,
    pub unresolved_records: usize,
    pub unknown_region_records: usize,
    pub cross_entries: usize,
    pub mapping_keys: usize,
    pub ambiguous_keys: usize,
    pub distinct_skus: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub catalog_sha256: String,
    pub demand_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub meta: PipelineMeta,
    pub summary: PipelineSummary,
    pub mapping: Vec<ResolvedEntry>,
    pub records: Vec<DemandRecord>,
    pub aggregates: Vec<RegionalAggregate>,
    pub conflicts: Vec<Conflict>,
    pub rejects: Vec<RejectedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpis: Option<KpiReport>,
}

use sha2::{Digest, Sha256};

use crate::aggregate::aggregate;
use crate::config::{CatalogConfig, DemandConfig, PipelineConfig, SalesConfig};
use crate::demand::attach;
use crate::error::PipelineError;
use crate::flatten::flatten_catalog;
use crate::kpi;
use crate::model::{
    CatalogRow, DemandRow, PipelineMeta, PipelineResult, RejectedRow, SalesRow,
};
use crate::resolve::resolve;
use crate::summary::compute_summary;

/// Pre-loaded pipeline inputs plus their content digests.
///
/// Demand rows missing a required field are collected as rejects at load
/// time, not dropped and not fatal; they travel with the input so the run
/// can report them.
pub struct PipelineInput {
    pub catalog: Vec<CatalogRow>,
    pub demand: Vec<DemandRow>,
    pub rejects: Vec<RejectedRow>,
    pub sales: Option<Vec<SalesRow>>,
    pub catalog_sha256: String,
    pub demand_sha256: String,
    pub sales_sha256: Option<String>,
}

impl PipelineInput {
    /// Parse every configured input from CSV text.
    pub fn load(
        config: &PipelineConfig,
        catalog_csv: &str,
        demand_csv: &str,
        sales_csv: Option<&str>,
    ) -> Result<Self, PipelineError> {
        let catalog = load_catalog_rows(catalog_csv, &config.catalog)?;
        let (demand, rejects) = load_demand_rows(demand_csv, &config.demand)?;

        let sales = match (&config.sales, sales_csv) {
            (Some(sales_config), Some(csv_data)) => {
                Some(load_sales_rows(csv_data, sales_config)?)
            }
            _ => None,
        };

        Ok(Self {
            catalog,
            demand,
            rejects,
            sales_sha256: sales_csv.map(sha256_hex),
            catalog_sha256: sha256_hex(catalog_csv),
            demand_sha256: sha256_hex(demand_csv),
            sales,
        })
    }
}

/// Run the full pipeline: flatten, resolve, attach, aggregate, KPIs.
///
/// Single batch pass; the resolver and aggregator see fully materialized
/// inputs, so output values are independent of input row order.
pub fn run(config: &PipelineConfig, input: &PipelineInput) -> Result<PipelineResult, PipelineError> {
    // Hand-built configs may bypass from_toml; refuse to run on an invalid one.
    config.validate()?;

    let entries = flatten_catalog(&input.catalog, &config.strip_chars);
    let (mapping, conflicts) = resolve(&entries, &config.tie_break);
    let records = attach(&input.demand, &mapping, &config.strip_chars);
    let aggregates = aggregate(&records, &config.regions);
    let kpis = input
        .sales
        .as_ref()
        .map(|sales| kpi::build_report(&aggregates, sales));

    let summary = compute_summary(
        &records,
        &input.rejects,
        entries.len(),
        mapping.len(),
        &conflicts,
        &aggregates,
        &config.regions,
    );

    Ok(PipelineResult {
        meta: PipelineMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            catalog_sha256: input.catalog_sha256.clone(),
            demand_sha256: input.demand_sha256.clone(),
            sales_sha256: input.sales_sha256.clone(),
        },
        summary,
        mapping: mapping.entries.into_values().collect(),
        records,
        aggregates,
        conflicts,
        rejects: input.rejects.clone(),
        kpis,
    })
}

fn sha256_hex(data: &str) -> String {
    format!("{:x}", Sha256::digest(data.as_bytes()))
}

fn header_index<'a>(
    headers: &'a [String],
    input: &'a str,
) -> impl Fn(&str) -> Result<usize, PipelineError> + 'a {
    move |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                input: input.into(),
                column: name.into(),
            })
    }
}

fn read_headers(
    reader: &mut csv::Reader<&[u8]>,
    input: &str,
) -> Result<Vec<String>, PipelineError> {
    Ok(reader
        .headers()
        .map_err(|e| PipelineError::Csv { input: input.into(), message: e.to_string() })?
        .iter()
        .map(|h| h.to_string())
        .collect())
}

/// Load the wide equivalence catalog, keeping cells in configured brand order.
pub fn load_catalog_rows(
    csv_data: &str,
    config: &CatalogConfig,
) -> Result<Vec<CatalogRow>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = read_headers(&mut reader, "catalog")?;
    let idx = header_index(&headers, "catalog");

    let sku_idx = idx(&config.sku_column)?;
    let mut brand_idx = Vec::with_capacity(config.brands.len());
    for brand in &config.brands {
        brand_idx.push((brand.label.clone(), idx(&brand.column)?));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| PipelineError::Csv { input: "catalog".into(), message: e.to_string() })?;

        let cells = brand_idx
            .iter()
            .map(|(label, i)| (label.clone(), record.get(*i).unwrap_or("").to_string()))
            .collect();

        rows.push(CatalogRow {
            sku: record.get(sku_idx).unwrap_or("").to_string(),
            cells,
        });
    }

    Ok(rows)
}

/// Load raw demand rows. Rows missing a part number, quantity, or region are
/// returned as rejects alongside the accepted rows, never silently dropped.
pub fn load_demand_rows(
    csv_data: &str,
    config: &DemandConfig,
) -> Result<(Vec<DemandRow>, Vec<RejectedRow>), PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = read_headers(&mut reader, "demand")?;
    let idx = header_index(&headers, "demand");

    let col = &config.columns;
    let record_id_idx = idx(&col.record_id)?;
    let brand_idx = idx(&col.brand)?;
    let part_number_idx = idx(&col.part_number)?;
    let quantity_idx = idx(&col.quantity)?;
    let region_idx = idx(&col.region)?;
    let period_idx = idx(&col.period)?;

    let mut rows = Vec::new();
    let mut rejects = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| PipelineError::Csv { input: "demand".into(), message: e.to_string() })?;

        let row = i + 1;
        let record_id = record.get(record_id_idx).unwrap_or("").to_string();

        let part_number = record.get(part_number_idx).unwrap_or("").trim();
        if part_number.is_empty() {
            rejects.push(RejectedRow { row, record_id, reason: "missing part number".into() });
            continue;
        }

        let region = record.get(region_idx).unwrap_or("").trim();
        if region.is_empty() {
            rejects.push(RejectedRow { row, record_id, reason: "missing region".into() });
            continue;
        }

        let quantity_str = record.get(quantity_idx).unwrap_or("").trim();
        if quantity_str.is_empty() {
            rejects.push(RejectedRow { row, record_id, reason: "missing quantity".into() });
            continue;
        }
        let quantity: i64 = match quantity_str.parse() {
            Ok(q) => q,
            Err(_) => {
                rejects.push(RejectedRow {
                    row,
                    record_id,
                    reason: format!("cannot parse quantity '{quantity_str}'"),
                });
                continue;
            }
        };

        rows.push(DemandRow {
            record_id,
            brand: record.get(brand_idx).unwrap_or("").to_string(),
            part_number: part_number.to_string(),
            quantity,
            region: region.to_string(),
            period: record.get(period_idx).unwrap_or("").to_string(),
        });
    }

    Ok((rows, rejects))
}

/// Load the externally supplied sales relation, keyed by (SKU, region).
pub fn load_sales_rows(
    csv_data: &str,
    config: &SalesConfig,
) -> Result<Vec<SalesRow>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = read_headers(&mut reader, "sales")?;
    let idx = header_index(&headers, "sales");

    let col = &config.columns;
    let sku_idx = idx(&col.sku)?;
    let region_idx = idx(&col.region)?;
    let quantity_idx = idx(&col.quantity)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| PipelineError::Csv { input: "sales".into(), message: e.to_string() })?;

        let sku = record.get(sku_idx).unwrap_or("").trim();
        if sku.is_empty() {
            continue;
        }

        let quantity_str = record.get(quantity_idx).unwrap_or("").trim();
        let quantity: i64 = quantity_str.parse().map_err(|_| PipelineError::QuantityParse {
            input: "sales".into(),
            record_id: sku.to_string(),
            value: quantity_str.to_string(),
        })?;

        rows.push(SalesRow {
            sku: sku.to_string(),
            region: record.get(region_idx).unwrap_or("").to_string(),
            quantity,
        });
    }

    Ok(rows)
}

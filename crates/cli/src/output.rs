//! Output relations.
//!
//! Every file is fully built in memory, written to a temporary file in the
//! destination directory, then renamed into place. Readers never observe a
//! half-written relation, and a failed run publishes nothing.

use std::fs;
use std::io;
use std::path::Path;

use partsbench_engine::model::PipelineResult;

/// Write the five output relations into `dir`, creating it if needed.
pub fn write_relations(
    dir: &Path,
    regions: &[String],
    result: &PipelineResult,
) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {e}", dir.display()))?;

    let files = [
        ("mapping.csv", mapping_csv(result)?),
        ("demand.csv", demand_csv(result)?),
        ("aggregates.csv", aggregates_csv(regions, result)?),
        ("conflicts.csv", conflicts_csv(result)?),
        ("rejects.csv", rejects_csv(result)?),
    ];

    for (name, bytes) in files {
        let path = dir.join(name);
        write_atomic(&path, &bytes)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    }

    Ok(())
}

/// Write via a temp file in the same directory + rename, so the target is
/// replaced in one step.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("relation");
    let tmp = dir.join(format!(".{file_name}.tmp"));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, String> {
    writer
        .into_inner()
        .map_err(|e| format!("csv write error: {e}"))
}

fn csv_err(e: csv::Error) -> String {
    format!("csv write error: {e}")
}

fn mapping_csv(result: &PipelineResult) -> Result<Vec<u8>, String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["canonical_key", "brand", "sku"]).map_err(csv_err)?;
    for entry in &result.mapping {
        w.write_record([entry.key.as_str(), entry.brand.as_str(), entry.sku.as_str()])
            .map_err(csv_err)?;
    }
    finish(w)
}

fn demand_csv(result: &PipelineResult) -> Result<Vec<u8>, String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "record_id",
        "brand",
        "part_number",
        "canonical_key",
        "matched_brand",
        "sku",
        "quantity",
        "region",
        "period",
    ])
    .map_err(csv_err)?;

    for record in &result.records {
        w.write_record([
            record.record_id.as_str(),
            record.brand.as_str(),
            record.part_number.as_str(),
            record.key.as_str(),
            record.matched_brand.as_deref().unwrap_or(""),
            record.sku.as_deref().unwrap_or(""),
            &record.quantity.to_string(),
            record.region.as_str(),
            record.period.as_str(),
        ])
        .map_err(csv_err)?;
    }
    finish(w)
}

fn aggregates_csv(regions: &[String], result: &PipelineResult) -> Result<Vec<u8>, String> {
    let mut w = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["sku".to_string()];
    header.extend(regions.iter().cloned());
    header.push("total".into());
    header.push("rank".into());
    w.write_record(&header).map_err(csv_err)?;

    for agg in &result.aggregates {
        let mut row = vec![agg.sku.clone()];
        for region in regions {
            // Absent subtotal stays an empty cell: "no reported demand",
            // not zero.
            row.push(
                agg.region_totals
                    .get(region)
                    .map(|q| q.to_string())
                    .unwrap_or_default(),
            );
        }
        row.push(agg.total.to_string());
        row.push(agg.rank.to_string());
        w.write_record(&row).map_err(csv_err)?;
    }
    finish(w)
}

fn conflicts_csv(result: &PipelineResult) -> Result<Vec<u8>, String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["canonical_key", "brand", "sku", "chosen"]).map_err(csv_err)?;
    for conflict in &result.conflicts {
        for candidate in &conflict.candidates {
            let chosen = candidate.brand == conflict.winner.brand
                && candidate.sku == conflict.winner.sku;
            w.write_record([
                conflict.key.as_str(),
                candidate.brand.as_str(),
                candidate.sku.as_str(),
                if chosen { "true" } else { "false" },
            ])
            .map_err(csv_err)?;
        }
    }
    finish(w)
}

fn rejects_csv(result: &PipelineResult) -> Result<Vec<u8>, String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["row", "record_id", "reason"]).map_err(csv_err)?;
    for reject in &result.rejects {
        w.write_record([
            reject.row.to_string().as_str(),
            reject.record_id.as_str(),
            reject.reason.as_str(),
        ])
        .map_err(csv_err)?;
    }
    finish(w)
}

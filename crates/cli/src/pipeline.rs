//! `pbench run` / `pbench validate` — config-driven pipeline execution.

use std::path::{Path, PathBuf};

use partsbench_engine::engine::PipelineInput;
use partsbench_engine::{run, PipelineConfig};

use crate::exit_codes::{
    EXIT_PIPELINE_CONFLICTS, EXIT_PIPELINE_DIRTY, EXIT_PIPELINE_INVALID_CONFIG,
    EXIT_PIPELINE_RUNTIME,
};
use crate::output;
use crate::CliError;

fn pipeline_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| pipeline_err(EXIT_PIPELINE_RUNTIME, format!("cannot read config: {e}")))?;

    let config = PipelineConfig::from_toml(&config_str)
        .map_err(|e| pipeline_err(EXIT_PIPELINE_INVALID_CONFIG, e.to_string()))?;

    // Input paths are relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let read_input = |file: &str| {
        let path = base_dir.join(file);
        std::fs::read_to_string(&path).map_err(|e| {
            pipeline_err(EXIT_PIPELINE_RUNTIME, format!("cannot read {}: {e}", path.display()))
        })
    };

    let catalog_csv = read_input(&config.catalog.file)?;
    let demand_csv = read_input(&config.demand.file)?;
    let sales_csv = match &config.sales {
        Some(sales) => Some(read_input(&sales.file)?),
        None => None,
    };

    let input = PipelineInput::load(&config, &catalog_csv, &demand_csv, sales_csv.as_deref())
        .map_err(|e| pipeline_err(EXIT_PIPELINE_RUNTIME, e.to_string()))?;

    let result = run(&config, &input)
        .map_err(|e| pipeline_err(EXIT_PIPELINE_RUNTIME, e.to_string()))?;

    // Output relations: --output-dir overrides [output] dir.
    let dir = output_dir.or_else(|| config.output.dir.as_ref().map(PathBuf::from));
    if let Some(ref dir) = dir {
        output::write_relations(dir, &config.regions, &result)
            .map_err(|e| pipeline_err(EXIT_PIPELINE_RUNTIME, e))?;
        eprintln!("wrote {}", dir.display());
    }

    let json_str = serde_json::to_string_pretty(&result).map_err(|e| {
        pipeline_err(EXIT_PIPELINE_RUNTIME, format!("JSON serialization error: {e}"))
    })?;

    if let Some(ref path) = config.output.json {
        let path = base_dir.join(path);
        output::write_atomic(&path, json_str.as_bytes()).map_err(|e| {
            pipeline_err(EXIT_PIPELINE_RUNTIME, format!("cannot write {}: {e}", path.display()))
        })?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "'{}': {} demand rows — {} resolved, {} unresolved, {} rejected; {} SKUs ranked, {} ambiguous keys",
        result.meta.config_name,
        s.input_rows,
        s.resolved_records,
        s.unresolved_records,
        s.rejected_rows,
        s.distinct_skus,
        s.ambiguous_keys,
    );

    if s.ambiguous_keys > 0 && config.fail_on_conflicts {
        return Err(pipeline_err(
            EXIT_PIPELINE_CONFLICTS,
            "ambiguous keys found (fail_on_conflicts)",
        ));
    }

    if s.ambiguous_keys > 0 {
        return Err(pipeline_err(EXIT_PIPELINE_DIRTY, "ambiguous keys found"));
    }
    if s.unresolved_records > 0 {
        return Err(pipeline_err(EXIT_PIPELINE_DIRTY, "unresolved demand present"));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| pipeline_err(EXIT_PIPELINE_RUNTIME, format!("cannot read config: {e}")))?;

    match PipelineConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' with {} brand column(s), {} region(s), sales {}",
                config.name,
                config.catalog.brands.len(),
                config.regions.len(),
                if config.sales.is_some() { "configured" } else { "absent" },
            );
            Ok(())
        }
        Err(e) => Err(pipeline_err(EXIT_PIPELINE_INVALID_CONFIG, e.to_string())),
    }
}

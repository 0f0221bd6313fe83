// partsbench CLI - batch demand benchmarking pipeline

mod exit_codes;
mod output;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "pbench")]
#[command(about = "Aftermarket parts demand benchmarking (cross-reference resolution, regional rollups)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline from a TOML config file
    #[command(after_help = "\
Examples:
  pbench run benchmark.toml
  pbench run benchmark.toml --json
  pbench run benchmark.toml --output-dir out/")]
    Run {
        /// Path to the pipeline config file
        config: PathBuf,

        /// Output the full result JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,

        /// Write the output relations (CSV) into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate a pipeline config without running
    #[command(after_help = "\
Examples:
  pbench validate benchmark.toml")]
    Validate {
        /// Path to the pipeline config file
        config: PathBuf,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output_dir } => pipeline::cmd_run(config, json, output_dir),
        Commands::Validate { config } => pipeline::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// planogrid CLI - headless feed arrangement

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use planogrid_engine::model::FeedInput;
use planogrid_engine::LayoutConfig;
use planogrid_io::export::write_ordered_csv;
use planogrid_io::feed::{load_catalog, load_inventory};

pub const EXIT_INVALID_CONFIG: u8 = 2;
pub const EXIT_IO_ERROR: u8 = 3;

struct CliError {
    code: u8,
    message: String,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into() }
}

#[derive(Parser)]
#[command(name = "pgrid")]
#[command(about = "Feed synchronization and grid arrangement (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Arrange two feeds into a publish-ready ordering
    #[command(after_help = "\
Examples:
  pgrid arrange catalog.xml inventory.csv
  pgrid arrange catalog.xml inventory.csv -c layout.toml --json | jq .summary
  pgrid arrange catalog.xml inventory.csv -c layout.toml --export orden.csv")]
    Arrange {
        /// Catalog/media feed (XML)
        catalog: PathBuf,

        /// Inventory/metrics feed (CSV)
        inventory: PathBuf,

        /// Layout config (TOML); engine defaults apply when omitted
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,

        /// Write JSON result to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Re-serialize the inventory feed in arranged order
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Validate a layout config without running
    #[command(after_help = "\
Examples:
  pgrid validate layout.toml")]
    Validate {
        /// Path to the layout TOML config
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Arrange { catalog, inventory, config, json, output, export } => {
            cmd_arrange(catalog, inventory, config, json, output, export)
        }
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::from(e.code)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<LayoutConfig, CliError> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| cli_err(EXIT_IO_ERROR, format!("cannot read config: {e}")))?;
    LayoutConfig::from_toml(&config_str).map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))
}

fn cmd_arrange(
    catalog_path: PathBuf,
    inventory_path: PathBuf,
    config_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    export_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref())?;

    let catalog = load_catalog(&catalog_path).map_err(|e| {
        cli_err(EXIT_IO_ERROR, format!("cannot read {}: {e}", catalog_path.display()))
    })?;
    let feed = load_inventory(&inventory_path).map_err(|e| {
        cli_err(EXIT_IO_ERROR, format!("cannot read {}: {e}", inventory_path.display()))
    })?;

    let input = FeedInput { catalog, inventory: feed.rows.clone() };
    let result = planogrid_engine::run(&config, &input);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| cli_err(EXIT_IO_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| cli_err(EXIT_IO_ERROR, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = export_file {
        write_ordered_csv(path, &feed, &result.ordering)
            .map_err(|e| cli_err(EXIT_IO_ERROR, format!("cannot write export: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "arranged {} variants — {} eligible, {} deprioritized, {} invalid, {} excluded",
        s.total, s.eligible, s.deprioritized, s.invalid, s.excluded,
    );

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_IO_ERROR, format!("cannot read config: {e}")))?;

    match LayoutConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: layout '{}' with {} row rule(s), {} excluded type(s)",
                config.name,
                config.rows.len(),
                config.exclusions.garment_types.len(),
            );
            Ok(())
        }
        Err(e) => Err(cli_err(EXIT_INVALID_CONFIG, e.to_string())),
    }
}

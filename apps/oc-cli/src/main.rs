use clap::{Parser, Subcommand, ValueEnum};
use oc_engine::service::{self, ParameterSource};
use oc_engine::{EngineError, EngineReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oc-cli")]
#[command(about = "Otto cycle engine model - combustion balance and cycle performance", long_about = None)]
struct Cli {
    /// Log memoized quantities as they are computed
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an engine and print the full report
    Run {
        /// Path to the parameter file (.yaml, .yml or .json)
        config: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Check a parameter file without evaluating it
    Validate {
        /// Path to the parameter file (.yaml, .yml or .json)
        config: PathBuf,
    },
    /// Print the balanced combustion equation
    Balance {
        /// Path to the parameter file (.yaml, .yml or .json)
        config: PathBuf,
    },
    /// Evaluate an engine with parameters from environment variables (n, z, x, rv, T1, ...)
    Env {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { config, format } => cmd_run(ParameterSource::File(&config), format),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Balance { config } => cmd_balance(&config),
        Commands::Env { format } => cmd_run(ParameterSource::Environment, format),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_run(source: ParameterSource<'_>, format: Format) -> CliResult<()> {
    let report = service::evaluate(source)?;
    tracing::info!(
        thermal_efficiency = report.metrics.thermal_efficiency,
        "engine evaluated"
    );
    print_report(&report, format)
}

fn print_report(report: &EngineReport, format: Format) -> CliResult<()> {
    match format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(report)?),
    }
    Ok(())
}

fn cmd_validate(config: &Path) -> CliResult<()> {
    println!("Validating parameters: {}", config.display());
    let params = service::load_parameters(ParameterSource::File(config))?;
    println!("✓ Parameters are valid");
    println!(
        "  {} cylinders, {} rpm, rv = {}",
        params.cylinders, params.engine_speed_rpm, params.compression_ratio
    );
    Ok(())
}

fn cmd_balance(config: &Path) -> CliResult<()> {
    let model = service::build_model(ParameterSource::File(config))?;
    let params = model.parameters();
    let c = model.coefficients()?;
    println!(
        "({} C8H18 + {} C2H6O) + {:.4} (O2 + {} N2) = {:.4} CO2 + {:.4} H2O + {:.4} N2",
        params.octane_ratio,
        params.anhydrous_ratio,
        c.air,
        params.nitrogen_oxygen_ratio,
        c.carbon_dioxide,
        c.water,
        c.nitrogen
    );
    Ok(())
}

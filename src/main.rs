mod analysis;
mod report;
mod settings;

use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use analysis::{evaluate_point, PointArgs};
use report::{render_materials, render_point, render_run};
use settings::{load_catalog, RunArgs};

/// Differential stress envelopes and effective viscosity of lithospheric rocks
#[derive(Parser)]
#[command(name = "rheox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rock rheology along depth/temperature profiles", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a sample table and write a rheology table
    Run(RunArgs),
    /// Evaluate every law at a single depth and temperature
    Point(PointArgs),
    /// List the available materials
    Materials(MaterialsArgs),
}

/// Arguments of the `materials` subcommand.
#[derive(Args)]
struct MaterialsArgs {
    /// Print the full records as JSON
    #[arg(long)]
    json: bool,
    /// JSON file of extra materials
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Map a `--log-level` value to a tracing level; unknown names mean info.
fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Install the log subscriber first so catalog and table loading are traced.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => {
            // Defaults, then the JSON file, then the command-line flags.
            let config = args.resolve()?;

            // The header records the local date of the run. Catalog loading,
            // evaluation and writing all happen inside the library call.
            let summary = rheox::run(&config, Local::now().date_naive())?;
            println!("{}", render_run(&summary)?);
        }
        Commands::Point(args) => {
            let catalog = load_catalog(args.catalog.as_deref())?;

            // Evaluate each law on its own as well as the governing envelope,
            // then print them side by side in MPa.
            let summary = evaluate_point(&catalog, &args)?;
            print!("{}", render_point(&summary)?);
        }
        Commands::Materials(args) => {
            let catalog = load_catalog(args.catalog.as_deref())?;
            info!(materials = catalog.len(), "catalog loaded");

            // Full records for machines, one summary line per rock for people.
            if args.json {
                let records: Vec<_> = catalog.iter().collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", render_materials(&catalog)?);
            }
        }
    }

    Ok(())
}

//! cellbench command-line front end
//!
//! Prints CSV (cell tables, curves) or insights to stdout; logs go to stderr.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cellbench::cell::{CellRecord, CellType};
use cellbench::config::BenchConfig;
use cellbench::curve::{charge_profile, discharge_profile};
use cellbench::dashboard::Dashboard;
use cellbench::generator::{defaults_for, TestMode};

#[derive(Parser, Debug)]
#[command(name = "cellbench", version, about = "Battery cell test bench", long_about = None)]
struct Cli {
    /// JSON bench configuration (absent fields keep their defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a bank of cells and print it as CSV
    Generate {
        /// Number of cell slots
        #[arg(long, default_value_t = 8)]
        cells: usize,

        /// Chemistry of every slot (LFP or NMC)
        #[arg(long, default_value = "NMC")]
        cell_type: CellType,

        /// Overwrite the randomized values with a test-mode preset
        #[arg(long)]
        preset: Option<TestMode>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate one cell's voltage curve and print it as CSV
    Curve {
        /// Charge or discharge
        #[arg(long, value_enum, default_value_t = Direction::Charge)]
        direction: Direction,

        /// Chemistry of the simulated cell (LFP or NMC)
        #[arg(long, default_value = "NMC")]
        cell_type: CellType,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a bank of cells and print its insights
    Summary {
        /// Number of cell slots
        #[arg(long, default_value_t = 8)]
        cells: usize,

        /// Chemistry of every slot (LFP or NMC)
        #[arg(long, default_value = "NMC")]
        cell_type: CellType,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    Charge,
    Discharge,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "cellbench=debug"
    } else {
        "cellbench=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Generate {
            cells,
            cell_type,
            preset,
            seed,
        } => {
            let mut dashboard = open_dashboard(config, cells, cell_type, seed)?;
            if let Some(mode) = preset {
                dashboard.apply_preset(mode);
            }
            let csv = dashboard.export_csv().context("cannot export cells")?;
            print!("{csv}");
        }
        Command::Curve {
            direction,
            cell_type,
            seed,
        } => {
            let mut rng = rng_from(seed);
            let cell = CellRecord::from_defaults(1, &defaults_for(cell_type, &mut rng));
            debug!(?cell, "simulating cell");
            let curve = match direction {
                Direction::Charge => charge_profile(&cell, &mut rng),
                Direction::Discharge => discharge_profile(&cell, &mut rng),
            }
            .context("curve simulation failed")?;
            curve
                .write_csv(io::stdout().lock())
                .context("cannot write curve")?;
        }
        Command::Summary {
            cells,
            cell_type,
            seed,
        } => {
            let dashboard = open_dashboard(config, cells, cell_type, seed)?;
            let summary = dashboard.summary().context("cannot summarize cells")?;
            println!("{summary}");
            println!("{}", dashboard.footer());
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<BenchConfig> {
    let Some(path) = path else {
        return Ok(BenchConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config = BenchConfig::from_json_str(&json)
        .with_context(|| format!("invalid config {}", path.display()))?;
    info!(path = %path.display(), "loaded bench config");
    Ok(config)
}

fn open_dashboard(
    mut config: BenchConfig,
    cells: usize,
    cell_type: CellType,
    seed: Option<u64>,
) -> Result<Dashboard> {
    config.default_cell_count = config.check_cell_count(cells)?;
    config.default_cell_type = cell_type;
    Dashboard::with_rng(config, rng_from(seed)).context("cannot open dashboard")
}

fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

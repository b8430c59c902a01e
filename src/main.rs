//! Temperature Visualization Tool
//!
//! Generates the synthetic temperature series and renders it through the
//! static and interactive chart kinds.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

use tempviz::config::{defaults, ConfigTree, Environment, Paths};
use tempviz::data::{generate_and_save_data, load_csv, DEFAULT_SEED};
use tempviz::suite::{jobs_for, run_jobs, showcase_jobs, ChartArgs, ChartJob, JobOutcome};
use tempviz::{ChartArtifact, ChartKind, GroupBy, TemperatureSeries, TimeGranularity};

#[derive(Parser, Debug)]
#[command(name = "tempviz", version, about = "Render simulated temperature data as static and interactive charts")]
struct Cli {
    /// Root directory for data and outputs
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the synthetic series and write it as CSV
    Generate {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Output CSV (defaults to <base-dir>/data/temperature_data.csv)
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Render chart kinds with their defaults and optional overrides
    Render {
        /// Kinds to render, e.g. static-line interactive-heatmap (all when omitted)
        kinds: Vec<ChartKind>,
        /// JSON file mapping kind names to override trees
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// Input CSV (generated with the default seed if absent)
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long, default_value = "month")]
        group_by: GroupBy,
        #[arg(long, default_value = "hour")]
        granularity: TimeGranularity,
        #[arg(long, default_value_t = 2024)]
        year: i32,
        /// Open the rendered static charts in the viewer
        #[arg(long)]
        show: bool,
    },
    /// Print the default configuration of a chart kind as JSON
    Defaults { kind: ChartKind },
    /// Generate the data and render the showcase charts
    Run {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Skip the viewer
        #[arg(long)]
        no_show: bool,
    },
}

fn main() -> Result<()> {
    tempviz::telemetry::init_tracing();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Run {
        seed: DEFAULT_SEED,
        no_show: false,
    });

    match command {
        Command::Defaults { kind } => {
            let json = defaults(kind).to_json()?;
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
        Command::Generate { seed, data } => {
            let env = initialize(&cli.base_dir)?;
            let path = data.unwrap_or(env.paths.data_path);
            let series = generate_and_save_data(&path, seed)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(rows = series.len(), path = %path.display(), seed, "generated temperature data");
            Ok(())
        }
        Command::Render {
            kinds,
            overrides,
            data,
            group_by,
            granularity,
            year,
            show,
        } => {
            let env = initialize(&cli.base_dir)?;
            let series = load_or_generate(data.as_deref().unwrap_or(env.paths.data_path.as_path()))?;
            let overrides = match overrides {
                Some(path) => read_overrides(&path)?,
                None => HashMap::new(),
            };
            let kinds = if kinds.is_empty() { ChartKind::ALL.to_vec() } else { kinds };
            let args = ChartArgs {
                group_by,
                granularity,
                year,
            };
            let jobs = jobs_for(&kinds, &overrides, &env, args, show)?;
            render_and_show(series, jobs)
        }
        Command::Run { seed, no_show } => {
            let env = initialize(&cli.base_dir)?;
            let series = generate_and_save_data(&env.paths.data_path, seed)
                .with_context(|| format!("failed to write {}", env.paths.data_path.display()))?;
            tracing::info!(rows = series.len(), seed, "generated temperature data");
            let jobs = showcase_jobs(&env, !no_show)?;
            render_and_show(series, jobs)
        }
    }
}

fn initialize(base_dir: &Path) -> Result<Environment> {
    Environment::initialize(Paths::under(base_dir))
        .with_context(|| format!("failed to prepare directories under {}", base_dir.display()))
}

fn load_or_generate(path: &Path) -> Result<TemperatureSeries> {
    if path.exists() {
        return load_csv(path).with_context(|| format!("failed to load {}", path.display()));
    }
    tracing::info!(path = %path.display(), "no data file, generating one");
    generate_and_save_data(path, DEFAULT_SEED).with_context(|| format!("failed to write {}", path.display()))
}

fn read_overrides(path: &Path) -> Result<HashMap<ChartKind, ConfigTree>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let by_name: HashMap<String, ConfigTree> =
        serde_json::from_str(&text).with_context(|| format!("{} is not a JSON object of override trees", path.display()))?;
    by_name
        .into_iter()
        .map(|(name, tree)| -> Result<(ChartKind, ConfigTree)> { Ok((name.parse::<ChartKind>()?, tree)) })
        .collect()
}

/// Render on a Tokio runtime, then hand shown charts to the viewer on the main thread.
fn render_and_show(series: TemperatureSeries, jobs: Vec<ChartJob>) -> Result<()> {
    let rt = Runtime::new().context("failed to start the Tokio runtime")?;
    let outcomes = rt.block_on(run_jobs(Arc::new(series), jobs));

    let mut shown: Vec<ChartArtifact> = Vec::new();
    let mut failed = Vec::new();
    for JobOutcome { kind, result } in outcomes {
        match result {
            Ok(artifact) => {
                if let Some(path) = &artifact.path {
                    println!("{:<22} {}", kind.name(), path.display());
                }
                if artifact.show {
                    shown.push(artifact);
                }
            }
            Err(e) => failed.push(format!("{}: {}", kind, e)),
        }
    }

    tempviz::app::launch_viewer(shown)?;

    if !failed.is_empty() {
        bail!("{} chart(s) failed:\n{}", failed.len(), failed.join("\n"));
    }
    Ok(())
}

#![warn(missing_docs)]
//! collbench CLI Library
//!
//! Command line front end: configuration layering, operation filtering,
//! execution with a progress bar and report output.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     collbench_cli::run()
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, build_comparisons, build_report, build_report_meta,
};
pub use planner::{BackendChoice, ExecutionPlan, build_plan};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use collbench_engine::{BackendKind, Dataset, Operation};
use collbench_report::{OutputFormat, Report, render, render_bar_chart};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// collbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "collbench")]
#[command(author, version, about = "collbench - local vs dataflow collection benchmarks")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the default run
    #[command(flatten)]
    pub run: RunArgs,

    /// Config file (default: discover collbench.toml upwards)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List operations and backends
    List {
        /// Filter operations by regex pattern
        #[arg(default_value = ".*")]
        filter: String,
    },
    /// Time operations (default)
    Run(RunArgs),
    /// Write a default collbench.toml
    Init {
        /// Destination file
        #[arg(default_value = CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Options of a run. Unset values fall back to collbench.toml, then defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Filter operations by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Skip operations matching this regex pattern
    #[arg(long)]
    pub skip: Option<String>,

    /// Backends to time
    #[arg(long, value_enum, default_value_t = BackendChoice::Both)]
    pub backend: BackendChoice,

    /// Calls per timed batch
    #[arg(long, short = 'r')]
    pub repeat: Option<u32>,

    /// Independent batches per operation
    #[arg(long, short = 'b')]
    pub batches: Option<u32>,

    /// Matrix rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Matrix columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// Distinct keys for by-key operations
    #[arg(long)]
    pub keys: Option<usize>,

    /// Dataset seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dataflow partitions
    #[arg(long, short = 'p')]
    pub partitions: Option<usize>,

    /// Dataflow worker threads (0 = all cores)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Percent difference under which backends count as equal
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Output format: human, json, markdown, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the report under the configured output directory
    #[arg(long)]
    pub save: bool,

    /// Record failed operations and continue
    #[arg(long)]
    pub keep_going: bool,

    /// Omit the bar chart from human output
    #[arg(long)]
    pub no_chart: bool,
}

/// Run the collbench CLI with process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the collbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::List { ref filter }) => list_operations(filter),
        Some(Commands::Init { ref path, force }) => init_config(path, force),
        Some(Commands::Run(ref args)) => {
            let config = load_config(cli.config.as_deref())?;
            run_benchmarks(args, &config)
        }
        None => {
            let config = load_config(cli.config.as_deref())?;
            run_benchmarks(&cli.run, &config)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "collbench=debug"
    } else {
        "collbench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit config path, else discovered collbench.toml, else defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<CollbenchConfig> {
    match path {
        Some(path) => CollbenchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(match CollbenchConfig::discover() {
            Some((path, config)) => {
                tracing::debug!(path = %path.display(), "using config");
                config
            }
            None => CollbenchConfig::default(),
        }),
    }
}

fn list_operations(filter: &str) -> anyhow::Result<()> {
    let re = Regex::new(filter).with_context(|| format!("invalid filter '{filter}'"))?;
    let plan = build_plan(Operation::ALL, Some(&re), None, BackendChoice::Both);

    println!("collbench plan:");
    println!(
        "├── backends: {}",
        plan.backends
            .iter()
            .map(BackendKind::name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("├── operations:");
    for op in &plan.operations {
        println!("│   ├── {}", op);
    }
    println!("{} operations found.", plan.operations.len());
    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(path, CollbenchConfig::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Config written to: {}", path.display());
    Ok(())
}

/// Build an ExecutionConfig by layering: collbench.toml values → CLI overrides.
pub fn build_execution_config(
    args: &RunArgs,
    config: &CollbenchConfig,
) -> anyhow::Result<ExecutionConfig> {
    let mut runner = config.runner.clone();
    if let Some(repeat) = args.repeat {
        runner.repeat = repeat;
    }
    if let Some(batches) = args.batches {
        runner.batches = batches;
    }
    let harness = runner.harness_config()?;

    let mut dataset = config.dataset;
    dataset.rows = args.rows.unwrap_or(dataset.rows);
    dataset.cols = args.cols.unwrap_or(dataset.cols);
    dataset.keys = args.keys.unwrap_or(dataset.keys);
    dataset.seed = args.seed.unwrap_or(dataset.seed);
    dataset.validate()?;

    let tolerance_pct = args.tolerance.unwrap_or(runner.tolerance_pct);
    anyhow::ensure!(
        tolerance_pct.is_finite() && tolerance_pct >= 0.0,
        "tolerance must be a finite non-negative percentage, got {tolerance_pct}"
    );

    let mut dataflow = config.dataflow;
    dataflow.partitions = args.partitions.unwrap_or(dataflow.partitions);
    dataflow.threads = args.threads.unwrap_or(dataflow.threads);

    Ok(ExecutionConfig {
        harness,
        dataset,
        dataflow,
        keep_going: args.keep_going || runner.keep_going,
        pin_cpu: runner.pin_cpu,
        tolerance_pct,
        progress: true,
    })
}

fn run_benchmarks(args: &RunArgs, config: &CollbenchConfig) -> anyhow::Result<()> {
    let format: OutputFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    let filter_re =
        Regex::new(&args.filter).with_context(|| format!("invalid filter '{}'", args.filter))?;
    let skip_re = args
        .skip
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --skip pattern")?;

    let plan = build_plan(
        Operation::ALL,
        Some(&filter_re),
        skip_re.as_ref(),
        args.backend,
    );
    if plan.is_empty() {
        println!("No operations match '{}'.", args.filter);
        return Ok(());
    }

    let exec_config = build_execution_config(args, config)?;
    let executor = Executor::new(exec_config.clone())?;

    eprintln!(
        "Timing {} operation(s) on {}, best of {} x {} calls ({} calls each)...\n",
        plan.operations.len(),
        plan.backends
            .iter()
            .map(BackendKind::name)
            .collect::<Vec<_>>()
            .join(" and "),
        exec_config.harness.batches,
        exec_config.harness.repeat,
        exec_config.harness.total_calls()
    );

    let start_time = Instant::now();
    let dataset = Dataset::generate(&exec_config.dataset)?;
    let results = executor.execute(&dataset, &plan)?;
    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    let report = build_report(results, &exec_config, total_duration_ms)?;

    let mut output = render(&report, format)?;
    if format == OutputFormat::Human && config.output.chart && !args.no_chart {
        output.push('\n');
        output.push_str(&render_bar_chart(&report, config.output.chart_width));
    }

    if let Some(ref path) = args.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if args.save {
        save_report(&report, format, &config.output.directory)?;
    }

    if report.summary.failed > 0 {
        eprintln!("\n{} operation(s) failed", report.summary.failed);
        std::process::exit(1);
    }

    Ok(())
}

/// Write the report to `<directory>/report.<ext>`, returning the path.
fn save_report(report: &Report, format: OutputFormat, directory: &str) -> anyhow::Result<PathBuf> {
    let dir = PathBuf::from(directory);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(format!("report.{}", format.extension()));
    std::fs::write(&path, render(report, format)?)?;
    eprintln!("Report saved to: {}", path.display());
    Ok(path)
}

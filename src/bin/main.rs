//! racost CLI - annotate relational-algebra plans with estimated costs
//!
//! Usage:
//!   racost estimate <plan.json> [--stats <file>] [--config <file>] [--format <format>]
//!   racost compare <baseline.json> <candidate.json> [--stats <file>] [--config <file>]
//!
//! Examples:
//!   racost estimate plans/orders.json --stats catalog/stats.toml
//!   racost estimate plans/orders.json --format dot | dot -Tpng > plan.png
//!   racost compare plans/naive.json plans/pushed_down.json --stats stats.json

use clap::{Parser, Subcommand, ValueEnum};
use racost::config::Settings;
use racost::metadata::TableStats;
use racost::planner::cost::{compare_plans, visualize_costs, CostEstimator, DEFAULT_TOLERANCE};
use racost::planner::logical::{NodeId, PlanNode, RaTree};
use racost::planner::render::{explain, to_dot};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "racost")]
#[command(about = "racost - Heuristic cost annotation for relational-algebra plans")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the cost of every operator in a plan
    Estimate {
        /// Path to the plan (JSON)
        plan: PathBuf,

        #[command(flatten)]
        inputs: Inputs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare the cumulative cost of two plans for the same query
    Compare {
        /// Path to the baseline plan (JSON)
        baseline: PathBuf,

        /// Path to the candidate plan (JSON)
        candidate: PathBuf,

        #[command(flatten)]
        inputs: Inputs,

        /// Relative difference treated as equal cost
        #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
    },
}

#[derive(clap::Args)]
struct Inputs {
    /// Table statistics file (.toml or .json); overrides the config file
    #[arg(short, long)]
    stats: Option<PathBuf>,

    /// Config file (defaults to RACOST_CONFIG, ./racost.toml, ~/.config/racost/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Indented operator tree with costs
    Text,
    /// Graphviz digraph
    Dot,
    /// Per-node costs as JSON
    Json,
}

/// Configuration and statistics shared by both commands.
struct Context {
    settings: Settings,
    stats: TableStats,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Estimate {
            plan,
            inputs,
            format,
        } => cmd_estimate(&plan, &inputs, format),
        Commands::Compare {
            baseline,
            candidate,
            inputs,
            tolerance,
        } => cmd_compare(&baseline, &candidate, &inputs, tolerance),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_estimate(plan: &Path, inputs: &Inputs, format: OutputFormat) -> Result<(), String> {
    let ctx = load_context(inputs)?;
    let (tree, root) = load_plan(plan)?;

    let model = ctx.settings.cost_model().map_err(|e| e.to_string())?;
    let annotations = CostEstimator::new(&ctx.stats)
        .with_model(model)
        .estimate(&tree, root)
        .map_err(|e| e.to_string())?;
    visualize_costs(&tree, root, &annotations);

    match format {
        OutputFormat::Text => {
            println!("{}", explain(&tree, root, &annotations).map_err(|e| e.to_string())?);
            println!();
            println!("Total cost: {:.2}", annotations.total_cost());
        }
        OutputFormat::Dot => {
            println!("{}", to_dot(&tree, root, &annotations).map_err(|e| e.to_string())?);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&annotations).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_compare(
    baseline: &Path,
    candidate: &Path,
    inputs: &Inputs,
    tolerance: f64,
) -> Result<(), String> {
    let ctx = load_context(inputs)?;
    let model = ctx.settings.cost_model().map_err(|e| e.to_string())?;
    let estimator = CostEstimator::new(&ctx.stats).with_model(model);

    let (baseline_tree, baseline_root) = load_plan(baseline)?;
    let (candidate_tree, candidate_root) = load_plan(candidate)?;

    let baseline_costs = estimator
        .estimate(&baseline_tree, baseline_root)
        .map_err(|e| e.to_string())?;
    let candidate_costs = estimator
        .estimate(&candidate_tree, candidate_root)
        .map_err(|e| e.to_string())?;

    println!("Baseline:  {:.2}", baseline_costs.total_cost());
    println!("Candidate: {:.2}", candidate_costs.total_cost());
    println!(
        "{}",
        compare_plans(&baseline_costs, &candidate_costs, tolerance)
    );

    Ok(())
}

fn load_context(inputs: &Inputs) -> Result<Context, String> {
    let settings = match &inputs.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
    .map_err(|e| e.to_string())?;

    let stats_path = match &inputs.stats {
        Some(path) => Some(path.clone()),
        None => settings.stats_path().map_err(|e| e.to_string())?,
    };

    let stats = match stats_path {
        Some(path) => TableStats::from_file(&path)
            .map_err(|e| format!("{} ({})", e, path.display()))?,
        None => TableStats::new(),
    };

    Ok(Context { settings, stats })
}

fn load_plan(path: &Path) -> Result<(RaTree, NodeId), String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    let plan: PlanNode = serde_json::from_str(&source)
        .map_err(|e| format!("Invalid plan in '{}': {}", path.display(), e))?;
    Ok(RaTree::from_plan(&plan))
}

use clap::{Parser, Subcommand, ValueEnum};
use lci_app::{
    AppError, AppResult, ExpandReport, FlowRow, NodeQuery, TargetOutcome, apply_plan,
    collect_node, expand_node, load_project, run_plan, save_project, summarize_project,
    validate_project,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lci")]
#[command(about = "Flatten multi-tier life-cycle inventory subgraphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(clap::Args)]
struct QueryArgs {
    /// Path to the project file (.yaml, .yml or .json)
    project_path: PathBuf,
    /// Namespace of the process to start from
    namespace: String,
    /// Name of the process to start from
    name: String,
    /// Deepest tier to walk (0 = direct edges only)
    #[arg(long, default_value_t = 1)]
    tier_limit: u32,
    /// Process name to descend into (repeatable)
    #[arg(long = "allow")]
    allow: Vec<String>,
    /// Multiplier applied to every amount
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

impl QueryArgs {
    fn query(&self) -> NodeQuery {
        NodeQuery::new(self.namespace.clone(), self.name.clone(), self.tier_limit)
            .with_allow(self.allow.iter().cloned())
            .with_scale(self.scale)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Show node, edge and plan counts
    Summary {
        /// Path to the project file
        project_path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Aggregate the intermediate flows below a process
    Expand(QueryArgs),
    /// Gather the elementary flows of a process and its allow-listed suppliers
    Collect(QueryArgs),
    /// Run the project's flattening plan
    Run {
        /// Path to the project file
        project_path: PathBuf,
        /// Write the rewritten project here (dry run when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format for the per-target report
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Summary {
            project_path,
            format,
        } => cmd_summary(&project_path, format),
        Commands::Expand(args) => cmd_expand(&args),
        Commands::Collect(args) => cmd_collect(&args),
        Commands::Run {
            project_path,
            output,
            format,
        } => cmd_run(&project_path, output.as_deref(), format),
    }
}

/// Print `value` as JSON or YAML. Returns false for `Format::Text`.
fn emit<T: Serialize>(value: &T, format: Format) -> AppResult<bool> {
    let text = match format {
        Format::Text => return Ok(false),
        Format::Json => serde_json::to_string_pretty(value)
            .map_err(|e| AppError::InvalidInput(format!("Failed to encode JSON: {}", e)))?,
        Format::Yaml => serde_yaml::to_string(value)
            .map_err(|e| AppError::InvalidInput(format!("Failed to encode YAML: {}", e)))?,
    };
    println!("{}", text.trim_end());
    Ok(true)
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = load_project(project_path)?;
    validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_summary(project_path: &Path, format: Format) -> AppResult<()> {
    let project = load_project(project_path)?;
    let summary = summarize_project(&project);
    if emit(&summary, format)? {
        return Ok(());
    }

    println!("{} (version {})", summary.name, summary.version);
    println!(
        "  {} processes, {} elementary flows",
        summary.process_count, summary.flow_count
    );
    println!(
        "  edges: {} intermediate, {} elementary, {} reference",
        summary.intermediate_edges, summary.elementary_edges, summary.reference_edges
    );
    println!("  namespaces: {}", summary.namespaces.join(", "));
    println!(
        "  plan: {} target(s) into '{}'",
        summary.target_count, summary.working_namespace
    );
    Ok(())
}

fn print_rows(rows: &[FlowRow]) {
    if rows.is_empty() {
        println!("  (none)");
    }
    for row in rows {
        let location = row.location.as_deref().unwrap_or("-");
        println!(
            "  {:>14.6e} {:<14} {} [{}] {}/{}",
            row.amount, row.unit, row.name, location, row.namespace, row.code
        );
    }
}

fn cmd_expand(args: &QueryArgs) -> AppResult<()> {
    let project = load_project(&args.project_path)?;
    let report: ExpandReport = expand_node(&project, &args.query())?;
    if emit(&report, args.format)? {
        return Ok(());
    }

    println!("Intermediate flows of '{}':", args.name);
    print_rows(&report.rows);
    if !report.dropped.is_empty() {
        println!("Dropped (not in allowlist):");
        for dropped in &report.dropped {
            println!(
                "  tier {} {:>14.6e} {}",
                dropped.tier, dropped.flow.amount, dropped.flow.name
            );
        }
    }
    Ok(())
}

fn cmd_collect(args: &QueryArgs) -> AppResult<()> {
    let project = load_project(&args.project_path)?;
    let rows = collect_node(&project, &args.query())?;
    if emit(&rows, args.format)? {
        return Ok(());
    }

    println!("Elementary flows of '{}':", args.name);
    print_rows(&rows);
    Ok(())
}

fn print_outcomes(outcomes: &[TargetOutcome]) {
    for outcome in outcomes {
        println!("  {}", outcome.target);
        println!(
            "    copy {}: -{} +{} intermediate, {} dropped",
            outcome.copy_code,
            outcome.removed_intermediate,
            outcome.added_intermediate,
            outcome.dropped
        );
        if let (Some(removed), Some(added)) = (outcome.elementary_removed, outcome.elementary_added)
        {
            println!("    elementary flows replaced: -{} +{}", removed, added);
        }
    }
}

fn cmd_run(project_path: &Path, output: Option<&Path>, format: Format) -> AppResult<()> {
    let mut project = load_project(project_path)?;

    let outcomes = match output {
        Some(path) => {
            let outcomes = apply_plan(&mut project)?;
            save_project(path, &project)?;
            tracing::info!(path = %path.display(), "wrote rewritten project");
            outcomes
        }
        None => run_plan(&project)?.outcomes,
    };

    if emit(&outcomes, format)? {
        return Ok(());
    }
    if outcomes.is_empty() {
        println!("No targets in plan");
        return Ok(());
    }
    match output {
        Some(path) => println!("✓ Flattened {} target(s) into {}", outcomes.len(), path.display()),
        None => println!("Dry run, {} target(s) would be flattened:", outcomes.len()),
    }
    print_outcomes(&outcomes);
    Ok(())
}

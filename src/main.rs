use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use joinplan::config::{CliConfig, PlannerConfig};
use joinplan::dataset_catalog::DatasetCatalog;
use joinplan::join_planner::{encode_path, JoinPlanner};
use joinplan::view_fields::{transform_multi_dataset_fields, FieldsSet};

/// Joinplan - join planning for multi-dataset chart fields
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Planner configuration file (YAML); environment variables otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset assumed for fields that do not name one
    #[arg(long, global = true)]
    default_dataset: Option<String>,

    /// Fail when join clauses cannot be ordered into a connected chain
    #[arg(long, global = true)]
    strict: bool,

    /// Maximum depth of the browse tree
    #[arg(long, global = true)]
    max_browse_depth: Option<u32>,

    /// Maximum number of nodes in the browse tree
    #[arg(long, global = true)]
    max_browse_nodes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the joins for a view and print the rewritten fields
    Plan {
        /// View fields as JSON or YAML
        #[arg(long)]
        view: PathBuf,

        /// Dataset catalog used to route fields without a join path
        #[arg(long, requires = "base")]
        catalog: Option<PathBuf>,

        /// Dataset the routed join paths lead to
        #[arg(long, requires = "catalog")]
        base: Option<String>,
    },

    /// Print the shortest join path between two datasets
    Route {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// List the datasets reachable and unreachable from a dataset
    Reachable {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        from: String,
    },

    /// Print the join tree of datasets browsable from a base dataset
    Tree {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        base: String,
    },
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        CliConfig {
            default_dataset: cli.default_dataset.clone(),
            strict_join_order: cli.strict,
            max_browse_depth: cli.max_browse_depth,
            max_browse_nodes: cli.max_browse_nodes,
        }
    }
}

#[derive(Serialize)]
struct RouteOutput<'a> {
    from: &'a str,
    to: &'a str,
    alias: String,
    path: Vec<joinplan::dataset_graph::JoinPath>,
}

#[derive(Serialize)]
struct ReachableOutput<'a> {
    from: &'a str,
    reachable: Vec<String>,
    unreached: Vec<String>,
}

fn load_config(cli: &Cli) -> Result<PlannerConfig> {
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PlannerConfig::from_env().context("Failed to load config from environment")?,
    };
    Ok(config.with_cli(cli.into())?)
}

fn load_catalog(path: &Path) -> Result<DatasetCatalog> {
    DatasetCatalog::from_yaml_file(path)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))
}

fn load_view(path: &Path) -> Result<FieldsSet> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read view {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let fields = if is_yaml {
        serde_yaml::from_str(&contents).with_context(|| format!("Invalid view YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&contents).with_context(|| format!("Invalid view JSON in {}", path.display()))?
    };
    Ok(fields)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli, config: PlannerConfig) -> Result<()> {
    match cli.command {
        Commands::Plan { view, catalog, base } => {
            let mut fields = load_view(&view)?;
            if let (Some(catalog), Some(base)) = (catalog, base) {
                load_catalog(&catalog)?
                    .resolve_join_paths(&mut fields, &base)
                    .context("Failed to route view fields")?;
            }
            let planner = JoinPlanner::from_config(&config);
            let transformed = transform_multi_dataset_fields(&fields, &planner)?;
            print_json(&transformed)
        }
        Commands::Route { catalog, from, to } => {
            let path = load_catalog(&catalog)?.route(&from, &to)?;
            print_json(&RouteOutput {
                from: &from,
                to: &to,
                alias: encode_path(&path),
                path,
            })
        }
        Commands::Reachable { catalog, from } => {
            let catalog = load_catalog(&catalog)?;
            print_json(&ReachableOutput {
                from: &from,
                reachable: catalog.reachable_datasets(&from)?,
                unreached: catalog.unreached_datasets(&from)?,
            })
        }
        Commands::Tree { catalog, base } => {
            let tree = load_catalog(&catalog)?.browse_tree_within(
                &base,
                config.max_browse_depth,
                config.max_browse_nodes,
            )?;
            print_json(&tree)
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // RUST_LOG takes precedence over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    run(cli, config)
}

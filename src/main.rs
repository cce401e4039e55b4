//! Cloudgraph CLI - load cloud inventory dumps into a resource graph

use anyhow::Context;
use clap::{Parser, Subcommand};
use cloudgraph::config::{self, CloudgraphConfig, ConnectionSettings};
use cloudgraph::router::BatchReport;
use cloudgraph::storage::QueryParams;
use cloudgraph::ui::{self, Icons};
use cloudgraph::Connector;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cloudgraph")]
#[command(version)]
#[command(about = "Load labeled cloud inventory blocks into a resource graph")]
#[command(long_about = r#"
Cloudgraph routes labeled blocks of cloud inventory JSON (users, roles,
buckets, instances, networks, databases...) into a graph store and links
roles to the resources their policies allow.

Example usage:
  cloudgraph import --file Users.json
  cloudgraph import --label Buckets-us-east-1 --file buckets.json
  cloudgraph bulk --file inventory.json
  cloudgraph query --sql "SELECT id FROM nodes WHERE label = :label" --param label=Role
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (defaults to ./cloudgraph.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store URL, overriding config and environment
    #[arg(short, long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Import one labeled block
    Import {
        /// Block label (defaults to the file stem)
        #[arg(short, long)]
        label: Option<String>,

        /// JSON payload file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Import a JSON object mapping labels to blocks
    Bulk {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Recompute role → resource access edges
    Link,

    /// Run a read-only SQL query against the graph
    Query {
        #[arg(short, long)]
        sql: String,

        /// Named parameter as key=value; values are parsed as JSON when possible
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// Remove every node and edge
    Flush {
        /// Confirm the destructive reset
        #[arg(long)]
        yes: bool,
    },

    /// Show node and edge counts
    Stats,
}

fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { force } => run_init(config_path, cli.database, force)?,

        Commands::Import { label, file } => {
            let label = match label {
                Some(label) => label,
                None => file_stem(&file)?,
            };
            let payload = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let (_, mut connector) = connect(config_path, cli.database)?;
            let outcome = connector.import_results(&label, &payload)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&json!({ "label": label, "outcome": outcome }))?);
            } else {
                ui::import_outcome(&label, &outcome);
            }
        }

        Commands::Bulk { file } => {
            let contents = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let Value::Object(batch) = serde_json::from_slice(&contents)? else {
                anyhow::bail!("{} must hold a JSON object keyed by label", file.display());
            };

            if !cli.json {
                ui::header(&format!("Importing {} blocks from {}", batch.len(), file.display()));
            }
            let (_, mut connector) = connect(config_path, cli.database)?;
            let report = connector.import_bulk_results(&batch);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
            } else {
                ui::batch_report(&report);
            }

            if let Some(summary) = report.failure_summary() {
                anyhow::bail!(summary);
            }
        }

        Commands::Link => {
            let (_, mut connector) = connect(config_path, cli.database)?;
            let stats = connector.link_roles_to_resources()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::link_stats(&stats);
            }
        }

        Commands::Query { sql, params } => {
            let params: QueryParams = params.into_iter().collect();
            let (_, connector) = connect(config_path, cli.database)?;
            let rows = connector.query(&sql, &params)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                ui::status(Icons::SEARCH, "Rows", "0");
            } else {
                println!("{}", ui::rows_table(&rows));
                ui::status(Icons::SEARCH, "Rows", &rows.len().to_string());
            }
        }

        Commands::Flush { yes } => {
            if !yes {
                anyhow::bail!("flush removes every node and edge; pass --yes to confirm");
            }
            let (settings, mut connector) = connect(config_path, cli.database)?;
            connector.flush_all()?;
            if cli.json {
                println!("{}", json!({ "flushed": true }));
            } else {
                ui::status(Icons::TRASH, "Flushed", &settings.url);
            }
        }

        Commands::Stats => {
            let (settings, connector) = connect(config_path, cli.database)?;
            let stats = connector.store().stats()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::header(&format!("Graph at {}", settings.url));
                let table = ui::stats_table(&stats);
                if table.is_empty() {
                    ui::status(Icons::STATS, "Nodes", "0");
                } else {
                    println!("{}", table);
                }
                ui::summary_row("Nodes:", &stats.total_nodes().to_string());
                ui::summary_row("Edges:", &stats.total_edges().to_string());
            }
        }
    }

    Ok(())
}

fn connect(config_path: Option<&Path>, database: Option<String>) -> anyhow::Result<(ConnectionSettings, Connector)> {
    let mut settings = ConnectionSettings::load(config_path)?;
    if let Some(url) = database {
        settings.url = url;
    }
    tracing::debug!("Connection settings: {:?}", settings);
    let connector = Connector::connect(&settings)?;
    Ok((settings, connector))
}

fn run_init(path: Option<&Path>, url: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config::default_config_path);
    let config = CloudgraphConfig {
        url: Some(url.unwrap_or_else(|| config::default_database_path().display().to_string())),
        principal: Some(config::DEFAULT_PRINCIPAL.to_string()),
        credential: None,
    };
    config::write_config(&path, &config, force)?;
    ui::success(&format!("Wrote {}", path.display()));
    ui::info("Credential", &format!("set {} in the environment", config::PASSWORD_VAR));
    Ok(())
}

fn file_stem(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .with_context(|| format!("cannot derive a label from {}; pass --label", path.display()))
}

fn report_json(report: &BatchReport) -> Value {
    let entries: Vec<Value> = report
        .entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(outcome) => json!({ "label": entry.label, "outcome": outcome }),
            Err(e) => json!({
                "label": entry.label,
                "category": e.category(),
                "error": e.to_string(),
            }),
        })
        .collect();

    let linking = match &report.linking {
        Some(Ok(stats)) => json!(stats),
        Some(Err(e)) => json!({ "error": e.to_string() }),
        None => Value::Null,
    };

    json!({
        "entries": entries,
        "imported": report.imported(),
        "failed": report.failures().count(),
        "linking": linking,
    })
}

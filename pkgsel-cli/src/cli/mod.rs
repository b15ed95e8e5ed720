//! CLI module organization

pub mod commands;
pub mod explain;
pub mod graph;
pub mod list;
pub mod query;
pub mod settings;

pub use commands::{Cli, Commands, ConfigAction, QueryArgs};
pub use explain::run_explain;
pub use graph::{run_graph, GraphFlags};
pub use list::run_list;
pub use query::SnapshotFlags;
pub use settings::run_config;

use crate::config::ConfigManager;
use anyhow::Result;

/// Load configuration and run the parsed command.
///
/// # Errors
/// Returns whatever the command fails with; the binary prints it and exits
/// with status 1.
pub async fn execute(cli: Cli) -> Result<()> {
    let mut manager = match &cli.config {
        Some(path) => ConfigManager::load_with_path(path)?,
        None => ConfigManager::load()?,
    };
    let snapshots = SnapshotFlags {
        snapshot: cli.snapshot.as_deref(),
        reference: cli.reference.as_deref(),
    };

    match cli.command {
        Commands::List {
            query,
            format,
            noalign,
        } => run_list(&query, &format, noalign, snapshots, manager.config()).await,
        Commands::Graph {
            query,
            graph_type,
            format,
            cluster,
            short,
            nocolor,
            docs,
        } => {
            let flags = GraphFlags {
                graph_type,
                format,
                cluster,
                short,
                nocolor,
                docs,
            };
            run_graph(&query, &flags, snapshots, manager.config()).await
        }
        Commands::Explain { expr, json } => run_explain(&expr, json),
        Commands::Config { action } => run_config(&mut manager, action),
    }
}

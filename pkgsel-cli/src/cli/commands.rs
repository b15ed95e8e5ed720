//! CLI command definitions

use crate::output::GraphType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Select and render subsets of a package graph
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Configuration file (default: <config dir>/pkgsel/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Package snapshot to query (overrides snapshot.path)
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Reference snapshot subtracted from results (overrides snapshot.reference_path)
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Main command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Expression and evaluation flags shared by `list` and `graph`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Expression; separate arguments are joined with spaces
    #[arg(required = true, allow_hyphen_values = true)]
    pub expr: Vec<String>,

    /// Keep packages that also appear in the reference snapshot
    #[arg(long)]
    pub with_reference: bool,

    /// Treat exact paths missing from the snapshot as empty sets
    #[arg(long)]
    pub lenient: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the packages an expression selects
    List {
        /// Expression and evaluation flags
        #[command(flatten)]
        query: QueryArgs,

        /// Line template, e.g. '{{.ID}}\t{{.Module}}'
        #[arg(short, long, default_value = "{{.ID}}")]
        format: String,

        /// Do not align tab-separated columns
        #[arg(long)]
        noalign: bool,
    },

    /// Print the import graph of the packages an expression selects
    Graph {
        /// Expression and evaluation flags
        #[command(flatten)]
        query: QueryArgs,

        /// Output type: dot, digraph, tgf, edges, graphml (default: output.graph_type)
        #[arg(short = 't', long = "type")]
        graph_type: Option<GraphType>,

        /// Node label template
        #[arg(short, long, default_value = "{{.ID}}")]
        format: String,

        /// Group dot nodes into one cluster per module
        #[arg(long)]
        cluster: bool,

        /// Label clustered nodes by their path inside the module
        #[arg(long, requires = "cluster")]
        short: bool,

        /// Disable dot colouring
        #[arg(long)]
        nocolor: bool,

        /// Documentation URL prefix for dot links (default: output.docs_url)
        #[arg(long)]
        docs: Option<String>,
    },

    /// Show how an expression parses, without evaluating it
    Explain {
        /// Expression; separate arguments are joined with spaces
        #[arg(required = true, allow_hyphen_values = true)]
        expr: Vec<String>,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        /// Configuration action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management operations
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show every configuration setting
    List,

    /// Show configuration file location
    Path,
}

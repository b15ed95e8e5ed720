//! `graph`: the import graph of the selected packages

use crate::cli::commands::QueryArgs;
use crate::cli::query::{self, QueryPlan, SnapshotFlags};
use crate::config::CliConfig;
use crate::output::{write_graph, DotOptions, GraphType, LabelTemplate};
use anyhow::{Context, Result};
use pkgsel_core::Subgraph;
use std::io::{self, BufWriter, Write};

/// Flags of the `graph` command.
#[derive(Debug, Clone, Default)]
pub struct GraphFlags {
    /// `--type`, falling back to `output.graph_type`
    pub graph_type: Option<GraphType>,
    /// `--format` label template
    pub format: String,
    /// `--cluster`
    pub cluster: bool,
    /// `--short`, only meaningful with `--cluster`
    pub short: bool,
    /// `--nocolor`
    pub nocolor: bool,
    /// `--docs`, falling back to `output.docs_url`
    pub docs: Option<String>,
}

impl GraphFlags {
    fn dot_options(&self, config: &CliConfig) -> DotOptions {
        DotOptions {
            docs_url: self
                .docs
                .clone()
                .unwrap_or_else(|| config.output.docs_url.clone()),
            clusters: self.cluster,
            nocolor: self.nocolor,
            short: self.cluster && self.short,
        }
    }
}

/// Run `graph`.
///
/// # Errors
/// Fails on an invalid label template, a snapshot that cannot be loaded,
/// a query error, or a write failure.
pub async fn run_graph(
    args: &QueryArgs,
    flags: &GraphFlags,
    snapshots: SnapshotFlags<'_>,
    config: &CliConfig,
) -> Result<()> {
    let label = LabelTemplate::parse(&flags.format).context("invalid label format")?;
    let kind = flags.graph_type.unwrap_or(config.output.graph_type);
    let dot = flags.dot_options(config);
    let plan = QueryPlan::resolve(args, snapshots, config)?;

    let loaded = query::load(&plan).await?;
    let set = query::select(&plan, &loaded)?;
    let graph = Subgraph::from_set(&loaded.universe, &set);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_graph(&mut out, &graph, kind, &label, &dot)?;
    out.flush()?;
    Ok(())
}

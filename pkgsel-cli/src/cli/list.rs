//! `list`: one templated line per selected package

use crate::cli::commands::QueryArgs;
use crate::cli::query::{self, QueryPlan, SnapshotFlags};
use crate::config::CliConfig;
use crate::output::{LabelTemplate, TableBuilder};
use anyhow::{Context, Result};
use pkgsel_core::Subgraph;
use std::io::{self, BufWriter, Write};

/// Run `list`.
///
/// # Errors
/// Fails on an invalid format, a snapshot that cannot be loaded, a query
/// error, or a write failure.
pub async fn run_list(
    args: &QueryArgs,
    format: &str,
    noalign: bool,
    flags: SnapshotFlags<'_>,
    config: &CliConfig,
) -> Result<()> {
    // A literal `\t` in the format is a column separator
    let template = LabelTemplate::parse(&format.replace("\\t", "\t"))
        .context("invalid format string")?;
    let plan = QueryPlan::resolve(args, flags, config)?;

    let loaded = query::load(&plan).await?;
    let set = query::select(&plan, &loaded)?;
    let graph = Subgraph::from_set(&loaded.universe, &set);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_list(&mut out, &graph, &template, config.output.align && !noalign)?;
    out.flush()?;
    Ok(())
}

/// Render every node of `graph`, aligning tab-separated columns when
/// `align` is set.
///
/// # Errors
/// Propagates write failures.
pub fn write_list<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    template: &LabelTemplate,
    align: bool,
) -> io::Result<()> {
    if !align {
        for node in graph.nodes() {
            writeln!(out, "{}", template.render(node.package))?;
        }
        return Ok(());
    }

    let mut table = TableBuilder::new();
    for node in graph.nodes() {
        for line in template.render(node.package).split('\n') {
            table.add_line(line);
        }
    }
    table.render(out)
}

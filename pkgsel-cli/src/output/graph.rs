//! Graph output formats.
//!
//! Every format walks a [`Subgraph`] in its node order, so output is stable
//! for a given snapshot and expression.

use super::dot::{write_dot, DotOptions};
use super::graphml::write_graphml;
use super::template::LabelTemplate;
use anyhow::Result;
use pkgsel_core::Subgraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Supported `graph --type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    /// GraphViz dot
    Dot,
    /// One line per node: label then labels of its imports
    Digraph,
    /// Trivial Graph Format
    Tgf,
    /// One line per edge
    Edges,
    /// GraphML XML
    Graphml,
}

impl GraphType {
    /// Every type, in help order.
    pub const ALL: [Self; 5] = [Self::Dot, Self::Digraph, Self::Tgf, Self::Edges, Self::Graphml];

    /// Name used on the command line and in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Digraph => "digraph",
            Self::Tgf => "tgf",
            Self::Edges => "edges",
            Self::Graphml => "graphml",
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GraphType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| {
                format!("Invalid graph type: {s}. Valid options: dot, digraph, tgf, edges, graphml")
            })
    }
}

/// Write `graph` in the requested format.
///
/// # Errors
/// Propagates write failures.
pub fn write_graph<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    kind: GraphType,
    label: &LabelTemplate,
    dot: &DotOptions,
) -> Result<()> {
    match kind {
        GraphType::Dot => write_dot(out, graph, label, dot)?,
        GraphType::Digraph => write_digraph(out, graph, label)?,
        GraphType::Tgf => write_tgf(out, graph, label)?,
        GraphType::Edges => write_edges(out, graph, label)?,
        GraphType::Graphml => write_graphml(out, graph, label)?,
    }
    tracing::debug!(
        format = %kind,
        nodes = graph.len(),
        edges = graph.edge_count(),
        "wrote graph"
    );
    Ok(())
}

/// Labels of every node, indexed by node position.
pub(super) fn labels(graph: &Subgraph<'_>, label: &LabelTemplate) -> Vec<String> {
    graph.nodes().map(|node| label.render(node.package)).collect()
}

fn write_digraph<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    label: &LabelTemplate,
) -> std::io::Result<()> {
    let labels = labels(graph, label);
    for (index, own) in labels.iter().enumerate() {
        write!(out, "{own}")?;
        for import in graph.imports(index) {
            write!(out, " {}", labels[*import])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_tgf<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    label: &LabelTemplate,
) -> std::io::Result<()> {
    for (index, own) in labels(graph, label).iter().enumerate() {
        writeln!(out, "{} {own}", index + 1)?;
    }
    writeln!(out, "#")?;
    for (from, to) in graph.edges() {
        writeln!(out, "{} {}", from + 1, to + 1)?;
    }
    Ok(())
}

fn write_edges<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    label: &LabelTemplate,
) -> std::io::Result<()> {
    let labels = labels(graph, label);
    for (from, to) in graph.edges() {
        writeln!(out, "{} {}", labels[from], labels[to])?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(super) mod tests {
    use super::*;
    use pkgsel_core::{PackageSet, Snapshot, SnapshotBuilder, Universe};

    pub fn fixture() -> Snapshot {
        SnapshotBuilder::new()
            .package("acme.org/app", &["acme.org/lib", "acme.org/log"])
            .module("acme.org", Some("v1.0.0"))
            .package("acme.org/lib", &["acme.org/log"])
            .module("acme.org", Some("v1.0.0"))
            .package("acme.org/log", &[])
            .package("other.net/unused", &["acme.org/lib"])
            .build()
            .unwrap()
    }

    pub fn render(kind: GraphType, template: &str, dot: &DotOptions) -> String {
        let snapshot = fixture();
        let set: PackageSet = ["acme.org/app", "acme.org/lib", "acme.org/log"]
            .iter()
            .map(|path| snapshot.lookup(path).unwrap())
            .collect();
        let graph = Subgraph::from_set(&snapshot, &set);
        let label = LabelTemplate::parse(template).unwrap();
        let mut out = Vec::new();
        write_graph(&mut out, &graph, kind, &label, dot).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_graph_type_names_round_trip() {
        for kind in GraphType::ALL {
            assert_eq!(kind.name().parse::<GraphType>().unwrap(), kind);
        }
        assert_eq!("GraphML".parse::<GraphType>().unwrap(), GraphType::Graphml);
        assert!("svg".parse::<GraphType>().is_err());
    }

    #[test]
    fn test_digraph() {
        assert_eq!(
            render(GraphType::Digraph, "{{.ID}}", &DotOptions::default()),
            "acme.org/app acme.org/lib acme.org/log\nacme.org/lib acme.org/log\nacme.org/log\n"
        );
    }

    #[test]
    fn test_tgf() {
        assert_eq!(
            render(GraphType::Tgf, "{{.ID}}", &DotOptions::default()),
            "1 acme.org/app\n2 acme.org/lib\n3 acme.org/log\n#\n1 2\n1 3\n2 3\n"
        );
    }

    #[test]
    fn test_edges_use_labels() {
        assert_eq!(
            render(GraphType::Edges, "{{.Path}}:{{.Imports}}", &DotOptions::default()),
            "acme.org/app:2 acme.org/lib:1\nacme.org/app:2 acme.org/log:0\nacme.org/lib:1 acme.org/log:0\n"
        );
    }
}

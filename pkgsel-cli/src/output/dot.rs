//! GraphViz dot output with per-package colours and module clusters.

use super::graph::labels;
use super::template::LabelTemplate;
use pkgsel_core::{ModuleInfo, Node, Subgraph};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Dot-specific switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotOptions {
    /// Prefix joined with a package path for `href` links
    pub docs_url: String,
    /// Group packages into one cluster per module
    pub clusters: bool,
    /// Leave out colour attributes
    pub nocolor: bool,
    /// Inside a cluster, label packages by their path below the module
    pub short: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            docs_url: "https://pkg.go.dev/".to_string(),
            clusters: false,
            nocolor: false,
            short: false,
        }
    }
}

/// Write `graph` as a `digraph G { ... }` document.
///
/// # Errors
/// Propagates write failures.
pub fn write_dot<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    label: &LabelTemplate,
    options: &DotOptions,
) -> io::Result<()> {
    let labels = labels(graph, label);

    writeln!(out, "digraph G {{")?;
    write_properties(out, options)?;

    if options.clusters {
        write_clustered_nodes(out, graph, label, &labels, options)?;
    } else {
        for node in graph.nodes() {
            write_node(out, node, &labels[node.index], options, "    ")?;
        }
    }

    for (from, to) in graph.edges() {
        let (Some(source), Some(target)) = (graph.node(from), graph.node(to)) else {
            continue;
        };
        let mut attrs = Vec::new();
        if options.clusters {
            attrs.push(format!(
                "tooltip={}",
                quote(&format!("{} -> {}", source.package.id, target.package.id))
            ));
        }
        attrs.extend(color_of(target.package.path.as_str(), options));
        if attrs.is_empty() {
            writeln!(out, "    {} -> {};", quote(&source.package.id), quote(&target.package.id))?;
        } else {
            writeln!(
                out,
                "    {} -> {} [{}];",
                quote(&source.package.id),
                quote(&target.package.id),
                attrs.join(" ")
            )?;
        }
    }

    writeln!(out, "}}")
}

fn write_properties<W: Write>(out: &mut W, options: &DotOptions) -> io::Result<()> {
    if options.nocolor {
        writeln!(out, "    node [fontsize=10 shape=rectangle target=\"_graphviz\"];")?;
        writeln!(out, "    edge [tailport=e];")?;
    } else {
        writeln!(out, "    node [penwidth=2 fontsize=10 shape=rectangle target=\"_graphviz\"];")?;
        writeln!(out, "    edge [tailport=e penwidth=2];")?;
    }
    writeln!(out, "    compound=true;")?;
    writeln!(out, "    rankdir=LR;")?;
    writeln!(out, "    newrank=true;")?;
    writeln!(out, "    ranksep=\"1.5\";")?;
    writeln!(out, "    quantum=\"0.5\";")
}

fn write_node<W: Write>(
    out: &mut W,
    node: Node<'_>,
    label: &str,
    options: &DotOptions,
    indent: &str,
) -> io::Result<()> {
    let package = node.package;
    let mut attrs = vec![format!("label={}", quote(label))];
    if options.clusters {
        attrs.push(format!("tooltip={}", quote(&package.path)));
    }
    attrs.push(format!(
        "href={}",
        quote(&format!("{}{}", options.docs_url, package.path))
    ));
    attrs.extend(color_of(&package.path, options));
    writeln!(out, "{indent}{} [{}];", quote(&package.id), attrs.join(" "))
}

/// Nodes with a module go into one `cluster_<module>` subgraph each, in
/// module path order; the rest follow at the top level.
fn write_clustered_nodes<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    label: &LabelTemplate,
    labels: &[String],
    options: &DotOptions,
) -> io::Result<()> {
    let mut modules: BTreeMap<&str, (&ModuleInfo, Vec<Node<'_>>)> = BTreeMap::new();
    let mut loose = Vec::new();
    for node in graph.nodes() {
        match &node.package.module {
            Some(module) => modules
                .entry(module.path.as_str())
                .or_insert_with(|| (module, Vec::new()))
                .1
                .push(node),
            None => loose.push(node),
        }
    }

    for (path, (module, nodes)) in &modules {
        let module_text = module_label(module);
        writeln!(out, "    subgraph {} {{", quote(&format!("cluster_{path}")))?;
        writeln!(out, "        label={};", quote(&module_text))?;
        writeln!(out, "        tooltip={};", quote(&module_text))?;
        let href = match &module.version {
            Some(version) => format!("{}{path}@{version}", options.docs_url),
            None => format!("{}{path}", options.docs_url),
        };
        writeln!(out, "        href={};", quote(&href))?;
        for node in nodes {
            let short = if options.short {
                relative_id(&node.package.id, path).map(|id| label.render_with_id(node.package, id))
            } else {
                None
            };
            let text = short.as_deref().unwrap_or(&labels[node.index]);
            write_node(out, *node, text, options, "        ")?;
        }
        writeln!(out, "    }}")?;
    }

    for node in loose {
        write_node(out, node, &labels[node.index], options, "    ")?;
    }
    Ok(())
}

/// `id` below `module`, or `None` when it is not strictly inside it.
fn relative_id<'a>(id: &'a str, module: &str) -> Option<&'a str> {
    id.strip_prefix(module)?
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty())
}

fn module_label(module: &ModuleInfo) -> String {
    let mut label = module.path.clone();
    if let Some(version) = &module.version {
        label.push('@');
        label.push_str(version);
    }
    if module.local {
        label.push_str(" (local)");
    }
    label
}

/// Double-quoted dot identifier or string.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// `color=...` attribute derived from a hash of the package path.
fn color_of(path: &str, options: &DotOptions) -> Option<String> {
    if options.nocolor {
        return None;
    }
    let hash = Sha256::digest(path.as_bytes());
    let hue = f64::from(u16::from_be_bytes([hash[0], hash[1]])) / f64::from(u16::MAX);
    Some(format!("color={}", quote(&hsla_hex(hue, 0.9, 0.3, 0.7))))
}

/// `#rrggbbaa` for a colour given as hue, saturation, lightness and alpha,
/// each in `0.0..=1.0`.
#[allow(clippy::many_single_char_names)]
fn hsla_hex(h: f64, s: f64, l: f64, a: f64) -> String {
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        channel(r),
        channel(g),
        channel(b),
        channel(a)
    )
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

//! GraphML output.

use super::graph::labels;
use super::template::LabelTemplate;
use anyhow::Result;
use pkgsel_core::Subgraph;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";

/// Write `graph` as a GraphML document with `label` and `module` node
/// attributes.
///
/// # Errors
/// Propagates write failures.
pub fn write_graphml<W: Write>(
    out: &mut W,
    graph: &Subgraph<'_>,
    label: &LabelTemplate,
) -> Result<()> {
    let labels = labels(graph, label);
    let mut writer = Writer::new_with_indent(&mut *out, b'\t', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("graphml").with_attributes([("xmlns", GRAPHML_NS)]),
    ))?;
    for key in ["label", "module"] {
        writer.write_event(Event::Empty(BytesStart::new("key").with_attributes([
            ("for", "node"),
            ("id", key),
            ("attr.name", key),
            ("attr.type", "string"),
        ])))?;
    }
    writer.write_event(Event::Start(
        BytesStart::new("graph").with_attributes([("edgedefault", "directed")]),
    ))?;

    for node in graph.nodes() {
        let package = node.package;
        writer.write_event(Event::Start(
            BytesStart::new("node").with_attributes([("id", package.id.as_str())]),
        ))?;
        let module = package.module.as_ref().map(|module| module.path.as_str());
        let data = [("label", Some(labels[node.index].as_str())), ("module", module)];
        for (key, value) in data {
            let Some(value) = value.filter(|value| !value.is_empty()) else {
                continue;
            };
            writer.write_event(Event::Start(
                BytesStart::new("data").with_attributes([("key", key)]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new("data")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }

    for (from, to) in graph.edges() {
        let (Some(source), Some(target)) = (graph.node(from), graph.node(to)) else {
            continue;
        };
        writer.write_event(Event::Empty(BytesStart::new("edge").with_attributes([
            ("source", source.package.id.as_str()),
            ("target", target.package.id.as_str()),
        ])))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("graphml")))?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::dot::DotOptions;
    use super::super::graph::tests::render;
    use super::super::graph::GraphType;

    #[test]
    fn test_graphml_document() {
        let out = render(GraphType::Graphml, "<{{.ID}}>", &DotOptions::default());
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"), "{out}");
        assert!(out.contains("<key for=\"node\" id=\"label\" attr.name=\"label\" attr.type=\"string\"/>"));
        assert!(out.contains("<graph edgedefault=\"directed\">"));
        assert!(out.contains("<node id=\"acme.org/app\">"));
        // Labels are escaped
        assert!(out.contains("<data key=\"label\">&lt;acme.org/app&gt;</data>"), "{out}");
        assert!(out.contains("<data key=\"module\">acme.org</data>"));
        assert!(out.contains("<edge source=\"acme.org/app\" target=\"acme.org/lib\"/>"));
        assert!(!out.contains("other.net"));
        assert!(out.trim_end().ends_with("</graphml>"));
    }
}

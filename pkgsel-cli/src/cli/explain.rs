//! `explain`: canonical form and syntax tree of an expression

use anyhow::{anyhow, Result};
use pkgsel_core::query;
use std::io::{self, Write};

/// Run `explain` on arguments joined with spaces.
///
/// # Errors
/// Fails with the rendered syntax error, or on a write failure.
pub fn run_explain(expr: &[String], json: bool) -> Result<()> {
    let source = expr.join(" ");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_explanation(&mut out, &source, json)?;
    out.flush()?;
    Ok(())
}

/// Write the explanation of `source`.
///
/// # Errors
/// Fails with the rendered syntax error, or on a write failure.
pub fn write_explanation<W: Write>(out: &mut W, source: &str, json: bool) -> Result<()> {
    let root = query::parse(source).map_err(|err| anyhow!(err.render(source)))?;
    let Some(expr) = root else {
        writeln!(out, "empty expression: selects no packages")?;
        return Ok(());
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &expr)?;
        writeln!(out)?;
    } else {
        writeln!(out, "canonical: {expr}")?;
        writeln!(out, "nodes:     {}", expr.node_count())?;
        write!(out, "{}", expr.tree())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn explain(source: &str, json: bool) -> String {
        let mut out = Vec::new();
        write_explanation(&mut out, source, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tree_output() {
        assert_eq!(
            explain("a b:all", false),
            "canonical: (a, b:all)\nnodes:     4\nImplicitUnion (2 members)\n  Package a\n  Selector :all\n    Package b\n"
        );
    }

    #[test]
    fn test_json_output_is_tagged() {
        let value: serde_json::Value = serde_json::from_str(&explain("a - b", true)).unwrap();
        assert_eq!(value["type"], "Binary");
    }

    #[test]
    fn test_blank_and_invalid_input() {
        assert_eq!(explain("  ", false), "empty expression: selects no packages\n");
        let mut out = Vec::new();
        let err = write_explanation(&mut out, "a +", false).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("\na +\n"), "{rendered}");
        assert!(rendered.ends_with('^'), "{rendered}");
    }
}

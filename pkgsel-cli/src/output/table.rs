//! Tab-separated column alignment for `list` output

#![allow(missing_docs)]

use std::io::Write;

/// Spaces added after the widest cell of each column.
pub const COLUMN_PADDING: usize = 3;

/// Buffers lines and aligns their tab-separated cells on render.
///
/// Text after the last tab of a line is not a cell and is written as is,
/// so a line without tabs is never padded.
pub struct TableBuilder {
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
    padding: usize,
}

impl TableBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            column_widths: Vec::new(),
            padding: COLUMN_PADDING,
        }
    }

    pub fn add_line(&mut self, line: &str) {
        let row: Vec<String> = line.split('\t').map(str::to_string).collect();
        let cells = row.len().saturating_sub(1);
        if self.column_widths.len() < cells {
            self.column_widths.resize(cells, 0);
        }
        for (width, cell) in self.column_widths.iter_mut().zip(&row[..cells]) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in &self.rows {
            let cells = row.len().saturating_sub(1);
            for (cell, width) in row[..cells].iter().zip(&self.column_widths) {
                write!(writer, "{:<width$}", cell, width = width + self.padding)?;
            }
            if let Some(last) = row.last() {
                write!(writer, "{last}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

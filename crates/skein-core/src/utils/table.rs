//! Column-aligned text tables for CLI output.
//!
//! Each column is left-aligned and padded to its widest cell (header
//! included), columns are separated by three spaces, and headers are printed
//! upper-cased.

use std::fmt::Display;
use std::io::{self, Write};

/// Spacing between two columns
pub const COLUMN_SEPARATOR: &str = "   ";

/// A table of pre-rendered cells with an optional column filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    filter: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given headers and no rows
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Restrict output to these columns, matched case-insensitively.
    /// An empty filter keeps every column.
    pub fn filter<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one row; cells line up with the headers by position
    pub fn row<I, T>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.rows.push(cells.into_iter().map(|cell| cell.to_string()).collect());
        self
    }

    /// Append several rows
    pub fn rows<R, I, T>(self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        T: Display,
    {
        rows.into_iter().fold(self, |table, cells| table.row(cells))
    }

    /// Positions of the headers that pass the filter, in header order
    pub fn selected_columns(&self) -> Vec<usize> {
        let wanted: Vec<String> = self.filter.iter().map(|f| f.to_lowercase()).collect();
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| wanted.is_empty() || wanted.contains(&header.to_lowercase()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Render the header line followed by one line per row
    pub fn render(&self) -> Vec<String> {
        let columns = self.selected_columns();

        let header_cells: Vec<String> = columns.iter().map(|&idx| self.headers[idx].to_uppercase()).collect();
        let row_cells: Vec<Vec<&str>> = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|&idx| row.get(idx).map(String::as_str).unwrap_or(""))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = header_cells.iter().map(|h| h.chars().count()).collect();
        for cells in &row_cells {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(format_line(header_cells.iter().map(String::as_str), &widths));
        for cells in row_cells {
            lines.push(format_line(cells.into_iter(), &widths));
        }
        lines
    }

    /// Write the rendered table, one line per row
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for line in self.render() {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}

/// Print `rows` under `headers` to standard output, keeping only the
/// columns named in `filter` (all columns when it is empty).
pub fn print_table<H, F, R, I, T>(headers: H, filter: F, rows: R) -> io::Result<()>
where
    H: IntoIterator,
    H::Item: Into<String>,
    F: IntoIterator,
    F::Item: Into<String>,
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = T>,
    T: Display,
{
    let table = Table::new(headers).filter(filter).rows(rows);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    table.write_to(&mut handle)?;
    handle.flush()
}

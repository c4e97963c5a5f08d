// crates/puli-core/src/grid.rs - Multi-column grid of short cells
//
// Used for `ls`-style output: cells flow left to right, row by row, in as
// many columns as fit the available line width.

use crate::error::{RenderError, RenderResult};
use crate::width::{display_width, pad_right};

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<String>,
    line_width: usize,
    indent: usize,
}

impl Grid {
    /// Create a grid that fits lines into `line_width` display columns
    pub fn new(line_width: usize) -> Self {
        Self {
            cells: Vec::new(),
            line_width,
            indent: 0,
        }
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn add_cell(&mut self, cell: impl Into<String>) {
        self.cells.push(cell.into());
    }

    pub fn add_cells<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cells.extend(cells.into_iter().map(Into::into));
    }

    /// Number of columns the grid will use
    ///
    /// The largest column count whose total width fits the line wins; a
    /// single column is used when even that overflows.
    pub fn column_count(&self) -> usize {
        let widths: Vec<usize> = self.cells.iter().map(|c| display_width(c)).collect();
        (1..=widths.len())
            .rev()
            .find(|&columns| {
                let total: usize = column_widths(&widths, columns).iter().sum::<usize>()
                    + COLUMN_GAP.len() * (columns - 1)
                    + self.indent;
                total <= self.line_width
            })
            .unwrap_or(1)
    }

    /// Render the grid into lines
    ///
    /// Errors locate the offending cell by the row and column it would
    /// have been laid out at.
    pub fn render(&self) -> RenderResult<Vec<String>> {
        if self.cells.is_empty() {
            return Ok(Vec::new());
        }

        let columns = self.column_count();
        if let Some(idx) = self.cells.iter().position(|cell| cell.contains('\n')) {
            return Err(RenderError::MultilineCell {
                row: idx / columns,
                column: idx % columns,
            });
        }
        let widths: Vec<usize> = self.cells.iter().map(|c| display_width(c)).collect();
        let column_widths = column_widths(&widths, columns);
        let prefix = " ".repeat(self.indent);

        let lines = self
            .cells
            .chunks(columns)
            .map(|row| {
                // Empty cells at the end of a row add no padding
                let kept = row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);
                let cells: Vec<String> = row[..kept]
                    .iter()
                    .enumerate()
                    .map(|(column, cell)| {
                        if column + 1 == kept {
                            cell.clone()
                        } else {
                            pad_right(cell, column_widths[column])
                        }
                    })
                    .collect();
                format!("{}{}", prefix, cells.join(COLUMN_GAP))
            })
            .collect();

        Ok(lines)
    }
}

fn column_widths(widths: &[usize], columns: usize) -> Vec<usize> {
    let mut result = vec![0; columns];
    for (idx, width) in widths.iter().enumerate() {
        let column = idx % columns;
        result[column] = result[column].max(*width);
    }
    result
}

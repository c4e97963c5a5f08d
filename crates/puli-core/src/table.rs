// crates/puli-core/src/table.rs - Aligned text tables
//
// A table is built once per listing, rendered once and thrown away. Rendering
// returns the lines instead of printing them so that callers decide where the
// text goes (terminal, buffer, test assertion).
//
// LAYOUT:
// - Column width is the widest cell of that column, header included,
//   measured with `display_width` so style tags and multi-byte characters
//   never shift a column
// - Borderless: columns separated by two spaces, no rules
// - Compact: columns separated by a single space, no rules
// - Bordered: ASCII rules around the table and below the header
// - Every line starts with `indent` spaces
// - Without borders the last cell is not padded and empty trailing cells
//   are left out; cell text itself is never trimmed

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::width::{display_width, pad_left, pad_right};

/// Visual style of a rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    #[default]
    Borderless,
    Compact,
    Bordered,
}

impl TableStyle {
    fn column_separator(&self) -> &'static str {
        match self {
            Self::Borderless => "  ",
            Self::Compact => " ",
            Self::Bordered => " | ",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Borderless => "borderless",
            Self::Compact => "compact",
            Self::Bordered => "bordered",
        }
    }
}

impl fmt::Display for TableStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borderless" => Ok(Self::Borderless),
            "compact" => Ok(Self::Compact),
            "bordered" => Ok(Self::Bordered),
            other => Err(format!(
                "Invalid table style '{}'. Must be one of: borderless, compact, bordered",
                other
            )),
        }
    }
}

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Rows of styled cells rendered as aligned text
///
/// ```
/// use puli_core::table::{Table, TableStyle};
///
/// let mut table = Table::new(TableStyle::Borderless)
///     .header(["UUID", "Glob", "Type"])
///     .indent(4);
/// table.add_row(["bb5a07", "/root/enabled", "my/type"]);
///
/// let lines = table.render().unwrap();
/// assert_eq!(lines[0], "    UUID    Glob           Type");
/// assert_eq!(lines[1], "    bb5a07  /root/enabled  my/type");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    style: TableStyle,
    alignments: Vec<Alignment>,
    indent: usize,
}

impl Table {
    pub fn new(style: TableStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Set the header row; it fixes the column count of the table
    pub fn header<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = Some(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Align column `column` (zero based); unlisted columns align left
    pub fn align(mut self, column: usize, alignment: Alignment) -> Self {
        if self.alignments.len() <= column {
            self.alignments.resize(column + 1, Alignment::Left);
        }
        self.alignments[column] = alignment;
        self
    }

    /// Number of spaces prepended to every rendered line
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render the table into lines without trailing newlines
    ///
    /// Rows are numbered in errors the way they are rendered: the header,
    /// when present, is row 0.
    pub fn render(&self) -> RenderResult<Vec<String>> {
        let all_rows: Vec<&Vec<String>> = self.header.iter().chain(self.rows.iter()).collect();
        let Some(first) = all_rows.first() else {
            return Ok(Vec::new());
        };
        let columns = first.len();

        for (row_idx, row) in all_rows.iter().enumerate() {
            if row.len() != columns {
                return Err(RenderError::ColumnCountMismatch {
                    row: row_idx,
                    expected: columns,
                    found: row.len(),
                });
            }
            if let Some(column) = row.iter().position(|cell| cell.contains('\n')) {
                return Err(RenderError::MultilineCell {
                    row: row_idx,
                    column,
                });
            }
        }

        let mut widths = vec![0; columns];
        for row in &all_rows {
            for (column, cell) in row.iter().enumerate() {
                widths[column] = widths[column].max(display_width(cell));
            }
        }

        let mut lines = Vec::with_capacity(all_rows.len() + 3);
        match self.style {
            TableStyle::Bordered => {
                let rule = self.rule(&widths);
                lines.push(rule.clone());
                if let Some(header) = &self.header {
                    lines.push(self.bordered_line(header, &widths));
                    lines.push(rule.clone());
                }
                for row in &self.rows {
                    lines.push(self.bordered_line(row, &widths));
                }
                if !self.rows.is_empty() {
                    lines.push(rule);
                }
            }
            TableStyle::Borderless | TableStyle::Compact => {
                for row in &all_rows {
                    lines.push(self.open_line(row, &widths));
                }
            }
        }

        Ok(lines)
    }

    fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    fn pad(&self, cell: &str, column: usize, width: usize) -> String {
        match self.alignment(column) {
            Alignment::Left => pad_right(cell, width),
            Alignment::Right => pad_left(cell, width),
        }
    }

    /// Trailing empty cells are dropped and the last kept cell is not
    /// right-padded, so only padding added here is ever left out.
    fn open_line(&self, row: &[String], widths: &[usize]) -> String {
        let kept = row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |idx| idx + 1);
        let cells: Vec<String> = row[..kept]
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                if column + 1 == kept && self.alignment(column) == Alignment::Left {
                    cell.clone()
                } else {
                    self.pad(cell, column, widths[column])
                }
            })
            .collect();

        format!(
            "{}{}",
            " ".repeat(self.indent),
            cells.join(self.style.column_separator())
        )
    }

    fn bordered_line(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(column, cell)| self.pad(cell, column, widths[column]))
            .collect();

        format!(
            "{}| {} |",
            " ".repeat(self.indent),
            cells.join(self.style.column_separator())
        )
    }

    fn rule(&self, widths: &[usize]) -> String {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("{}+{}+", " ".repeat(self.indent), segments.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::strip_tags;
    use proptest::prelude::*;

    fn binding_table(style: TableStyle, indent: usize) -> Table {
        let mut table = Table::new(style)
            .header(["UUID", "Glob", "Type"])
            .indent(indent);
        table.add_row(["bb5a07", "/root/enabled", "my/type"]);
        table
    }

    #[test]
    fn test_borderless_with_indent() {
        let lines = binding_table(TableStyle::Borderless, 4).render().unwrap();
        assert_eq!(
            lines.join("\n"),
            "    UUID    Glob           Type\n    bb5a07  /root/enabled  my/type"
        );
    }

    #[test]
    fn test_compact_uses_single_space() {
        let lines = binding_table(TableStyle::Compact, 0).render().unwrap();
        assert_eq!(lines[0], "UUID   Glob          Type");
        assert_eq!(lines[1], "bb5a07 /root/enabled my/type");
    }

    #[test]
    fn test_bordered() {
        let lines = binding_table(TableStyle::Bordered, 2).render().unwrap();
        assert_eq!(
            lines,
            vec![
                "  +--------+---------------+---------+",
                "  | UUID   | Glob          | Type    |",
                "  +--------+---------------+---------+",
                "  | bb5a07 | /root/enabled | my/type |",
                "  +--------+---------------+---------+",
            ]
        );
    }

    #[test]
    fn test_right_alignment_pads_before() {
        let mut table = Table::new(TableStyle::Borderless).align(1, Alignment::Right);
        table.add_row(["a", "1"]);
        table.add_row(["bb", "100"]);
        let lines = table.render().unwrap();
        assert_eq!(lines, vec!["a     1", "bb  100"]);
    }

    #[test]
    fn test_last_column_is_not_padded() {
        let mut table = Table::new(TableStyle::Borderless);
        table.add_row(["x", "short"]);
        table.add_row(["y", "much longer"]);
        let lines = table.render().unwrap();
        assert_eq!(lines[0], "x  short");
        assert!(lines.iter().all(|line| !line.ends_with(' ')));
    }

    #[test]
    fn test_trailing_spaces_of_last_cell_are_kept() {
        let mut table = Table::new(TableStyle::Borderless);
        table.add_row(["a", "b  "]);
        table.add_row(["cc", ""]);
        let lines = table.render().unwrap();
        assert_eq!(lines, vec!["a   b  ", "cc"]);
    }

    #[test]
    fn test_empty_trailing_cells_leave_indent() {
        let mut table = Table::new(TableStyle::Borderless).indent(4);
        table.add_row(["", ""]);
        table.add_row(["a", ""]);
        let lines = table.render().unwrap();
        assert_eq!(lines, vec!["    ", "    a"]);
    }

    #[test]
    fn test_style_tags_do_not_shift_columns() {
        let mut table = Table::new(TableStyle::Borderless);
        table.add_row(["<c1>bb5a07</c1>", "<u>my/type</u>"]);
        table.add_row(["cc1234", "other"]);
        let lines = table.render().unwrap();
        assert_eq!(lines[0], "<c1>bb5a07</c1>  <u>my/type</u>");
        assert_eq!(strip_tags(&lines[0]).find("my/type"), Some(8));
        assert_eq!(lines[1].find("other"), Some(8));
    }

    #[test]
    fn test_non_breaking_space_counts_as_one_column() {
        let mut table = Table::new(TableStyle::Borderless);
        table.add_row(["a\u{a0}b", "x"]);
        table.add_row(["abc", "y"]);
        let lines = table.render().unwrap();
        // Both first cells are three columns wide
        assert_eq!(lines[0], "a\u{a0}b  x");
        assert_eq!(lines[1], "abc  y");
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = Table::new(TableStyle::Bordered);
        assert!(table.render().unwrap().is_empty());
    }

    #[test]
    fn test_header_only() {
        let table = Table::new(TableStyle::Borderless).header(["Name", "Path"]);
        assert_eq!(table.render().unwrap(), vec!["Name  Path"]);
    }

    #[test]
    fn test_column_count_mismatch_fails() {
        let mut table = Table::new(TableStyle::Borderless).header(["A", "B"]);
        table.add_row(["1", "2"]);
        table.add_row(["only one"]);
        assert_eq!(
            table.render(),
            Err(RenderError::ColumnCountMismatch {
                row: 2,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_multiline_cell_fails() {
        let mut table = Table::new(TableStyle::Borderless);
        table.add_row(["a", "b\nc"]);
        assert_eq!(
            table.render(),
            Err(RenderError::MultilineCell { row: 0, column: 1 })
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let table = binding_table(TableStyle::Bordered, 1);
        assert_eq!(table.render().unwrap(), table.render().unwrap());
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("compact".parse::<TableStyle>(), Ok(TableStyle::Compact));
        assert!("fancy".parse::<TableStyle>().is_err());
        assert_eq!(TableStyle::Bordered.to_string(), "bordered");
    }

    proptest! {
        #[test]
        fn prop_columns_start_at_same_offsets(
            rows in prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 3), 1..8),
            indent in 0usize..8,
        ) {
            let mut table = Table::new(TableStyle::Borderless).indent(indent);
            for row in &rows {
                table.add_row(row.clone());
            }
            let lines = table.render().unwrap();

            let widths: Vec<usize> = (0..3)
                .map(|c| rows.iter().map(|r| r[c].len()).max().unwrap_or(0))
                .collect();
            for (line, row) in lines.iter().zip(&rows) {
                let mut offset = indent;
                for (column, cell) in row.iter().enumerate() {
                    prop_assert!(line[offset..].starts_with(cell.as_str()));
                    offset += widths[column] + 2;
                }
            }
        }

        #[test]
        fn prop_every_line_starts_with_indent(
            rows in prop::collection::vec(prop::collection::vec("[a-z ]{0,6}", 2), 0..6),
            indent in 0usize..12,
            bordered in any::<bool>(),
        ) {
            let style = if bordered { TableStyle::Bordered } else { TableStyle::Compact };
            let mut table = Table::new(style).indent(indent);
            for row in &rows {
                table.add_row(row.clone());
            }
            let prefix = " ".repeat(indent);
            for line in table.render().unwrap() {
                prop_assert!(line.starts_with(&prefix));
            }
        }
    }
}

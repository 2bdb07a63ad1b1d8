use crate::error::{MarkdownError, Result};
use crate::format::Alignment;
use crate::table::{self, TableSource};

use super::{Frame, MarkdownWriter, State};

/// Rendered width and declared alignment of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColumnInfo {
    pub alignment: Alignment,
    /// Characters a cell is padded to; 0 leaves cells unpadded.
    pub width: usize,
}

impl ColumnInfo {
    pub fn new(alignment: Alignment, width: usize) -> Self {
        Self { alignment, width }
    }
}

/// Cursor of the table being written.
#[derive(Debug)]
pub(crate) struct TableState {
    columns: Vec<ColumnInfo>,
    /// Index of the next cell in the current row.
    column: usize,
    /// Text of the open cell; padding needs its width before it is written.
    pub(crate) cell: Option<String>,
    cell_start: usize,
    outer: bool,
}

impl MarkdownWriter<'_> {
    /// Write a whole table: header row, separator and body rows, with
    /// column widths measured up front.
    pub fn write_table(&mut self, source: &dyn TableSource) -> Result<()> {
        self.check_open()?;
        if self.table.is_some() || self.measuring {
            return Err(MarkdownError::NestedTable);
        }
        let columns = table::analyze(source, &self.format)?;
        let rows = source.row_count();
        if rows == 0 || columns.is_empty() {
            return Ok(());
        }
        let column_count = columns.len();

        self.write_start_table(columns)?;
        for row in 0..rows {
            let cells = source.cell_count(row);
            if cells > column_count {
                log::warn!(
                    "table row {row} has {cells} cells but the header declares {column_count}; extra cells dropped"
                );
            }
            self.write_start_table_row()?;
            for column in 0..cells.min(column_count) {
                self.write_start_table_cell()?;
                source.write_cell(row, column, self)?;
                self.write_end_table_cell()?;
            }
            self.write_end_table_row()?;
            if row == 0 {
                self.write_table_header_separator()?;
            }
        }
        self.write_end_table()
    }

    pub fn write_start_table(&mut self, columns: Vec<ColumnInfo>) -> Result<()> {
        self.check_open()?;
        if self.table.is_some() || self.measuring {
            return Err(MarkdownError::NestedTable);
        }
        if self.format.table_options().empty_line_before {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        // a single column needs pipes on both sides to be recognized
        let outer = self.format.table_options().outer_delimiter || columns.len() == 1;
        self.table = Some(TableState {
            columns,
            column: 0,
            cell: None,
            cell_start: 0,
            outer,
        });
        self.push(Frame::Table);
        Ok(())
    }

    pub fn write_end_table(&mut self) -> Result<()> {
        self.pop(State::Table)?;
        self.table = None;
        self.paragraph = false;
        if self.format.table_options().empty_line_after {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        Ok(())
    }

    pub fn write_start_table_row(&mut self) -> Result<()> {
        self.expect_state(State::TableRow, State::Table)?;
        self.request_line();
        if self.table_state()?.outer {
            self.put("|")?;
        }
        if let Some(table) = self.table.as_mut() {
            table.column = 0;
        }
        self.push(Frame::TableRow);
        Ok(())
    }

    /// Close the row, padding cells the row did not write.
    pub fn write_end_table_row(&mut self) -> Result<()> {
        self.check_open()?;
        if self.current_state() != Some(State::TableRow) {
            return Err(MarkdownError::UnexpectedEnd {
                expected: State::TableRow,
                found: self.current_state(),
            });
        }
        while self.table_state()?.column < self.table_state()?.columns.len() {
            self.write_start_table_cell()?;
            self.write_end_table_cell()?;
        }
        if self.table_state()?.outer {
            self.put("|")?;
        }
        self.pop(State::TableRow)?;
        self.request_line();
        Ok(())
    }

    pub fn write_start_table_cell(&mut self) -> Result<()> {
        self.expect_state(State::TableCell, State::TableRow)?;
        if self.table_state()?.column > 0 {
            self.put("|")?;
        }
        let start = self.len;
        if let Some(table) = self.table.as_mut() {
            table.cell = Some(String::new());
            table.cell_start = start;
        }
        self.push(Frame::TableCell);
        Ok(())
    }

    pub fn write_end_table_cell(&mut self) -> Result<()> {
        self.pop(State::TableCell)?;
        let Some(table) = self.table.as_mut() else {
            return Err(MarkdownError::Misplaced(State::TableCell, State::Table));
        };
        let content = table.cell.take().unwrap_or_default();
        let start = table.cell_start;
        let width = self.len.saturating_sub(start);
        let cell = table.pad_cell(&content, width, self.format.table_options());
        table.column += 1;
        self.len = start;
        self.put(&cell)
    }

    /// `| --- | :-- |` row sized to the column widths.
    pub fn write_table_header_separator(&mut self) -> Result<()> {
        self.expect_state(State::TableRow, State::Table)?;
        let options = self.format.table_options();
        let table = self.table_state()?;
        let pad = if options.padding { " " } else { "" };
        let count = table.columns.len();

        let mut line = String::new();
        if table.outer {
            line.push('|');
        }
        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                line.push('|');
            }
            if table.outer || i > 0 {
                line.push_str(pad);
            }
            line.push_str(&separator_cell(column));
            if table.outer || i + 1 < count {
                line.push_str(pad);
            }
        }
        if table.outer {
            line.push('|');
        }

        self.request_line();
        self.put(&line)?;
        self.request_line();
        Ok(())
    }

    /// Fail with `Misplaced(construct, parent)` unless the innermost open
    /// construct is `parent`.
    fn expect_state(&self, construct: State, parent: State) -> Result<()> {
        self.check_open()?;
        if self.table.is_none() || self.current_state() != Some(parent) {
            return Err(MarkdownError::Misplaced(construct, parent));
        }
        Ok(())
    }

    fn table_state(&self) -> Result<&TableState> {
        self.table
            .as_ref()
            .ok_or(MarkdownError::Misplaced(State::TableRow, State::Table))
    }
}

impl TableState {
    fn pad_cell(
        &self,
        content: &str,
        width: usize,
        options: crate::format::TableOptions,
    ) -> String {
        let info = self.columns.get(self.column).copied().unwrap_or_default();
        let last = self.column + 1 >= self.columns.len();
        let pad = if options.padding { " " } else { "" };

        let fill = info.width.saturating_sub(width);
        // Without an outer pipe the row starts with the first cell; four
        // leading spaces would turn the table into an indented code block.
        let bare_first = !self.outer && self.column == 0;
        let (left, right) = if bare_first {
            (0, fill)
        } else if options.align_content {
            match info.alignment {
                Alignment::Right => (fill, 0),
                Alignment::Center => (fill / 2, fill - fill / 2),
                Alignment::None | Alignment::Left => (0, fill),
            }
        } else {
            (0, fill)
        };

        let mut cell = String::with_capacity(content.len() + fill + 2);
        if self.outer || self.column > 0 {
            cell.push_str(pad);
        }
        cell.extend(std::iter::repeat_n(' ', left));
        cell.push_str(content);
        let mut right = right;
        if bare_first && content.trim().is_empty() {
            // an empty first cell needs a leading pipe to stay a cell
            cell.insert(0, '|');
            right = right.saturating_sub(1);
        }
        if last && !self.outer {
            // nothing follows the last cell; trailing spaces would only
            // be noise
            let trimmed = cell.trim_end().len();
            cell.truncate(trimmed);
        } else {
            cell.extend(std::iter::repeat_n(' ', right));
            cell.push_str(pad);
        }
        cell
    }
}

fn separator_cell(column: &ColumnInfo) -> String {
    let width = column.width.max(3);
    let dashes = |n: usize| "-".repeat(n);
    match column.alignment {
        Alignment::None => dashes(width),
        Alignment::Left => format!(":{}", dashes(width - 1)),
        Alignment::Right => format!("{}:", dashes(width - 1)),
        Alignment::Center => format!(":{}:", dashes(width - 2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MarkdownFormat, TableOptions};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table_format(options: TableOptions) -> MarkdownFormat {
        MarkdownFormat::default().with_table_options(options)
    }

    fn streamed(format: MarkdownFormat, columns: Vec<ColumnInfo>, rows: &[&[&str]]) -> String {
        let mut w = MarkdownWriter::new(format);
        w.write_start_table(columns).unwrap();
        for (i, row) in rows.iter().enumerate() {
            w.write_start_table_row().unwrap();
            for cell in row.iter() {
                w.write_start_table_cell().unwrap();
                w.write_text(cell).unwrap();
                w.write_end_table_cell().unwrap();
            }
            w.write_end_table_row().unwrap();
            if i == 0 {
                w.write_table_header_separator().unwrap();
            }
        }
        w.write_end_table().unwrap();
        w.close().unwrap();
        w.into_buffer().unwrap()
    }

    #[rstest]
    #[case(Alignment::None, 3, "---")]
    #[case(Alignment::Left, 4, ":---")]
    #[case(Alignment::Right, 3, "--:")]
    #[case(Alignment::Center, 5, ":---:")]
    #[case(Alignment::Center, 0, ":-:")]
    fn separator_cells(#[case] alignment: Alignment, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(separator_cell(&ColumnInfo::new(alignment, width)), expected);
    }

    #[test]
    fn streaming_table_pads_to_column_widths() {
        let columns = vec![
            ColumnInfo::new(Alignment::Left, 5),
            ColumnInfo::new(Alignment::Right, 4),
        ];
        let out = streamed(
            MarkdownFormat::default(),
            columns,
            &[&["Name", "Age"], &["Al", "30"]],
        );
        assert_snapshot!(out, @r"
        | Name  |  Age |
        | :---- | ---: |
        | Al    |   30 |
        ");
    }

    #[test]
    fn center_alignment_splits_fill() {
        let columns = vec![ColumnInfo::new(Alignment::Center, 6)];
        let out = streamed(MarkdownFormat::default(), columns, &[&["ab"], &["abcd"]]);
        assert_eq!(out, "|   ab   |\n| :----: |\n|  abcd  |\n");
    }

    #[test]
    fn without_outer_delimiter() {
        let format = table_format(TableOptions {
            outer_delimiter: false,
            ..TableOptions::default()
        });
        let columns = vec![ColumnInfo::new(Alignment::None, 3); 2];
        let out = streamed(format, columns, &[&["a", "b"], &["c", "d"]]);
        assert_eq!(out, "a   | b\n--- | ---\nc   | d\n");
    }

    #[test]
    fn empty_first_cell_without_outer_delimiter() {
        let format = table_format(TableOptions {
            outer_delimiter: false,
            ..TableOptions::default()
        });
        let columns = vec![ColumnInfo::new(Alignment::None, 3); 2];
        let out = streamed(format, columns, &[&["", "b"], &["c", "d"]]);
        assert_eq!(out, "|   | b\n--- | ---\nc   | d\n");
    }

    #[test]
    fn right_aligned_first_column_starts_the_row() {
        let format = table_format(TableOptions {
            outer_delimiter: false,
            ..TableOptions::default()
        });
        let columns = vec![
            ColumnInfo::new(Alignment::Right, 8),
            ColumnInfo::new(Alignment::Right, 3),
        ];
        let out = streamed(format, columns, &[&["n", "x"], &["c", "dd"]]);
        assert_eq!(out, "n        |   x\n-------: | --:\nc        |  dd\n");
    }

    #[test]
    fn single_column_keeps_outer_pipes() {
        let format = table_format(TableOptions {
            outer_delimiter: false,
            ..TableOptions::default()
        });
        let out = streamed(format, vec![ColumnInfo::new(Alignment::None, 3)], &[&["x"]]);
        assert_eq!(out, "| x   |\n| --- |\n");
    }

    #[test]
    fn missing_cells_are_padded() {
        let columns = vec![ColumnInfo::new(Alignment::None, 3); 2];
        let out = streamed(MarkdownFormat::default(), columns, &[&["a", "b"], &["c"]]);
        assert_eq!(out, "| a   | b   |\n| --- | --- |\n| c   |     |\n");
    }

    #[test]
    fn pipes_and_newlines_in_cells() {
        let columns = vec![ColumnInfo::new(Alignment::None, 0)];
        let out = streamed(MarkdownFormat::default(), columns, &[&["a|b\nc"]]);
        assert_eq!(out, "| a\\|b c |\n| --- |\n");
    }

    #[test]
    fn unpadded_cells_without_padding_option() {
        let format = table_format(TableOptions {
            padding: false,
            ..TableOptions::default()
        });
        let columns = vec![ColumnInfo::new(Alignment::None, 3); 2];
        let out = streamed(format, columns, &[&["a", "b"]]);
        assert_eq!(out, "|a  |b  |\n|---|---|\n");
    }

    #[test]
    fn cell_outside_row_is_rejected() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(matches!(
            w.write_start_table_cell(),
            Err(MarkdownError::Misplaced(State::TableCell, State::TableRow))
        ));
        assert!(matches!(
            w.write_start_table_row(),
            Err(MarkdownError::Misplaced(State::TableRow, State::Table))
        ));
        w.write_start_table(vec![ColumnInfo::default()]).unwrap();
        assert!(matches!(
            w.write_start_table(Vec::new()),
            Err(MarkdownError::NestedTable)
        ));
    }

    #[test]
    fn table_in_block_quote() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        w.write_start_block_quote().unwrap();
        w.write_table(&vec![vec!["h"], vec!["v"]]).unwrap();
        w.write_end_block_quote().unwrap();
        w.close().unwrap();
        assert_eq!(w.buffer(), Some("> | h   |\n> | --- |\n> | v   |\n"));
    }
}

//! Table sources and column width analysis.
//!
//! Before the first row of a table is written, [`analyze`] renders every
//! cell through a scratch writer configured with the same format as the
//! real output and records the number of characters each cell produced.
//! Escaping can change a cell's length, so widths are never estimated from
//! the raw text.

use std::cell::Cell;

use crate::elements::TableColumn;
use crate::error::Result;
use crate::format::{Alignment, MarkdownFormat};
use crate::writer::{ColumnInfo, MarkdownWriter, WriteMarkdown};

/// Rows of cells that can be written as a table. Row 0 is the header.
pub trait TableSource {
    fn row_count(&self) -> usize;

    fn cell_count(&self, row: usize) -> usize;

    /// Alignment declared by the header cell of `column`.
    fn alignment(&self, column: usize) -> Alignment {
        let _ = column;
        Alignment::None
    }

    fn write_cell(
        &self,
        row: usize,
        column: usize,
        writer: &mut MarkdownWriter<'_>,
    ) -> Result<()>;
}

thread_local! {
    // at most one idle scratch buffer per thread
    static SCRATCH: Cell<Option<String>> = const { Cell::new(None) };
}

/// Measure the columns of `source` as they will render with `format`.
///
/// The header row decides the number of columns. Returns no columns for a
/// source without rows.
pub fn analyze(source: &dyn TableSource, format: &MarkdownFormat) -> Result<Vec<ColumnInfo>> {
    let rows = source.row_count();
    if rows == 0 {
        return Ok(Vec::new());
    }
    let count = source.cell_count(0);
    let options = format.table_options();
    let mut widths = vec![0; count];

    let buffer = SCRATCH.take().unwrap_or_default();
    let mut writer = MarkdownWriter::cell_measurer(buffer, format.clone());

    if options.format_header {
        for (column, width) in widths.iter_mut().enumerate() {
            *width = measure(source, &mut writer, 0, column)?;
        }
    }
    if options.format_content {
        for row in 1..rows {
            if source.cell_count(row) < count {
                log::trace!("table width analysis stopped at short row {row}");
                break;
            }
            for (column, width) in widths.iter_mut().enumerate() {
                *width = (*width).max(measure(source, &mut writer, row, column)?);
            }
        }
    }

    if let Some(mut buffer) = writer.into_buffer() {
        buffer.clear();
        SCRATCH.set(Some(buffer));
    }

    let formatted = options.is_formatted();
    let columns = widths
        .into_iter()
        .enumerate()
        .map(|(column, width)| ColumnInfo {
            alignment: source.alignment(column),
            width: if formatted { width.max(3) } else { 0 },
        })
        .collect::<Vec<_>>();
    log::trace!("table columns: {columns:?}");
    Ok(columns)
}

fn measure(
    source: &dyn TableSource,
    writer: &mut MarkdownWriter<'_>,
    row: usize,
    column: usize,
) -> Result<usize> {
    let start = writer.len();
    source.write_cell(row, column, writer)?;
    Ok(writer.len() - start)
}

/// A table value: a header of [`TableColumn`]s followed by body rows.
///
/// ```
/// use markwright_engine::{Alignment, MarkdownFormat, Table, TableColumn, render};
///
/// let table = Table::new(
///     vec![TableColumn::new("Name", Alignment::None), "Age".into()],
///     vec![vec!["Al", "30"]],
/// );
/// let out = render(&table, &MarkdownFormat::default()).unwrap();
/// assert_eq!(out, "| Name | Age |\n| ---- | --- |\n| Al   | 30  |\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table<T> {
    header: Vec<TableColumn>,
    rows: Vec<Vec<T>>,
}

impl<T> Table<T> {
    pub fn new(header: Vec<TableColumn>, rows: Vec<Vec<T>>) -> Self {
        Self { header, rows }
    }

    pub fn header(&self) -> &[TableColumn] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<T>) {
        self.rows.push(row);
    }
}

impl<T: WriteMarkdown> TableSource for Table<T> {
    fn row_count(&self) -> usize {
        if self.header.is_empty() {
            0
        } else {
            self.rows.len() + 1
        }
    }

    fn cell_count(&self, row: usize) -> usize {
        match row {
            0 => self.header.len(),
            _ => self.rows.get(row - 1).map_or(0, Vec::len),
        }
    }

    fn alignment(&self, column: usize) -> Alignment {
        self.header
            .get(column)
            .map_or(Alignment::None, TableColumn::alignment)
    }

    fn write_cell(&self, row: usize, column: usize, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        match row {
            0 => self.header.get(column).write_markdown(writer),
            _ => self
                .rows
                .get(row - 1)
                .and_then(|cells| cells.get(column))
                .write_markdown(writer),
        }
    }
}

impl<T: WriteMarkdown> WriteMarkdown for Table<T> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_table(self)
    }
}

/// Plain rows; the first one is the header and every column is unaligned.
impl<T: WriteMarkdown> TableSource for Vec<Vec<T>> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn cell_count(&self, row: usize) -> usize {
        self.get(row).map_or(0, Vec::len)
    }

    fn write_cell(&self, row: usize, column: usize, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        self.get(row)
            .and_then(|cells| cells.get(column))
            .write_markdown(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TableOptions;
    use crate::writer::render;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn format(format_header: bool, format_content: bool) -> MarkdownFormat {
        MarkdownFormat::default().with_table_options(TableOptions {
            format_header,
            format_content,
            ..TableOptions::default()
        })
    }

    fn render_table(source: &dyn TableSource) -> String {
        let mut writer = MarkdownWriter::new(MarkdownFormat::default());
        writer.write_table(source).unwrap();
        writer.close().unwrap();
        writer.into_buffer().unwrap()
    }

    fn widths(source: &dyn TableSource, format: &MarkdownFormat) -> Vec<usize> {
        analyze(source, format)
            .unwrap()
            .into_iter()
            .map(|c| c.width)
            .collect()
    }

    #[rstest]
    #[case(true, true, vec![5, 3])]
    #[case(true, false, vec![4, 3])]
    #[case(false, true, vec![5, 3])]
    #[case(false, false, vec![0, 0])]
    fn width_passes(#[case] header: bool, #[case] content: bool, #[case] expected: Vec<usize>) {
        let rows = vec![vec!["Name", "Id"], vec!["Alice", "1"], vec!["Bo", "22"]];
        assert_eq!(widths(&rows, &format(header, content)), expected);
    }

    #[test]
    fn widths_are_measured_after_escaping() {
        let rows = vec![vec!["a|b*c"]];
        assert_eq!(widths(&rows, &MarkdownFormat::default()), vec![7]);
    }

    #[test]
    fn short_row_stops_body_analysis() {
        let rows = vec![
            vec!["h1", "h2"],
            vec!["wide cell", "x"],
            vec!["only"],
            vec!["even wider cell", "y"],
        ];
        assert_eq!(widths(&rows, &MarkdownFormat::default()), vec![9, 3]);
    }

    #[test]
    fn empty_sources() {
        let rows: Vec<Vec<&str>> = Vec::new();
        assert!(analyze(&rows, &MarkdownFormat::default()).unwrap().is_empty());
        assert_eq!(render_table(&rows), "");
        let table: Table<&str> = Table::new(Vec::new(), vec![vec!["x"]]);
        assert_eq!(render(&table, &MarkdownFormat::default()).unwrap(), "");
    }

    #[test]
    fn alignment_comes_from_header() {
        let table = Table::new(
            vec![
                TableColumn::new("L", Alignment::Left),
                TableColumn::new("C", Alignment::Center),
                TableColumn::new("R", Alignment::Right),
            ],
            vec![vec!["1", "2", "3"]],
        );
        let alignments: Vec<_> = analyze(&table, &MarkdownFormat::default())
            .unwrap()
            .into_iter()
            .map(|c| c.alignment)
            .collect();
        assert_eq!(
            alignments,
            vec![Alignment::Left, Alignment::Center, Alignment::Right]
        );
        assert_eq!(
            render(&table, &MarkdownFormat::default()).unwrap(),
            "| L   |  C  |   R |\n| :-- | :-: | --: |\n| 1   |  2  |   3 |\n"
        );
    }

    #[test]
    fn extra_cells_are_dropped() {
        let rows = vec![vec!["a"], vec!["b", "extra"]];
        assert_eq!(render_table(&rows), "| a   |\n| --- |\n| b   |\n");
    }

    #[test]
    fn scratch_buffer_is_recycled() {
        let rows = vec![vec!["abc"]];
        analyze(&rows, &MarkdownFormat::default()).unwrap();
        let recycled = SCRATCH.take();
        assert_eq!(recycled.as_deref(), Some(""));
    }
}

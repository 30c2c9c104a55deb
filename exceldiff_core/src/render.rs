//! Sink renderers that turn a [`DiffResult`] into something a person reads.

use csv::WriterBuilder;
#[cfg(feature = "excel")]
use exceldiff_common::CellValue;
use exceldiff_common::{DiffKind, DiffResult, ExcelDiffError, Result, RowDiff};
#[cfg(feature = "excel")]
use rust_xlsxwriter::{Color, Format, IntoExcelData, Workbook, Worksheet, XlsxError};
use std::io::{self, Write};
#[cfg(feature = "excel")]
use std::path::Path;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const ORANGE: &str = "\x1b[38;5;208m";

const FILL_MODIFIED: u32 = 0xFF0000;
const FILL_REMOVED: u32 = 0xFFFF00;
const FILL_ADDED: u32 = 0xFFA500;
const MAX_COLUMN_WIDTH: usize = 50;

/// Text shown for column `col` of `entry`; modified cells read `old -> new`
pub fn cell_text(entry: &RowDiff, col: usize) -> String {
    let new = entry
        .row_data
        .get(col)
        .map(|c| c.to_string())
        .unwrap_or_default();

    if entry.kind != DiffKind::Modified || !entry.is_column_modified(col) {
        return new;
    }

    let old = entry
        .original_row_data
        .as_ref()
        .and_then(|row| row.get(col))
        .map(|c| c.to_string())
        .unwrap_or_default();
    format!("{} -> {}", old, new)
}

fn status_marker(kind: DiffKind) -> &'static str {
    match kind {
        DiffKind::Identical => "  ==  ",
        DiffKind::Modified => "  ~~  ",
        DiffKind::Removed => "  --  ",
        DiffKind::Added => "  ++  ",
    }
}

fn row_color(kind: DiffKind) -> Option<&'static str> {
    match kind {
        DiffKind::Identical | DiffKind::Modified => None,
        DiffKind::Removed => Some(YELLOW),
        DiffKind::Added => Some(ORANGE),
    }
}

/// Line-per-row terminal rendering
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    use_color: bool,
    show_row_numbers: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            use_color: false,
            show_row_numbers: true,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_row_numbers(mut self, show: bool) -> Self {
        self.show_row_numbers = show;
        self
    }

    pub fn render(&self, result: &DiffResult) -> String {
        result
            .iter()
            .map(|entry| self.render_entry(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_to<W: Write>(&self, result: &DiffResult, mut writer: W) -> io::Result<()> {
        for entry in result {
            writeln!(writer, "{}", self.render_entry(entry))?;
        }
        Ok(())
    }

    pub fn render_entry(&self, entry: &RowDiff) -> String {
        let cells: Vec<String> = (0..entry.row_data.len())
            .map(|col| {
                let text = cell_text(entry, col);
                let changed = entry.kind == DiffKind::Modified && entry.is_column_modified(col);
                if self.use_color && changed {
                    format!("{}{}{}", RED, text, RESET)
                } else {
                    text
                }
            })
            .collect();

        let mut line = String::from(status_marker(entry.kind));
        if self.show_row_numbers {
            line.push_str(&format!("{:>5}  ", entry.source_row + 1));
        }
        line.push_str(&cells.join(" | "));

        match row_color(entry.kind) {
            Some(color) if self.use_color => format!("{}{}{}", color, line, RESET),
            _ => line,
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// CSV report: a status column and the source row number, then the cells
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Write the report and return the number of data rows written
    pub fn write<W: Write>(&self, result: &DiffResult, writer: W) -> Result<usize> {
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);

        for entry in result {
            let mut record = vec![entry.kind.to_string(), (entry.source_row + 1).to_string()];
            record.extend((0..entry.row_data.len()).map(|col| cell_text(entry, col)));
            wtr.write_record(&record)
                .map_err(|e| ExcelDiffError::Csv(format!("Failed to write report: {}", e)))?;
        }

        wtr.flush()?;
        Ok(result.len())
    }
}

/// Background fill (`0xRRGGBB`) of column `col` of `entry` in the xlsx report
pub fn fill_color(entry: &RowDiff, col: usize) -> Option<u32> {
    match entry.kind {
        DiffKind::Identical => None,
        DiffKind::Modified => entry.is_column_modified(col).then_some(FILL_MODIFIED),
        DiffKind::Removed => Some(FILL_REMOVED),
        DiffKind::Added => Some(FILL_ADDED),
    }
}

/// Report column widths: the longest value plus two, capped at 50
pub fn column_widths(result: &DiffResult) -> Vec<f64> {
    let columns = result.iter().map(|e| e.row_data.len()).max().unwrap_or(0);
    let mut longest = vec![0usize; columns];
    for entry in result {
        for (col, cell) in entry.row_data.iter().enumerate() {
            longest[col] = longest[col].max(cell.to_string().chars().count());
        }
    }

    longest
        .into_iter()
        .map(|len| (len + 2).min(MAX_COLUMN_WIDTH) as f64)
        .collect()
}

/// Colored workbook report with a single `Diff` sheet.
///
/// Each entry is written on the sheet row matching its index. Cells keep
/// their new value and type; modified cells are filled red, removed rows
/// yellow and added rows orange.
#[cfg(feature = "excel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

#[cfg(feature = "excel")]
impl XlsxRenderer {
    pub const SHEET_NAME: &'static str = "Diff";

    pub fn new() -> Self {
        Self
    }

    /// Save the report to `path` and return the number of rows written
    pub fn write(&self, result: &DiffResult, path: &Path) -> Result<usize> {
        let mut workbook = self.build(result)?;
        workbook
            .save(path)
            .map_err(|e| xlsx_error(&format!("Failed to save {}", path.display()), e))?;
        Ok(result.len())
    }

    /// The report as xlsx file contents
    pub fn to_buffer(&self, result: &DiffResult) -> Result<Vec<u8>> {
        let mut workbook = self.build(result)?;
        workbook
            .save_to_buffer()
            .map_err(|e| xlsx_error("Failed to build workbook", e))
    }

    fn build(&self, result: &DiffResult) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook
            .add_worksheet()
            .set_name(Self::SHEET_NAME)
            .map_err(|e| xlsx_error("Failed to create sheet", e))?;

        for entry in result {
            let row = u32::try_from(entry.index).map_err(|_| {
                ExcelDiffError::Workbook(format!("Row {} does not fit in a sheet", entry.index))
            })?;

            for (col, cell) in entry.row_data.iter().enumerate() {
                let format = fill_color(entry, col)
                    .map(|rgb| Format::new().set_background_color(Color::RGB(rgb)));
                let col = sheet_column(col)?;
                write_cell(worksheet, row, col, cell, format.as_ref())
                    .map_err(|e| xlsx_error(&format!("Failed to write row {}", row + 1), e))?;
            }
        }

        for (col, width) in column_widths(result).into_iter().enumerate() {
            worksheet
                .set_column_width(sheet_column(col)?, width)
                .map_err(|e| xlsx_error("Failed to set column width", e))?;
        }

        Ok(workbook)
    }
}

#[cfg(feature = "excel")]
fn sheet_column(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| ExcelDiffError::Workbook(format!("Column {} does not fit in a sheet", col)))
}

#[cfg(feature = "excel")]
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: Option<&Format>,
) -> std::result::Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {
            // Unformatted blanks are simply left out
            if let Some(format) = format {
                worksheet.write_blank(row, col, format)?;
            }
            Ok(())
        }
        CellValue::Bool(b) => write_value(worksheet, row, col, *b, format),
        CellValue::Number(n) if n.is_finite() => write_value(worksheet, row, col, *n, format),
        other => write_value(worksheet, row, col, other.to_string(), format),
    }
}

#[cfg(feature = "excel")]
fn write_value<T: IntoExcelData>(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: T,
    format: Option<&Format>,
) -> std::result::Result<(), XlsxError> {
    match format {
        Some(format) => worksheet.write_with_format(row, col, value, format)?,
        None => worksheet.write(row, col, value)?,
    };
    Ok(())
}

#[cfg(feature = "excel")]
fn xlsx_error(context: &str, e: XlsxError) -> ExcelDiffError {
    ExcelDiffError::Workbook(format!("{}: {}", context, e))
}

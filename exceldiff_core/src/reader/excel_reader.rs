use super::{has_extension, SheetReader};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use exceldiff_common::{CellValue, ExcelDiffError, Result, Row};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reader for spreadsheet workbooks, backed by calamine
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelReader;

impl ExcelReader {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, path: &Path) -> Result<Sheets<BufReader<File>>> {
        if !self.supports(path) {
            return Err(ExcelDiffError::UnsupportedFormat(path.display().to_string()));
        }

        open_workbook_auto(path).map_err(|e| {
            ExcelDiffError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })
    }
}

impl SheetReader for ExcelReader {
    fn name(&self) -> &'static str {
        "excel"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, EXCEL_EXTENSIONS)
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        let workbook = self.open(path)?;
        Ok(workbook.sheet_names().to_vec())
    }

    fn read(&self, path: &Path, sheet: Option<&str>) -> Result<Vec<Row>> {
        let mut workbook = self.open(path)?;
        let sheet_names = workbook.sheet_names().to_vec();

        let sheet_name = match sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(ExcelDiffError::SheetNotFound {
                        sheet: name.to_string(),
                        available: sheet_names,
                    });
                }
                name.to_string()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ExcelDiffError::EmptyWorkbook(path.display().to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            ExcelDiffError::Workbook(format!(
                "Failed to read sheet '{}' from {}: {}",
                sheet_name,
                path.display(),
                e
            ))
        })?;

        Ok(range_to_rows(&range))
    }
}

/// Rows of `range` anchored at cell A1.
///
/// calamine trims the range to the used area; the rows and columns before it
/// are filled with blanks so positions line up with the sheet.
fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let (first_row, first_col) = match range.start() {
        Some(start) => start,
        None => return Vec::new(),
    };
    let first_row = first_row as usize;
    let first_col = first_col as usize;
    let width = first_col + range.width();

    let mut rows: Vec<Row> = (0..first_row).map(|_| vec![CellValue::Empty; width]).collect();
    for cells in range.rows() {
        let mut row = vec![CellValue::Empty; first_col];
        row.extend(cells.iter().map(cell_value));
        rows.push(row);
    }
    rows
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ReaderRegistry;
    use crate::WorksheetDiffEngine;
    use calamine::CellErrorType;
    use exceldiff_common::DiffKind;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // Two-sheet workbook: Q1 holds typed cells, Q2 holds text only
    fn quarterly_workbook(dir: &Path) -> PathBuf {
        let path = dir.join("quarters.xlsx");
        let mut workbook = Workbook::new();

        let q1 = workbook.add_worksheet().set_name("Q1").unwrap();
        q1.write_string(0, 0, "id").unwrap();
        q1.write_string(0, 1, "name").unwrap();
        q1.write_string(0, 2, "active").unwrap();
        q1.write_number(1, 0, 1).unwrap();
        q1.write_string(1, 1, "Alice").unwrap();
        q1.write_boolean(1, 2, true).unwrap();

        let q2 = workbook.add_worksheet().set_name("Q2").unwrap();
        q2.write_string(0, 0, "region").unwrap();
        q2.write_string(1, 0, "north").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    fn single_cell_workbook(path: &Path, write: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "id").unwrap();
        write(sheet);
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_supports() {
        let reader = ExcelReader::new();
        assert!(reader.supports(Path::new("data.xlsx")));
        assert!(reader.supports(Path::new("data.XLSX")));
        assert!(reader.supports(Path::new("data.xls")));
        assert!(reader.supports(Path::new("data.xlsm")));
        assert!(reader.supports(Path::new("data.xlsb")));
        assert!(reader.supports(Path::new("data.ods")));
        assert!(!reader.supports(Path::new("data.txt")));
        assert!(!reader.supports(Path::new("data.csv")));
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::String("x".to_string())),
            CellValue::text("x")
        );
        assert_eq!(cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(cell_value(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(
            cell_value(&Data::Error(CellErrorType::Div0)),
            CellValue::text("#DIV/0!")
        );
    }

    #[test]
    fn test_range_anchored_at_a1() {
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("id".to_string()));
        range.set_value((1, 2), Data::String("name".to_string()));
        range.set_value((2, 1), Data::Int(1));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![CellValue::Empty; 3]);
        assert_eq!(
            rows[1],
            vec![CellValue::Empty, CellValue::text("id"), CellValue::text("name")]
        );
        assert_eq!(
            rows[2],
            vec![CellValue::Empty, CellValue::Number(1.0), CellValue::Empty]
        );
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_rows(&range).is_empty());
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = ExcelReader::new()
            .read(Path::new("notes.txt"), None)
            .unwrap_err();
        assert!(matches!(err, ExcelDiffError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_workbook() {
        let err = ExcelReader::new()
            .sheet_names(Path::new("/nonexistent/dir/book.xlsx"))
            .unwrap_err();
        assert!(matches!(err, ExcelDiffError::Workbook(_)));
    }

    #[test]
    fn test_read_first_sheet_by_default() {
        let temp = TempDir::new().unwrap();
        let path = quarterly_workbook(temp.path());

        let rows = ExcelReader::new().read(&path, None).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![
                    CellValue::text("id"),
                    CellValue::text("name"),
                    CellValue::text("active")
                ],
                vec![
                    CellValue::Number(1.0),
                    CellValue::text("Alice"),
                    CellValue::Bool(true)
                ],
            ]
        );
    }

    #[test]
    fn test_read_named_sheet() {
        let temp = TempDir::new().unwrap();
        let path = quarterly_workbook(temp.path());
        let reader = ExcelReader::new();

        assert_eq!(
            reader.sheet_names(&path).unwrap(),
            vec!["Q1".to_string(), "Q2".to_string()]
        );
        let rows = reader.read(&path, Some("Q2")).unwrap();
        assert_eq!(
            rows,
            vec![vec![CellValue::text("region")], vec![CellValue::text("north")]]
        );
    }

    #[test]
    fn test_missing_sheet_lists_available() {
        let temp = TempDir::new().unwrap();
        let path = quarterly_workbook(temp.path());

        let err = ExcelReader::new().read(&path, Some("Q3")).unwrap_err();
        match err {
            ExcelDiffError::SheetNotFound { sheet, available } => {
                assert_eq!(sheet, "Q3");
                assert_eq!(available, vec!["Q1".to_string(), "Q2".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_registry_loads_workbook() {
        let temp = TempDir::new().unwrap();
        let path = quarterly_workbook(temp.path());

        let loaded = ReaderRegistry::default().load(&path, None).unwrap();
        assert_eq!(loaded.sheet_name, "Q1");
        assert_eq!(loaded.rows.len(), 2);
    }

    #[test]
    fn test_number_and_numeric_text_differ() {
        let temp = TempDir::new().unwrap();
        let left = temp.path().join("left.xlsx");
        let right = temp.path().join("right.xlsx");
        single_cell_workbook(&left, |sheet| {
            sheet.write_number(0, 1, 1).unwrap();
        });
        single_cell_workbook(&right, |sheet| {
            sheet.write_string(0, 1, "1").unwrap();
        });

        let reader = ExcelReader::new();
        let a = reader.read(&left, None).unwrap();
        let b = reader.read(&right, None).unwrap();
        assert_eq!(a[0][1], CellValue::Number(1.0));
        assert_eq!(b[0][1], CellValue::text("1"));

        let entries = WorksheetDiffEngine::new().compare(&a, &b);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Modified);
        assert_eq!(entries[0].modified_columns, vec![1]);
    }

    #[test]
    fn test_leading_blanks_kept_from_workbook() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("offset.xlsx");
        let mut workbook = Workbook::new();
        workbook
            .add_worksheet()
            .write_string(1, 1, "total")
            .unwrap();
        workbook.save(&path).unwrap();

        let rows = ExcelReader::new().read(&path, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![CellValue::Empty; 2]);
        assert_eq!(rows[1], vec![CellValue::Empty, CellValue::text("total")]);
    }
}

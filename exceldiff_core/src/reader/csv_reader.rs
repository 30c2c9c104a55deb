use super::{has_extension, SheetReader};
use csv::ReaderBuilder;
use exceldiff_common::{CellValue, ExcelDiffError, Result, Row};
use std::path::Path;

/// Reader for delimited text files.
///
/// The whole file is one sheet named after the file stem. Fields are kept as
/// text with no numeric parsing; an empty field is a blank cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader;

impl CsvReader {
    pub fn new() -> Self {
        Self
    }

    fn delimiter(path: &Path) -> u8 {
        if has_extension(path, &["tsv"]) {
            b'\t'
        } else {
            b','
        }
    }
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn csv_cell(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::text(field)
    }
}

impl SheetReader for CsvReader {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["csv", "tsv"])
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        Ok(vec![sheet_name(path)])
    }

    fn read(&self, path: &Path, sheet: Option<&str>) -> Result<Vec<Row>> {
        let name = sheet_name(path);
        if let Some(requested) = sheet {
            if requested != name {
                return Err(ExcelDiffError::SheetNotFound {
                    sheet: requested.to_string(),
                    available: vec![name],
                });
            }
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(Self::delimiter(path))
            .from_path(path)
            .map_err(|e| {
                ExcelDiffError::Csv(format!("Failed to open {}: {}", path.display(), e))
            })?;

        let mut rows: Vec<Row> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| {
                ExcelDiffError::Csv(format!("Failed to read {}: {}", path.display(), e))
            })?;
            rows.push(record.iter().map(csv_cell).collect());
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn create_temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_all_rows_including_header() {
        let file = create_temp_file(".csv", "id,name\n1,Alice\n2,Bob\n");
        let rows = CsvReader::new().read(file.path(), None).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![CellValue::text("id"), CellValue::text("name")]);
        assert_eq!(rows[2][1], CellValue::text("Bob"));
    }

    #[test]
    fn test_numbers_stay_text_and_blanks_are_empty() {
        let file = create_temp_file(".csv", "1,,x\n");
        let rows = CsvReader::new().read(file.path(), None).unwrap();
        assert_eq!(
            rows[0],
            vec![CellValue::text("1"), CellValue::Empty, CellValue::text("x")]
        );
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let file = create_temp_file(".csv", "a,b,c\nd\n");
        let rows = CsvReader::new().read(file.path(), None).unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_tsv_delimiter() {
        let file = create_temp_file(".tsv", "a\tb,c\n");
        let rows = CsvReader::new().read(file.path(), None).unwrap();
        assert_eq!(rows[0], vec![CellValue::text("a"), CellValue::text("b,c")]);
    }

    #[test]
    fn test_unknown_sheet_name() {
        let file = create_temp_file(".csv", "a\n");
        let err = CsvReader::new()
            .read(file.path(), Some("Sheet2"))
            .unwrap_err();
        assert!(matches!(err, ExcelDiffError::SheetNotFound { .. }));
    }

    #[test]
    fn test_sheet_name_is_file_stem() {
        let names = CsvReader::new()
            .sheet_names(Path::new("/tmp/q3_report.csv"))
            .unwrap();
        assert_eq!(names, vec!["q3_report".to_string()]);
    }

    #[test]
    fn test_supports() {
        let reader = CsvReader::new();
        assert!(reader.supports(Path::new("data.csv")));
        assert!(reader.supports(Path::new("data.TSV")));
        assert!(!reader.supports(Path::new("data.xlsx")));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvReader::new()
            .read(Path::new("/nonexistent/dir/none.csv"), None)
            .unwrap_err();
        assert!(matches!(err, ExcelDiffError::Csv(_)));
    }
}

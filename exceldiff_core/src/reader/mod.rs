//! Source loaders that turn a container file into rows of scalar cells.

mod csv_reader;
#[cfg(feature = "excel")]
mod excel_reader;

pub use csv_reader::CsvReader;
#[cfg(feature = "excel")]
pub use excel_reader::ExcelReader;

use exceldiff_common::{ExcelDiffError, Result, Row};
use std::path::Path;

/// A loader for one family of tabular file formats
pub trait SheetReader: Send + Sync {
    /// Short human readable name of the format family
    fn name(&self) -> &'static str;

    /// Whether this reader handles `path`, judged by its extension
    fn supports(&self, path: &Path) -> bool;

    /// Names of the sheets in the file, in workbook order
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>>;

    /// Read every row of `sheet`, or of the first sheet when `sheet` is `None`
    fn read(&self, path: &Path, sheet: Option<&str>) -> Result<Vec<Row>>;
}

/// Rows read from one sheet, along with the name of the sheet they came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSheet {
    pub sheet_name: String,
    pub rows: Vec<Row>,
}

/// Picks a reader for a file by extension
pub struct ReaderRegistry {
    readers: Vec<Box<dyn SheetReader>>,
}

impl ReaderRegistry {
    /// A registry with no readers
    pub fn empty() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    pub fn register(&mut self, reader: impl SheetReader + 'static) {
        self.readers.push(Box::new(reader));
    }

    pub fn supports(&self, path: &Path) -> bool {
        self.readers.iter().any(|r| r.supports(path))
    }

    pub fn reader_for(&self, path: &Path) -> Result<&dyn SheetReader> {
        self.readers
            .iter()
            .find(|r| r.supports(path))
            .map(|r| r.as_ref())
            .ok_or_else(|| ExcelDiffError::UnsupportedFormat(path.display().to_string()))
    }

    /// Read `sheet` (or the first sheet) from `path`, resolving the sheet name
    pub fn load(&self, path: &Path, sheet: Option<&str>) -> Result<LoadedSheet> {
        let reader = self.reader_for(path)?;
        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => reader
                .sheet_names(path)?
                .into_iter()
                .next()
                .ok_or_else(|| ExcelDiffError::EmptyWorkbook(path.display().to_string()))?,
        };

        let rows = reader.read(path, Some(&sheet_name))?;
        Ok(LoadedSheet { sheet_name, rows })
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "excel")]
        registry.register(ExcelReader::new());
        registry.register(CsvReader::new());
        registry
    }
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    if let Some(ext) = path.extension() {
        let ext = ext.to_string_lossy().to_lowercase();
        extensions.contains(&ext.as_str())
    } else {
        false
    }
}

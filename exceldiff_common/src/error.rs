use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExcelDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Sheet '{sheet}' not found. Available sheets: {}", .available.join(", "))]
    SheetNotFound { sheet: String, available: Vec<String> },

    #[error("Workbook contains no sheets: {0}")]
    EmptyWorkbook(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ExcelDiffError>;

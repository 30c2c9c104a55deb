use serde::{Deserialize, Serialize};
use std::fmt;

/// Default similarity ratio at or above which two rows are reported as one modified row
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.5;

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell, also used to pad short rows
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// An ordered sequence of cells at one position in a dataset
pub type Row = Vec<CellValue>;

/// Classification of one logical row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Row is the same in both datasets
    Identical,
    /// Row exists in both datasets with some cells changed
    Modified,
    /// Row only exists in the first dataset
    Removed,
    /// Row only exists in the second dataset
    Added,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Identical => "identical",
            DiffKind::Modified => "modified",
            DiffKind::Removed => "removed",
            DiffKind::Added => "added",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified unit of comparison output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDiff {
    /// Position in the report, unique and increasing
    pub index: usize,
    /// Row position in the input datasets this entry came from
    pub source_row: usize,
    pub kind: DiffKind,
    /// New row for modified/added entries, original row otherwise
    pub row_data: Row,
    /// Row before modification (modified entries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_row_data: Option<Row>,
    /// Differing column indices (modified entries only), ascending
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified_columns: Vec<usize>,
}

impl RowDiff {
    pub fn identical(index: usize, source_row: usize, row: Row) -> Self {
        Self::single(index, source_row, DiffKind::Identical, row)
    }

    pub fn removed(index: usize, source_row: usize, row: Row) -> Self {
        Self::single(index, source_row, DiffKind::Removed, row)
    }

    pub fn added(index: usize, source_row: usize, row: Row) -> Self {
        Self::single(index, source_row, DiffKind::Added, row)
    }

    pub fn modified(
        index: usize,
        source_row: usize,
        original: Row,
        new: Row,
        modified_columns: Vec<usize>,
    ) -> Self {
        Self {
            index,
            source_row,
            kind: DiffKind::Modified,
            row_data: new,
            original_row_data: Some(original),
            modified_columns,
        }
    }

    fn single(index: usize, source_row: usize, kind: DiffKind, row: Row) -> Self {
        Self {
            index,
            source_row,
            kind,
            row_data: row,
            original_row_data: None,
            modified_columns: Vec::new(),
        }
    }

    pub fn is_column_modified(&self, col: usize) -> bool {
        self.modified_columns.binary_search(&col).is_ok()
    }
}

/// Per-kind counts over a classified sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub identical: usize,
    pub modified: usize,
    pub removed: usize,
    pub added: usize,
}

impl DiffSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a RowDiff>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.record(entry.kind);
        }
        summary
    }

    pub fn record(&mut self, kind: DiffKind) {
        match kind {
            DiffKind::Identical => self.identical += 1,
            DiffKind::Modified => self.modified += 1,
            DiffKind::Removed => self.removed += 1,
            DiffKind::Added => self.added += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.identical + self.modified + self.removed + self.added
    }

    pub fn has_differences(&self) -> bool {
        self.modified + self.removed + self.added > 0
    }
}

/// Ordered report produced by one comparison run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    summary: DiffSummary,
    entries: Vec<RowDiff>,
}

impl DiffResult {
    /// `summary` describes the full classified sequence, before any filtering
    pub fn new(entries: Vec<RowDiff>, summary: DiffSummary) -> Self {
        Self { summary, entries }
    }

    pub fn entries(&self) -> &[RowDiff] {
        &self.entries
    }

    pub fn summary(&self) -> DiffSummary {
        self.summary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowDiff> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<RowDiff> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a RowDiff;
    type IntoIter = std::slice::Iter<'a, RowDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Options controlling matching and report shaping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    /// Drop identical rows from the report
    pub diff_only: bool,
    /// Prepend the first row of the baseline when `diff_only` is set
    pub include_header: bool,
    /// Minimum share of equal columns for two rows to count as one modified row
    pub match_threshold: f64,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self {
            diff_only: false,
            include_header: false,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_diff_only(mut self, diff_only: bool) -> Self {
        self.diff_only = diff_only;
        self
    }

    pub fn with_include_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// Values outside `[0, 1]` are clamped; NaN falls back to the default
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = if threshold.is_nan() {
            DEFAULT_MATCH_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Similarity ratio for treating two rows as one modified row
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Report only rows with differences
    #[serde(default)]
    pub diff_only: bool,

    /// Keep the header row in diff-only reports
    #[serde(default = "default_true")]
    pub include_header: bool,

    /// Colorize terminal output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            diff_only: false,
            include_header: true,
            color: true,
        }
    }
}

impl AppConfig {
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions::new()
            .with_diff_only(self.diff_only)
            .with_include_header(self.diff_only && self.include_header)
            .with_match_threshold(self.match_threshold)
    }
}

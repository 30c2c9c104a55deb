//! Width normalization for positional row comparison.

use exceldiff_common::{CellValue, Row};

/// Pad (with [`CellValue::Empty`]) or truncate a copy of `row` to exactly `width` cells
pub fn normalize_row(row: &[CellValue], width: usize) -> Row {
    let mut normalized: Row = row.iter().take(width).cloned().collect();
    normalized.resize(width, CellValue::Empty);
    normalized
}

/// Copies of both rows padded at the tail to the wider of the two
pub fn normalize_pair(left: &[CellValue], right: &[CellValue]) -> (Row, Row) {
    let width = left.len().max(right.len());
    (normalize_row(left, width), normalize_row(right, width))
}

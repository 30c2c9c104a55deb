//! Turns matcher decisions into numbered [`RowDiff`] entries.

use crate::matcher::{MatchDecision, RowMatch, RowMatcher, RowPair};
use exceldiff_common::{CellValue, RowDiff};

/// Numbers entries in merged-report order.
///
/// The only state carried between positions is the index counter, so a
/// removed/added pair takes two consecutive indices and everything after it
/// shifts by one.
#[derive(Debug, Default)]
pub struct DiffClassifier {
    next_index: usize,
}

impl DiffClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries emitted so far
    pub fn emitted(&self) -> usize {
        self.next_index
    }

    /// Classify the rows at `source_row` and append the resulting entries to `out`
    pub fn classify(
        &mut self,
        matcher: &RowMatcher,
        source_row: usize,
        pair: RowPair<'_>,
        out: &mut Vec<RowDiff>,
    ) {
        match pair {
            RowPair::LeftOnly(row) => {
                let index = self.take_index();
                out.push(RowDiff::removed(index, source_row, row.to_vec()));
            }
            RowPair::RightOnly(row) => {
                let index = self.take_index();
                out.push(RowDiff::added(index, source_row, row.to_vec()));
            }
            RowPair::Both(left, right) => {
                let row_match = matcher.match_rows(left, right);
                self.classify_match(source_row, left, right, row_match, out);
            }
        }
    }

    fn classify_match(
        &mut self,
        source_row: usize,
        left: &[CellValue],
        right: &[CellValue],
        row_match: RowMatch,
        out: &mut Vec<RowDiff>,
    ) {
        match row_match.decision {
            MatchDecision::Identical => {
                let index = self.take_index();
                out.push(RowDiff::identical(index, source_row, left.to_vec()));
            }
            MatchDecision::Modified(columns) => {
                let index = self.take_index();
                out.push(RowDiff::modified(
                    index,
                    source_row,
                    row_match.left,
                    row_match.right,
                    columns,
                ));
            }
            MatchDecision::Unrelated => {
                let removed = self.take_index();
                out.push(RowDiff::removed(removed, source_row, left.to_vec()));
                let added = self.take_index();
                out.push(RowDiff::added(added, source_row, right.to_vec()));
            }
        }
    }

    fn take_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }
}

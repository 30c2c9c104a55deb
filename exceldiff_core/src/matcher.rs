//! Positional row alignment and the similarity heuristic that decides
//! whether two rows at the same position are one edited row or two
//! unrelated ones.

use crate::comparator::CellComparator;
use crate::normalize::normalize_pair;
use exceldiff_common::{CellValue, Row, DEFAULT_MATCH_THRESHOLD};

/// The rows found at one logical position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowPair<'a> {
    /// Baseline has a row here, comparison has run out
    LeftOnly(&'a [CellValue]),
    /// Comparison has a row here, baseline has run out
    RightOnly(&'a [CellValue]),
    Both(&'a [CellValue], &'a [CellValue]),
}

/// Pair up rows strictly by position.
///
/// Row `i` of `left` is only ever paired with row `i` of `right`; there is
/// no search for a better match elsewhere.
pub fn align<'a>(
    left: &'a [Row],
    right: &'a [Row],
) -> impl Iterator<Item = (usize, RowPair<'a>)> + 'a {
    let positions = left.len().max(right.len());
    (0..positions).map(move |i| {
        let pair = match (left.get(i), right.get(i)) {
            (Some(a), Some(b)) => RowPair::Both(a, b),
            (Some(a), None) => RowPair::LeftOnly(a),
            (None, Some(b)) => RowPair::RightOnly(b),
            (None, None) => unreachable!(),
        };
        (i, pair)
    })
}

/// Verdict for two rows sharing a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    Identical,
    /// Same logical row; holds the differing column indices in ascending order
    Modified(Vec<usize>),
    /// Too dissimilar to be the same row
    Unrelated,
}

/// Column-wise comparison of two rows after width normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatch {
    pub left: Row,
    pub right: Row,
    pub equal_columns: usize,
    pub ratio: f64,
    pub decision: MatchDecision,
}

impl RowMatch {
    pub fn width(&self) -> usize {
        self.left.len()
    }
}

/// Fraction of compared columns that are equal; a zero-width comparison counts as a full match
pub fn match_ratio(equal_columns: usize, width: usize) -> f64 {
    if width == 0 {
        1.0
    } else {
        equal_columns as f64 / width as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RowMatcher {
    comparator: CellComparator,
    threshold: f64,
}

impl RowMatcher {
    pub fn new() -> Self {
        Self {
            comparator: CellComparator::new(),
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Ratio at or above which a partially equal pair is one modified row
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_comparator(mut self, comparator: CellComparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn match_rows(&self, left: &[CellValue], right: &[CellValue]) -> RowMatch {
        let (left, right) = normalize_pair(left, right);

        let differing: Vec<usize> = left
            .iter()
            .zip(right.iter())
            .enumerate()
            .filter(|(_, (a, b))| !self.comparator.equal(a, b))
            .map(|(col, _)| col)
            .collect();

        let width = left.len();
        let equal_columns = width - differing.len();
        let ratio = match_ratio(equal_columns, width);

        // Decide on the column count rather than the float so a full match is exact
        let decision = if differing.is_empty() {
            MatchDecision::Identical
        } else if ratio >= self.threshold {
            MatchDecision::Modified(differing)
        } else {
            MatchDecision::Unrelated
        };

        RowMatch {
            left,
            right,
            equal_columns,
            ratio,
            decision,
        }
    }
}

impl Default for RowMatcher {
    fn default() -> Self {
        Self::new()
    }
}

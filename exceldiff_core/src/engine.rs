//! Runs normalize, match, classify and aggregate over a pair of sheets.

use crate::aggregator::aggregate;
use crate::classifier::DiffClassifier;
use crate::comparator::CellComparator;
use crate::matcher::{align, RowMatcher};
use exceldiff_common::{DiffOptions, DiffResult, Row, RowDiff};
use tracing::debug;

/// Engine for comparing two worksheets row by row.
///
/// Each call is a pure function of its two inputs, so a single engine can be
/// shared freely between threads.
#[derive(Debug, Clone)]
pub struct WorksheetDiffEngine {
    options: DiffOptions,
    matcher: RowMatcher,
}

impl WorksheetDiffEngine {
    pub fn new() -> Self {
        Self::with_options(DiffOptions::default())
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self {
            options,
            matcher: RowMatcher::new().with_threshold(options.match_threshold),
        }
    }

    pub fn with_comparator(mut self, comparator: CellComparator) -> Self {
        self.matcher = self.matcher.with_comparator(comparator);
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Classify every position of `baseline` against `comparison`, unfiltered
    pub fn compare(&self, baseline: &[Row], comparison: &[Row]) -> Vec<RowDiff> {
        let mut classifier = DiffClassifier::new();
        let mut entries = Vec::with_capacity(baseline.len().max(comparison.len()));

        for (position, pair) in align(baseline, comparison) {
            classifier.classify(&self.matcher, position, pair, &mut entries);
        }

        debug!(
            "Classified {} baseline rows against {} comparison rows into {} entries",
            baseline.len(),
            comparison.len(),
            classifier.emitted()
        );

        entries
    }

    /// Compare and shape the report according to the engine's options
    pub fn diff(&self, baseline: &[Row], comparison: &[Row]) -> DiffResult {
        let entries = self.compare(baseline, comparison);
        let header = baseline.first().map(|row| row.as_slice());
        let result = aggregate(entries, header, &self.options);

        let summary = result.summary();
        debug!(
            identical = summary.identical,
            modified = summary.modified,
            removed = summary.removed,
            added = summary.added,
            reported = result.len(),
            "Diff complete"
        );

        result
    }
}

impl Default for WorksheetDiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

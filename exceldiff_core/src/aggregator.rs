//! Shapes the classified sequence into the final report.

use exceldiff_common::{CellValue, DiffKind, DiffOptions, DiffResult, DiffSummary, RowDiff};

/// Build the report from the full classified sequence.
///
/// `header` is the first row of the baseline dataset, if it has one. It is
/// only used when both `diff_only` and `include_header` are set, in which
/// case it is prepended verbatim as an identical entry no matter how that
/// row was classified.
///
/// Filtered reports are renumbered so `index` stays the entry's position in
/// the report; `source_row` still points back at the input rows.
pub fn aggregate(
    entries: Vec<RowDiff>,
    header: Option<&[CellValue]>,
    options: &DiffOptions,
) -> DiffResult {
    let summary = DiffSummary::from_entries(&entries);

    if !options.diff_only {
        return DiffResult::new(entries, summary);
    }

    let header_entry = header
        .filter(|_| options.include_header)
        .map(|row| RowDiff::identical(0, 0, row.to_vec()));

    let report: Vec<RowDiff> = header_entry
        .into_iter()
        .chain(entries.into_iter().filter(|e| e.kind != DiffKind::Identical))
        .enumerate()
        .map(|(index, entry)| RowDiff { index, ..entry })
        .collect();

    DiffResult::new(report, summary)
}

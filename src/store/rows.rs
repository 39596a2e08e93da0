//! Conversion of raw spreadsheet rows into [`TermRecord`]s.
//!
//! # Error Handling Strategy
//!
//! Backends hand over one [`RawRow`] per sheet row. A row the backend could not
//! decode (a cell error such as `#N/A`, invalid UTF-8) arrives as `Err` and is
//! logged and skipped; one bad row never fails a load. Blank rows are dropped
//! silently. Rows with an empty source term are passed through so the index can
//! count them as skipped.

use tracing::{debug, warn};

use crate::models::TermRecord;

/// Column labels expected in the header row.
pub const EXPECTED_HEADER: [&str; 3] = ["Source Term", "Target Term", "Notes"];

/// Cells of one row (`None` = empty cell), or the reason the row is unreadable.
pub type RawRow = Result<Vec<Option<String>>, String>;

/// Turn backend rows (header first) into records.
pub fn records_from_rows<I>(rows: I, resource: &str) -> Vec<TermRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut rows = rows.into_iter();
    let mut records = Vec::new();
    let mut malformed = 0usize;

    match rows.next() {
        Some(Ok(header)) => check_header(&header, resource),
        Some(Err(reason)) => warn!(resource, %reason, "Unreadable header row"),
        None => {
            debug!(resource, "Termbase source is empty");
            return records;
        }
    }

    for (offset, row) in rows.enumerate() {
        // Spreadsheet row number: header is row 1
        let row_num = offset + 2;
        match row {
            Ok(cells) => {
                if cells.iter().all(|c| is_blank(c.as_deref())) {
                    continue;
                }
                records.push(TermRecord::from_cells(
                    cell(&cells, 0),
                    cell(&cells, 1),
                    cell(&cells, 2),
                ));
            }
            Err(reason) => {
                warn!(resource, row = row_num, %reason, "Skipping malformed termbase row");
                malformed += 1;
            }
        }
    }

    if malformed > 0 {
        warn!(resource, malformed, loaded = records.len(), "Some termbase rows were skipped");
    }

    records
}

fn cell(cells: &[Option<String>], idx: usize) -> Option<&str> {
    cells.get(idx).and_then(|c| c.as_deref())
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Warn when the header labels differ from the expected schema. The header row is
/// skipped either way.
fn check_header(header: &[Option<String>], resource: &str) {
    let matches = EXPECTED_HEADER.iter().enumerate().all(|(idx, expected)| {
        cell(header, idx)
            .map(|label| label.trim_start_matches('\u{feff}').trim())
            .is_some_and(|label| label.eq_ignore_ascii_case(expected))
    });

    if !matches {
        let found: Vec<&str> = header.iter().take(3).map(|c| c.as_deref().unwrap_or("")).collect();
        warn!(
            resource,
            ?found,
            expected = ?EXPECTED_HEADER,
            "Unexpected header row; treating columns as source, target, notes"
        );
    }
}

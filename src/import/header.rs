//! Header discovery and column mapping for heterogeneous brokerage exports.
//!
//! Exports routinely open with account metadata rows before the real header,
//! and column order is arbitrary, so the header row is searched for rather
//! than assumed.

use super::sheet::{Cell, Sheet};
use super::ImportError;

/// How deep into the sheet the header search goes.
pub const HEADER_SCAN_ROWS: usize = 20;

/// Semantic column indices resolved from a header row.
///
/// Only `symbol` is guaranteed; everything else degrades gracefully when the
/// export lacks the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub symbol: usize,
    pub date: Option<usize>,
    pub activity: Option<usize>,
    pub description: Option<usize>,
    pub quantity: Option<usize>,
    pub price: Option<usize>,
    pub amount: Option<usize>,
}

/// Where the header row sits and what its columns mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLocation {
    /// Zero-based index of the header row within the sheet.
    pub row: usize,
    pub columns: ColumnMap,
}

fn normalized(cell: &Cell) -> String {
    cell.text().to_lowercase()
}

fn is_symbol_header(text: &str) -> bool {
    text == "symbol"
}

fn is_activity_header(text: &str) -> bool {
    // "action" must stand alone as the header label; a substring match would
    // also hit "transaction date".
    text.contains("activity type") || text == "action"
}

/// Locates the header row within the first [`HEADER_SCAN_ROWS`] rows.
///
/// First pass requires both a "Symbol" cell and an activity-type cell; if no
/// row qualifies, the search relaxes to any row containing "Symbol" alone.
/// Nothing found means the file is not interpretable and the whole import
/// aborts before any mutation.
pub fn find_header(sheet: &Sheet) -> Result<HeaderLocation, ImportError> {
    let scanned = sheet.iter().take(HEADER_SCAN_ROWS);

    let mut symbol_only: Option<usize> = None;
    for (row_index, row) in scanned.enumerate() {
        let texts: Vec<String> = row.iter().map(normalized).collect();
        let has_symbol = texts.iter().any(|t| is_symbol_header(t));
        if !has_symbol {
            continue;
        }
        if texts.iter().any(|t| is_activity_header(t)) {
            return Ok(HeaderLocation {
                row: row_index,
                columns: map_columns(row),
            });
        }
        if symbol_only.is_none() {
            symbol_only = Some(row_index);
        }
    }

    if let Some(row_index) = symbol_only {
        return Ok(HeaderLocation {
            row: row_index,
            columns: map_columns(&sheet[row_index]),
        });
    }

    Err(ImportError::NoHeaderRow {
        scanned: sheet.len().min(HEADER_SCAN_ROWS),
    })
}

/// Case-insensitively maps header labels to semantic columns.
fn map_columns(row: &[Cell]) -> ColumnMap {
    let texts: Vec<String> = row.iter().map(normalized).collect();

    let position = |pred: &dyn Fn(&str) -> bool| texts.iter().position(|t| pred(t));

    // Prefer the explicit trade-date headers; settlement/posted dates are a
    // worse source, so a generic "date" match only applies as a fallback.
    let date = position(&|t| t == "transaction date" || t == "trade date")
        .or_else(|| position(&|t| t.contains("date")));

    ColumnMap {
        symbol: position(&is_symbol_header).expect("caller found a symbol header"),
        date,
        activity: position(&|t| is_activity_header(t)),
        description: position(&|t| t.contains("description")),
        quantity: position(&|t| t.contains("quantity")),
        price: position(&|t| t.contains("price")),
        amount: position(&|t| t.contains("amount")),
    }
}

//! Spreadsheet import reconciliation: heterogeneous brokerage exports in,
//! deduplicated holdings and ledger entries out.
//!
//! Parsing and planning never mutate; [`commit_import`] is the only step
//! that writes, and it runs only after explicit confirmation.

mod commit;
mod header;
mod reconcile;
mod sheet;
mod stage;

pub use commit::{commit_import, ImportOutcome};
pub use header::{find_header, ColumnMap, HeaderLocation, HEADER_SCAN_ROWS};
pub use reconcile::{plan_import, ImportPlan, ImportSummary, PlannedHolding, TradeCounts};
pub use sheet::{sheet_from_csv_path, sheet_from_csv_reader, Cell, Sheet};
pub use stage::{
    clean_security_name, parse_trade_date, ActivityVocabulary, SkippedRow, StagedTransaction,
};

/// Parse-time failure that prevents any safe interpretation of the file.
/// Nothing has been mutated when one of these is returned; the user fixes
/// the input and retries.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No header row found in the first {scanned} rows (expected a \"Symbol\" column)")]
    NoHeaderRow { scanned: usize },

    #[error("No importable rows in this file ({skipped} rows skipped)")]
    NothingToImport { skipped: usize },
}

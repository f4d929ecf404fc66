//! The 2-D cell grid the reconciler consumes.
//!
//! File parsing is an edge concern: the csv loader here covers
//! comma-separated exports, and other front-ends (native spreadsheet
//! formats) can build a `Sheet` from whatever parser they use.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// One spreadsheet cell. Brokerage exports mix text and numbers freely, so
/// consumers go through the coercion helpers instead of matching variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Decimal),
}

impl Cell {
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed text content; numbers render via `Display`.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
        }
    }

    /// Numeric coercion with a zero default.
    ///
    /// Text is cleaned of currency noise ("$", thousands separators) and
    /// accounting-style parentheses before parsing; anything unparseable
    /// coerces to zero, matching how optional quantity/price/amount columns
    /// degrade.
    pub fn number(&self) -> Decimal {
        match self {
            Cell::Empty => Decimal::ZERO,
            Cell::Number(n) => *n,
            Cell::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .chars()
                    .filter(|c| !matches!(c, '$' | ',' | ' '))
                    .collect();
                let (cleaned, negated) =
                    match cleaned.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
                        Some(inner) => (inner.to_string(), true),
                        None => (cleaned, false),
                    };
                let value = cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO);
                if negated {
                    -value
                } else {
                    value
                }
            }
        }
    }
}

/// A parsed spreadsheet: rows of cells, arbitrary widths.
pub type Sheet = Vec<Vec<Cell>>;

pub fn row_is_empty(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

/// Reads a comma-separated export into a sheet. Rows may have uneven widths
/// (brokerages pad metadata rows differently), so the reader is flexible and
/// header handling is left to the reconciler.
pub fn sheet_from_csv_path(path: &Path) -> Result<Sheet> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open import file: {}", path.display()))?;
    sheet_from_csv_reader(file)
}

pub fn sheet_from_csv_reader(reader: impl std::io::Read) -> Result<Sheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut sheet = Sheet::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to read a row from the import file")?;
        sheet.push(record.iter().map(Cell::from_raw).collect());
    }
    Ok(sheet)
}

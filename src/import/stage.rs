//! Classifies data rows into staged transactions or recorded skips.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{TradeDate, TradeKind};

use super::header::HeaderLocation;
use super::sheet::{row_is_empty, Cell, Sheet};

/// Maps brokerage activity-type text to ledger trade kinds.
///
/// Kept as configuration rather than parser logic so new brokerage vocab
/// ("reinvested shares", localized labels, ...) is a config edit, not a code
/// change. Lookup is case-insensitive on trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivityVocabulary {
    entries: BTreeMap<String, TradeKind>,
}

// Configured labels go through `insert` so they get the same trim/lowercase
// normalization as built-in ones; a plain transparent derive would store them
// verbatim and `lookup` would never match mixed-case config keys.
impl<'de> Deserialize<'de> for ActivityVocabulary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, TradeKind>::deserialize(deserializer)?;
        let mut vocabulary = Self {
            entries: BTreeMap::new(),
        };
        for (label, kind) in raw {
            vocabulary.insert(label, kind);
        }
        Ok(vocabulary)
    }
}

impl Default for ActivityVocabulary {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("bought".to_string(), TradeKind::Buy);
        entries.insert("sold".to_string(), TradeKind::Sell);
        entries.insert("dividend".to_string(), TradeKind::Dividend);
        entries.insert("qualified dividend".to_string(), TradeKind::Dividend);
        entries.insert("reinvested dividend".to_string(), TradeKind::Dividend);
        Self { entries }
    }
}

impl ActivityVocabulary {
    pub fn lookup(&self, raw: &str) -> Option<TradeKind> {
        self.entries.get(&raw.trim().to_lowercase()).copied()
    }

    pub fn insert(&mut self, label: impl Into<String>, kind: TradeKind) {
        self.entries.insert(label.into().trim().to_lowercase(), kind);
    }
}

/// A validated row ready for reconciliation. Raw cell arrays never cross
/// this boundary into business logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedTransaction {
    pub kind: TradeKind,
    pub date: TradeDate,
    pub shares: Decimal,
    pub price: Decimal,
    pub total: Decimal,
    pub symbol: String,
    /// Human-readable security name derived from the description column.
    pub name: String,
}

/// A data row the import could not use, with the reason surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// One-based row number as the user would see it in their spreadsheet.
    pub row: usize,
    pub reason: String,
}

/// Classifies every data row below the header.
///
/// Fully-empty rows vanish silently; rows without a usable symbol or with an
/// unrecognized activity type are recorded as skips and processing continues.
pub fn stage_rows(
    sheet: &Sheet,
    header: &HeaderLocation,
    vocabulary: &ActivityVocabulary,
) -> (Vec<StagedTransaction>, Vec<SkippedRow>) {
    let mut staged = Vec::new();
    let mut skipped = Vec::new();

    for (index, row) in sheet.iter().enumerate().skip(header.row + 1) {
        if row_is_empty(row) {
            continue;
        }
        let row_number = index + 1;
        let cell = |col: Option<usize>| col.and_then(|c| row.get(c)).cloned().unwrap_or(Cell::Empty);

        let symbol = cell(Some(header.columns.symbol)).text().to_uppercase();
        if is_placeholder_symbol(&symbol) {
            skipped.push(SkippedRow {
                row: row_number,
                reason: "No symbol".to_string(),
            });
            continue;
        }

        let activity = cell(header.columns.activity).text();
        let Some(kind) = vocabulary.lookup(&activity) else {
            skipped.push(SkippedRow {
                row: row_number,
                reason: format!("Unsupported type: {activity}"),
            });
            continue;
        };

        let description = cell(header.columns.description).text();
        // Sells often arrive with negative quantities/amounts; the trade
        // kind already carries the sign.
        staged.push(StagedTransaction {
            kind,
            date: parse_trade_date(&cell(header.columns.date).text()),
            shares: cell(header.columns.quantity).number().abs(),
            price: cell(header.columns.price).number().abs(),
            total: cell(header.columns.amount).number().abs(),
            symbol,
            name: clean_security_name(&description),
        });
    }

    (staged, skipped)
}

fn is_placeholder_symbol(symbol: &str) -> bool {
    symbol.is_empty() || symbol == "--" || symbol.eq_ignore_ascii_case("N/A")
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})$").expect("valid date pattern")
    })
}

/// Parses US-style trade dates (MM/DD/YYYY or MM-DD-YYYY, two-digit years
/// read as 2000s) with ISO passthrough. Anything else is kept verbatim as a
/// raw date rather than rejected, so the row still imports.
pub fn parse_trade_date(raw: &str) -> TradeDate {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return TradeDate::Raw(String::new());
    }

    if let Some(captures) = date_pattern().captures(trimmed) {
        let month: u32 = captures[1].parse().unwrap_or(0);
        let day: u32 = captures[2].parse().unwrap_or(0);
        let mut year: i32 = captures[3].parse().unwrap_or(0);
        if year < 100 {
            year += 2000;
        }
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return TradeDate::Day(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return TradeDate::Day(date);
    }

    TradeDate::Raw(trimmed.to_string())
}

fn boilerplate_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Trailing confirmation / reference numbers.
            r"(?i)\s*#?\d{6,}\s*$",
            // Trade annotations appended by the broker.
            r"(?i)\s*unsolicited\s+trade.*$",
            r"(?i)\s*reinvest(ed|ment)?(\s+(shares|at\s+\S+))?.*$",
            r"(?i)\s*dividend\s+received.*$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid boilerplate pattern"))
        .collect()
    })
}

/// Derives a display name from a free-text description: broker boilerplate
/// is stripped, then shouty all-caps names longer than five characters are
/// title-cased.
pub fn clean_security_name(description: &str) -> String {
    let mut name = description.trim().to_string();
    for pattern in boilerplate_patterns() {
        name = pattern.replace(&name, "").trim().to_string();
    }

    let is_shouting = name.len() > 5
        && name.chars().any(|c| c.is_alphabetic())
        && !name.chars().any(|c| c.is_lowercase());
    if is_shouting {
        name = title_case(&name);
    }
    name
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Groups staged transactions and matches them against existing holdings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Id, Portfolio, TradeKind};

use super::header::find_header;
use super::sheet::Sheet;
use super::stage::{stage_rows, ActivityVocabulary, SkippedRow, StagedTransaction};
use super::ImportError;

/// A symbol the import would create a holding for, with the display name
/// taken from the first staged row encountered for that symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedHolding {
    pub symbol: String,
    pub name: String,
}

/// Everything the import would do, computed without touching the portfolio.
///
/// Commit is a separate, explicitly-confirmed step; a plan can be thrown
/// away at no cost.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    /// Symbols not present in the target portfolio, in first-seen order.
    pub new_holdings: Vec<PlannedHolding>,
    /// Symbols reconciled to holdings already in the portfolio.
    pub matched: BTreeMap<String, Id>,
    pub staged: Vec<StagedTransaction>,
    pub skipped: Vec<SkippedRow>,
}

/// Per-kind transaction counts for the pre-commit summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCounts {
    pub buy: usize,
    pub sell: usize,
    pub dividend: usize,
}

/// What the user reviews before confirming a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub new_holding_count: usize,
    pub transaction_count: usize,
    pub counts_by_type: TradeCounts,
    pub skipped_rows: Vec<SkippedRow>,
}

impl ImportPlan {
    pub fn summary(&self) -> ImportSummary {
        let mut counts = TradeCounts::default();
        for tx in &self.staged {
            match tx.kind {
                TradeKind::Buy => counts.buy += 1,
                TradeKind::Sell => counts.sell += 1,
                TradeKind::Dividend => counts.dividend += 1,
            }
        }
        ImportSummary {
            new_holding_count: self.new_holdings.len(),
            transaction_count: self.staged.len(),
            counts_by_type: counts,
            skipped_rows: self.skipped.clone(),
        }
    }
}

/// Parses a sheet into an import plan against `portfolio`.
///
/// Parse-time failures (no header, nothing importable) abort here, before
/// anything could mutate. Symbols already tracked reconcile to the existing
/// holding's id instead of becoming duplicates.
pub fn plan_import(
    sheet: &Sheet,
    portfolio: &Portfolio,
    vocabulary: &ActivityVocabulary,
) -> Result<ImportPlan, ImportError> {
    let header = find_header(sheet)?;
    let (staged, skipped) = stage_rows(sheet, &header, vocabulary);
    if staged.is_empty() {
        return Err(ImportError::NothingToImport {
            skipped: skipped.len(),
        });
    }

    let mut new_holdings: Vec<PlannedHolding> = Vec::new();
    let mut matched: BTreeMap<String, Id> = BTreeMap::new();
    for tx in &staged {
        if matched.contains_key(&tx.symbol)
            || new_holdings.iter().any(|h| h.symbol == tx.symbol)
        {
            continue;
        }
        match portfolio.holding_by_symbol(&tx.symbol) {
            Some(existing) => {
                matched.insert(tx.symbol.clone(), existing.id.clone());
            }
            None => new_holdings.push(PlannedHolding {
                symbol: tx.symbol.clone(),
                name: if tx.name.is_empty() {
                    tx.symbol.clone()
                } else {
                    tx.name.clone()
                },
            }),
        }
    }

    Ok(ImportPlan {
        new_holdings,
        matched,
        staged,
        skipped,
    })
}

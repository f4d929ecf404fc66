use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Id, IdGenerator, UuidIdGenerator};

/// Kind of ledger entry. Dividends carry cash only and never move position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    Buy,
    Sell,
    Dividend,
}

impl TradeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TradeKind::Buy => "Buy",
            TradeKind::Sell => "Sell",
            TradeKind::Dividend => "Dividend",
        }
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar date of a trade, no time component.
///
/// Brokerage exports occasionally carry dates in formats we cannot interpret;
/// those pass through verbatim as `Raw` rather than being rejected, so the
/// ledger never loses source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeDate {
    Day(NaiveDate),
    Raw(String),
}

impl TradeDate {
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            TradeDate::Day(d) => Some(*d),
            TradeDate::Raw(_) => None,
        }
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDate::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TradeDate::Raw(s) => f.write_str(s),
        }
    }
}

impl From<NaiveDate> for TradeDate {
    fn from(value: NaiveDate) -> Self {
        TradeDate::Day(value)
    }
}

/// An immutable ledger entry affecting one holding.
///
/// Transactions are append-only facts: derived holding fields are never edited
/// directly, only recomputed by replaying the holding's transaction subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    /// References a holding in the same portfolio.
    pub holding_id: Id,
    pub kind: TradeKind,
    pub date: TradeDate,
    /// Share count for Buy/Sell; unused for Dividend.
    pub shares: Decimal,
    /// Per-share price; ignored for Dividend.
    pub price: Decimal,
    /// Cash amount: shares x price for Buy/Sell, the dividend amount itself
    /// for Dividend.
    pub total: Decimal,
}

impl Transaction {
    pub fn new(
        holding_id: Id,
        kind: TradeKind,
        date: impl Into<TradeDate>,
        shares: Decimal,
        price: Decimal,
        total: Decimal,
    ) -> Self {
        Self::new_with_generator(&UuidIdGenerator, holding_id, kind, date, shares, price, total)
    }

    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        holding_id: Id,
        kind: TradeKind,
        date: impl Into<TradeDate>,
        shares: Decimal,
        price: Decimal,
        total: Decimal,
    ) -> Self {
        Self {
            id: ids.new_id(),
            holding_id,
            kind,
            date: date.into(),
            shares,
            price,
            total,
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

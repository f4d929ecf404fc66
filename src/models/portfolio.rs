use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Holding, Id, Transaction};

/// Validation failure raised at the point of user entry. State is never
/// changed when one of these is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("A holding for {symbol} already exists in this portfolio")]
    DuplicateSymbol { symbol: String },

    #[error("Cannot sell {requested} shares of {symbol}: only {held} held")]
    Oversell {
        symbol: String,
        requested: Decimal,
        held: Decimal,
    },

    #[error("No holding with id {id} in this portfolio")]
    UnknownHolding { id: Id },

    #[error("No portfolio exists yet; create one before making changes")]
    PlaceholderWrite,
}

/// A named collection of holdings and their transaction ledger.
///
/// Every transaction's `holding_id` references a holding in the same
/// portfolio. Orphaned transactions can exist only transiently during a
/// holding delete and are filtered out together with the holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::new(),
            name: name.into(),
            holdings: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Synthetic stand-in returned when no real portfolio exists yet.
    /// Carries the sentinel id "0" and must never be written back.
    pub fn placeholder() -> Self {
        Self {
            id: Id::placeholder(),
            name: "My Portfolio".to_string(),
            holdings: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_placeholder()
    }

    pub fn holding(&self, id: &Id) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.id == id)
    }

    pub fn holding_mut(&mut self, id: &Id) -> Option<&mut Holding> {
        self.holdings.iter_mut().find(|h| &h.id == id)
    }

    /// Case-insensitive symbol lookup.
    pub fn holding_by_symbol(&self, symbol: &str) -> Option<&Holding> {
        let wanted = symbol.trim().to_uppercase();
        self.holdings.iter().find(|h| h.symbol == wanted)
    }

    /// Adds a holding, rejecting duplicate symbols within the portfolio.
    pub fn add_holding(&mut self, holding: Holding) -> Result<(), LedgerError> {
        if self.holding_by_symbol(&holding.symbol).is_some() {
            return Err(LedgerError::DuplicateSymbol {
                symbol: holding.symbol,
            });
        }
        self.holdings.push(holding);
        Ok(())
    }

    /// Appends a transaction after validating it against the ledger.
    ///
    /// Sells exceeding the holding's current share count are rejected before
    /// anything is recorded; the caller still has to run recalculation.
    pub fn record_transaction(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        let holding = self
            .holding(&tx.holding_id)
            .ok_or_else(|| LedgerError::UnknownHolding {
                id: tx.holding_id.clone(),
            })?;
        if tx.kind == super::TradeKind::Sell && tx.shares > holding.shares {
            return Err(LedgerError::Oversell {
                symbol: holding.symbol.clone(),
                requested: tx.shares,
                held: holding.shares,
            });
        }
        self.transactions.push(tx);
        Ok(())
    }

    /// Deletes a holding and every transaction referencing it, including any
    /// orphans left over from earlier deletes.
    pub fn remove_holding(&mut self, id: &Id) -> Option<Holding> {
        let pos = self.holdings.iter().position(|h| &h.id == id)?;
        let removed = self.holdings.remove(pos);
        let live: std::collections::HashSet<&Id> =
            self.holdings.iter().map(|h| &h.id).collect();
        self.transactions.retain(|tx| live.contains(&tx.holding_id));
        Some(removed)
    }

    /// Transactions belonging to one holding, in ledger order.
    pub fn transactions_for(&self, holding_id: &Id) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| &tx.holding_id == holding_id)
            .collect()
    }
}

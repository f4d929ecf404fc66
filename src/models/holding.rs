use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, IdGenerator, UuidIdGenerator};

/// Broad asset classification for a holding. Imports default to `Stock`;
/// users can reclassify afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    #[default]
    Stock,
    Etf,
    Bond,
    Crypto,
    MutualFund,
    Other,
}

impl AssetType {
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Stock => "Stock",
            AssetType::Etf => "ETF",
            AssetType::Bond => "Bond",
            AssetType::Crypto => "Crypto",
            AssetType::MutualFund => "Mutual Fund",
            AssetType::Other => "Other",
        }
    }
}

/// A tracked position in one security within a portfolio.
///
/// `shares`, `average_cost`, `total_value`, `gain_loss` and
/// `gain_loss_percent` are derived: they are a pure function of the holding's
/// transaction subset and are only ever written by the recalculation engine.
/// `current_price` is externally supplied (quote feed or manual entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: Id,
    /// Uppercase ticker, unique within the owning portfolio.
    pub symbol: String,
    pub name: String,
    pub asset_type: AssetType,
    pub shares: Decimal,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    pub total_value: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, asset_type: AssetType) -> Self {
        Self::new_with_generator(&UuidIdGenerator, symbol, name, asset_type)
    }

    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: AssetType,
    ) -> Self {
        Self {
            id: ids.new_id(),
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            asset_type,
            shares: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            current_price: Decimal::ZERO,
            total_value: Decimal::ZERO,
            gain_loss: Decimal::ZERO,
            gain_loss_percent: Decimal::ZERO,
        }
    }

    pub fn with_current_price(mut self, price: Decimal) -> Self {
        self.current_price = price;
        self
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

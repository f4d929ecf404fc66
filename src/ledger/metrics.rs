//! Rolls holdings up into portfolio-level totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Portfolio;

use super::recalc::percent_of;

/// Portfolio-level totals for display.
///
/// Naming note: `daily_change` is cumulative unrealized gain/loss, not a
/// one-day delta. The name is historical and kept as documented behavior;
/// renaming it would silently change an exposed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_value: Decimal,
    pub daily_change: Decimal,
    pub daily_change_percent: Decimal,
}

/// Pure aggregation over a portfolio's holdings.
///
/// Returns a zeroed struct for a missing or holdings-less portfolio rather
/// than failing; callers from UI context pass whatever they have.
pub fn portfolio_metrics(portfolio: Option<&Portfolio>) -> PortfolioMetrics {
    let Some(portfolio) = portfolio else {
        return PortfolioMetrics::default();
    };

    let mut total_value = Decimal::ZERO;
    let mut daily_change = Decimal::ZERO;
    let mut cost_basis = Decimal::ZERO;
    for holding in &portfolio.holdings {
        total_value += holding.total_value;
        daily_change += holding.gain_loss;
        cost_basis += holding.average_cost * holding.shares;
    }

    PortfolioMetrics {
        total_value,
        daily_change,
        daily_change_percent: percent_of(daily_change, cost_basis),
    }
}

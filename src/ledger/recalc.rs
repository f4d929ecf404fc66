//! Derives a holding's position and valuation from its transaction subset.
//!
//! Derived fields are a pure function of the holding's transactions, so a
//! recompute is always safe and always idempotent.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::models::{Id, Portfolio, TradeKind, Transaction};

/// Position state derived from a transaction subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub shares: Decimal,
    /// Weighted average purchase price per share, computed over buys only.
    /// Sells never reduce it (simple cost-basis policy; realized-gain
    /// tracking is out of scope).
    pub average_cost: Decimal,
}

/// Replays a holding's transactions into a position.
///
/// Dividends carry cash only and do not move the position. A negative share
/// count would indicate an oversell that slipped past entry validation; it is
/// not defended against here.
pub fn derive_position(transactions: &[&Transaction]) -> Position {
    let mut bought_shares = Decimal::ZERO;
    let mut bought_total = Decimal::ZERO;
    let mut sold_shares = Decimal::ZERO;

    for tx in transactions {
        match tx.kind {
            TradeKind::Buy => {
                bought_shares += tx.shares;
                bought_total += tx.total;
            }
            TradeKind::Sell => sold_shares += tx.shares,
            TradeKind::Dividend => {}
        }
    }

    let average_cost = if bought_shares.is_zero() {
        Decimal::ZERO
    } else {
        bought_total / bought_shares
    };

    Position {
        shares: bought_shares - sold_shares,
        average_cost,
    }
}

/// Percent change of `gain` against `basis`, 0 when the basis is 0.
///
/// The zero-denominator case is deliberate edge policy (fresh or fully-sold
/// holdings), not an error.
pub(crate) fn percent_of(gain: Decimal, basis: Decimal) -> Decimal {
    if basis.is_zero() {
        Decimal::ZERO
    } else {
        (gain / basis * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Recomputes a holding's derived fields in place from the portfolio ledger.
///
/// Silent no-op when the holding id does not resolve: the UI may hold stale
/// ids after a delete, and recalculating a gone holding is not a failure.
/// Callers must re-read the holding afterwards.
pub fn recalculate_holding(portfolio: &mut Portfolio, holding_id: &Id) {
    let position = derive_position(&portfolio.transactions_for(holding_id));

    let Some(holding) = portfolio.holding_mut(holding_id) else {
        debug!(holding_id = %holding_id, "skipping recalculation for unknown holding");
        return;
    };

    holding.shares = position.shares;
    holding.average_cost = position.average_cost;
    holding.total_value = holding.shares * holding.current_price;
    let basis = holding.shares * holding.average_cost;
    holding.gain_loss = holding.total_value - basis;
    holding.gain_loss_percent = percent_of(holding.gain_loss, basis);
}

use anyhow::Result;
use tracing::debug;

use crate::ledger::recalculate_holding;
use crate::models::Portfolio;

use super::QuoteSource;

/// Pulls a fresh price for every holding and recalculates valuations.
///
/// Holdings the feed has nothing for keep their previous price. Returns the
/// number of holdings whose price was updated.
pub async fn refresh_prices(
    portfolio: &mut Portfolio,
    source: &dyn QuoteSource,
) -> Result<usize> {
    let targets: Vec<(crate::models::Id, String)> = portfolio
        .holdings
        .iter()
        .map(|h| (h.id.clone(), h.symbol.clone()))
        .collect();

    let mut updated = 0;
    for (holding_id, symbol) in targets {
        match source.fetch_quote(&symbol).await? {
            Some(quote) => {
                if let Some(holding) = portfolio.holding_mut(&holding_id) {
                    holding.current_price = quote.price;
                }
                recalculate_holding(portfolio, &holding_id);
                updated += 1;
            }
            None => debug!(%symbol, "no quote available; keeping previous price"),
        }
    }
    Ok(updated)
}

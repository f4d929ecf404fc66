use anyhow::Result;

use crate::config::ResolvedConfig;
use crate::ledger::portfolio_metrics;
use crate::storage::Storage;

use super::{active_id, load_profile};

/// Holdings of the active portfolio as display rows.
pub async fn holdings_view(
    storage: &dyn Storage,
    config: &ResolvedConfig,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some(active) = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(serde_json::json!({ "portfolio": null, "holdings": [] }));
    };

    let portfolio = profile.portfolio(&active).expect("active id resolved");
    let holdings: Vec<serde_json::Value> = portfolio
        .holdings
        .iter()
        .map(|h| {
            serde_json::json!({
                "symbol": h.symbol,
                "name": h.name,
                "asset_type": h.asset_type.label(),
                "shares": h.shares,
                "average_cost": h.average_cost,
                "current_price": h.current_price,
                "total_value": h.total_value,
                "gain_loss": h.gain_loss,
                "gain_loss_percent": h.gain_loss_percent,
            })
        })
        .collect();

    Ok(serde_json::json!({
        "portfolio": { "id": portfolio.id.to_string(), "name": portfolio.name },
        "holdings": holdings,
    }))
}

/// Portfolio-level totals for the active portfolio.
pub async fn metrics_view(
    storage: &dyn Storage,
    config: &ResolvedConfig,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let active = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?;
    let portfolio = active.as_ref().and_then(|id| profile.portfolio(id));
    let metrics = portfolio_metrics(portfolio);

    Ok(serde_json::json!({
        "total_value": metrics.total_value,
        "daily_change": metrics.daily_change,
        "daily_change_percent": metrics.daily_change_percent,
    }))
}

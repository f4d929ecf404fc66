use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::ledger::recalculate_holding;
use crate::models::{
    AssetType, Holding, LedgerError, Portfolio, TradeDate, TradeKind, Transaction,
};
use crate::storage::Storage;

use super::{active_id, load_profile};

fn rejection(err: &LedgerError) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": err.to_string(),
    })
}

fn no_portfolio() -> serde_json::Value {
    rejection(&LedgerError::PlaceholderWrite)
}

pub async fn add_portfolio(storage: &dyn Storage, name: &str) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let portfolio = Portfolio::new(name);
    let id = portfolio.id.clone();
    profile.portfolios.push(portfolio);
    if profile.active_portfolio_id.is_none() {
        profile.active_portfolio_id = Some(id.clone());
    }
    storage.save_profile(&profile).await?;

    info!(portfolio = %id, name, "portfolio created");
    Ok(serde_json::json!({
        "success": true,
        "portfolio": { "id": id.to_string(), "name": name },
    }))
}

pub async fn add_holding(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    symbol: &str,
    name: &str,
    asset_type: AssetType,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some(active) = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(no_portfolio());
    };

    let holding = Holding::new(symbol, name, asset_type);
    let holding_id = holding.id.clone();
    let portfolio = profile.portfolio_mut(&active).expect("active id resolved");
    match portfolio.add_holding(holding) {
        Ok(_) => {}
        Err(err) => return Ok(rejection(&err)),
    }
    storage.save_profile(&profile).await?;

    Ok(serde_json::json!({
        "success": true,
        "holding": {
            "id": holding_id.to_string(),
            "symbol": symbol.trim().to_uppercase(),
            "name": name,
        },
    }))
}

/// Records a buy or sell against a symbol in the active portfolio.
///
/// `total` is always shares x price. Oversells are rejected before anything
/// is appended; the profile is saved only after the recalculated state.
pub async fn record_trade(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    symbol: &str,
    kind: TradeKind,
    date: TradeDate,
    shares: Decimal,
    price: Decimal,
) -> Result<serde_json::Value> {
    debug_assert!(kind != TradeKind::Dividend, "use record_dividend");
    record_entry(storage, config, symbol, kind, date, shares, price, shares * price).await
}

/// Records a dividend cash receipt. Dividends never move the position; the
/// amount rides in both the shares and total fields, ledger convention.
pub async fn record_dividend(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    symbol: &str,
    date: TradeDate,
    amount: Decimal,
) -> Result<serde_json::Value> {
    record_entry(
        storage,
        config,
        symbol,
        TradeKind::Dividend,
        date,
        amount,
        Decimal::ZERO,
        amount,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn record_entry(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    symbol: &str,
    kind: TradeKind,
    date: TradeDate,
    shares: Decimal,
    price: Decimal,
    total: Decimal,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some(active) = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(no_portfolio());
    };

    let portfolio = profile.portfolio_mut(&active).expect("active id resolved");
    let Some(holding_id) = portfolio.holding_by_symbol(symbol).map(|h| h.id.clone()) else {
        return Ok(serde_json::json!({
            "success": false,
            "error": format!("No holding for {} in the active portfolio", symbol.to_uppercase()),
        }));
    };

    let tx = Transaction::new(holding_id.clone(), kind, date, shares, price, total);
    let tx_id = tx.id.clone();
    if let Err(err) = portfolio.record_transaction(tx) {
        return Ok(rejection(&err));
    }
    recalculate_holding(portfolio, &holding_id);

    let holding = portfolio.holding(&holding_id).expect("holding present");
    let result = serde_json::json!({
        "success": true,
        "transaction": { "id": tx_id.to_string(), "type": kind.label() },
        "holding": {
            "symbol": holding.symbol,
            "shares": holding.shares,
            "average_cost": holding.average_cost,
        },
    });
    storage.save_profile(&profile).await?;
    Ok(result)
}

/// Deletes a holding by symbol, cascading to its transactions.
pub async fn delete_holding(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    symbol: &str,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some(active) = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(no_portfolio());
    };

    let portfolio = profile.portfolio_mut(&active).expect("active id resolved");
    let Some(holding_id) = portfolio.holding_by_symbol(symbol).map(|h| h.id.clone()) else {
        return Ok(serde_json::json!({
            "success": false,
            "error": format!("No holding for {} in the active portfolio", symbol.to_uppercase()),
        }));
    };
    let removed = portfolio
        .remove_holding(&holding_id)
        .expect("holding id just resolved");
    storage.save_profile(&profile).await?;

    info!(symbol = %removed.symbol, "holding deleted");
    Ok(serde_json::json!({
        "success": true,
        "deleted": { "id": holding_id.to_string(), "symbol": removed.symbol },
    }))
}

/// Manually overrides a holding's current price and revalues it.
pub async fn set_price(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    symbol: &str,
    price: Decimal,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some(active) = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(no_portfolio());
    };

    let portfolio = profile.portfolio_mut(&active).expect("active id resolved");
    let Some(holding_id) = portfolio.holding_by_symbol(symbol).map(|h| h.id.clone()) else {
        return Ok(serde_json::json!({
            "success": false,
            "error": format!("No holding for {} in the active portfolio", symbol.to_uppercase()),
        }));
    };
    if let Some(holding) = portfolio.holding_mut(&holding_id) {
        holding.current_price = price;
    }
    recalculate_holding(portfolio, &holding_id);

    let holding = portfolio.holding(&holding_id).expect("holding present");
    let result = serde_json::json!({
        "success": true,
        "holding": {
            "symbol": holding.symbol,
            "current_price": holding.current_price,
            "total_value": holding.total_value,
        },
    });
    storage.save_profile(&profile).await?;
    Ok(result)
}

/// Refreshes every holding's price from the quote feed and revalues.
pub async fn update_quotes(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    source: &dyn crate::market_data::QuoteSource,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some(active) = active_id(storage, &mut profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(no_portfolio());
    };

    let portfolio = profile.portfolio_mut(&active).expect("active id resolved");
    let updated = crate::market_data::refresh_prices(portfolio, source).await?;
    let total = portfolio.holdings.len();
    storage.save_profile(&profile).await?;

    Ok(serde_json::json!({
        "success": true,
        "updated": updated,
        "holdings": total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn config() -> ResolvedConfig {
        ResolvedConfig::load_or_default(std::path::Path::new("does-not-exist.toml")).unwrap()
    }

    fn trade_day() -> TradeDate {
        TradeDate::Day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    }

    #[tokio::test]
    async fn mutations_against_empty_profile_are_rejected() -> Result<()> {
        let storage = MemoryStorage::new();
        let result = add_holding(&storage, &config(), "AAPL", "Apple", AssetType::Stock).await?;
        assert_eq!(result["success"], false);
        // Nothing was persisted for the placeholder.
        assert!(storage.load_profile().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn full_trade_flow_persists_derived_state() -> Result<()> {
        let storage = MemoryStorage::new();
        let cfg = config();
        add_portfolio(&storage, "Main").await?;
        add_holding(&storage, &cfg, "AAPL", "Apple Inc", AssetType::Stock).await?;

        let result = record_trade(
            &storage,
            &cfg,
            "aapl",
            TradeKind::Buy,
            trade_day(),
            dec!(10),
            dec!(150),
        )
        .await?;
        assert_eq!(result["success"], true);

        let profile = storage.load_profile().await?.expect("profile saved");
        let holding = profile.portfolios[0].holding_by_symbol("AAPL").unwrap();
        assert_eq!(holding.shares, dec!(10));
        assert_eq!(holding.average_cost, dec!(150));
        Ok(())
    }

    #[tokio::test]
    async fn oversell_is_rejected_and_state_unchanged() -> Result<()> {
        let storage = MemoryStorage::new();
        let cfg = config();
        add_portfolio(&storage, "Main").await?;
        add_holding(&storage, &cfg, "AAPL", "Apple Inc", AssetType::Stock).await?;
        record_trade(&storage, &cfg, "AAPL", TradeKind::Buy, trade_day(), dec!(6), dec!(150))
            .await?;

        let result = record_trade(
            &storage,
            &cfg,
            "AAPL",
            TradeKind::Sell,
            trade_day(),
            dec!(100),
            dec!(200),
        )
        .await?;
        assert_eq!(result["success"], false);
        assert!(result["error"].as_str().unwrap().contains("only 6 held"));

        let profile = storage.load_profile().await?.expect("profile saved");
        let portfolio = &profile.portfolios[0];
        assert_eq!(portfolio.transactions.len(), 1);
        assert_eq!(portfolio.holding_by_symbol("AAPL").unwrap().shares, dec!(6));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_symbol_is_rejected_with_message() -> Result<()> {
        let storage = MemoryStorage::new();
        let cfg = config();
        add_portfolio(&storage, "Main").await?;
        add_holding(&storage, &cfg, "AAPL", "Apple Inc", AssetType::Stock).await?;

        let result = add_holding(&storage, &cfg, "AAPL", "Apple again", AssetType::Stock).await?;
        assert_eq!(result["success"], false);
        assert!(result["error"].as_str().unwrap().contains("already exists"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_holding_cascades_transactions() -> Result<()> {
        let storage = MemoryStorage::new();
        let cfg = config();
        add_portfolio(&storage, "Main").await?;
        add_holding(&storage, &cfg, "AAPL", "Apple Inc", AssetType::Stock).await?;
        record_trade(&storage, &cfg, "AAPL", TradeKind::Buy, trade_day(), dec!(10), dec!(150))
            .await?;

        let result = delete_holding(&storage, &cfg, "AAPL").await?;
        assert_eq!(result["success"], true);

        let profile = storage.load_profile().await?.expect("profile saved");
        assert!(profile.portfolios[0].holdings.is_empty());
        assert!(profile.portfolios[0].transactions.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn dividend_records_cash_without_moving_position() -> Result<()> {
        let storage = MemoryStorage::new();
        let cfg = config();
        add_portfolio(&storage, "Main").await?;
        add_holding(&storage, &cfg, "VTI", "Vanguard Total", AssetType::Etf).await?;
        record_trade(&storage, &cfg, "VTI", TradeKind::Buy, trade_day(), dec!(5), dec!(220))
            .await?;

        let result = record_dividend(&storage, &cfg, "VTI", trade_day(), dec!(12.50)).await?;
        assert_eq!(result["success"], true);

        let profile = storage.load_profile().await?.expect("profile saved");
        let portfolio = &profile.portfolios[0];
        assert_eq!(portfolio.transactions.len(), 2);
        assert_eq!(portfolio.holding_by_symbol("VTI").unwrap().shares, dec!(5));
        Ok(())
    }
}

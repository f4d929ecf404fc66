use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ResolvedConfig;
use crate::import::{commit_import, plan_import, sheet_from_csv_path, ImportPlan};
use crate::models::{Portfolio, UserProfile, UuidIdGenerator};
use crate::storage::Storage;

use super::{active_id, load_profile};

async fn plan_for_active(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    file: &Path,
    profile: &mut UserProfile,
) -> Result<Option<(crate::models::Id, ImportPlan)>> {
    let Some(active) = active_id(storage, profile, config.portfolio.fallback_policy).await?
    else {
        return Ok(None);
    };

    let sheet = sheet_from_csv_path(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let portfolio: &Portfolio = profile.portfolio(&active).expect("active id resolved");
    let plan = plan_import(&sheet, portfolio, &config.import.activity_types)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    Ok(Some((active, plan)))
}

/// Parses an export and reports what a commit would do. Never writes.
pub async fn preview_spreadsheet_import(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    file: &Path,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some((_, plan)) = plan_for_active(storage, config, file, &mut profile).await? else {
        return Ok(serde_json::json!({
            "success": false,
            "error": "No portfolio exists yet; create one before importing",
        }));
    };

    Ok(serde_json::json!({
        "success": true,
        "committed": false,
        "summary": plan.summary(),
        "new_holdings": plan.new_holdings,
    }))
}

/// Parses an export and applies it to the active portfolio.
///
/// Parse failures abort before any mutation. The caller is the confirmation
/// step: this function is only invoked after the user has accepted a preview
/// (or explicitly asked for a one-shot commit).
pub async fn commit_spreadsheet_import(
    storage: &dyn Storage,
    config: &ResolvedConfig,
    file: &Path,
) -> Result<serde_json::Value> {
    let mut profile = load_profile(storage).await?;
    let Some((active, plan)) = plan_for_active(storage, config, file, &mut profile).await? else {
        return Ok(serde_json::json!({
            "success": false,
            "error": "No portfolio exists yet; create one before importing",
        }));
    };

    let portfolio = profile.portfolio_mut(&active).expect("active id resolved");
    let outcome = commit_import(portfolio, &plan, &UuidIdGenerator);
    storage.save_profile(&profile).await?;

    info!(file = %file.display(), "spreadsheet import committed");
    Ok(serde_json::json!({
        "success": true,
        "committed": true,
        "summary": outcome.summary,
        "created_holdings": outcome
            .created_holding_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::add_portfolio;
    use crate::storage::MemoryStorage;
    use std::io::Write;

    const EXPORT: &str = "\
Transaction Date,Action,Symbol,Description,Quantity,Price,Amount
01/02/2024,Bought,AAPL,APPLE INC,10,150,-1500
01/05/2024,Transferred,MSFT,MICROSOFT CORP,1,400,-400
";

    fn config() -> ResolvedConfig {
        ResolvedConfig::load_or_default(Path::new("does-not-exist.toml")).unwrap()
    }

    fn write_export(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("export.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn preview_reports_without_mutating() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write_export(&dir);
        let storage = MemoryStorage::new();
        add_portfolio(&storage, "Main").await?;

        let result = preview_spreadsheet_import(&storage, &config(), &file).await?;
        assert_eq!(result["success"], true);
        assert_eq!(result["committed"], false);
        assert_eq!(result["summary"]["new_holding_count"], 1);
        assert_eq!(result["summary"]["transaction_count"], 1);

        let profile = storage.load_profile().await?.expect("profile saved");
        assert!(profile.portfolios[0].holdings.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn commit_applies_and_persists() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write_export(&dir);
        let storage = MemoryStorage::new();
        add_portfolio(&storage, "Main").await?;

        let result = commit_spreadsheet_import(&storage, &config(), &file).await?;
        assert_eq!(result["success"], true);
        assert_eq!(result["committed"], true);

        let profile = storage.load_profile().await?.expect("profile saved");
        let portfolio = &profile.portfolios[0];
        assert_eq!(portfolio.holdings.len(), 1);
        assert_eq!(portfolio.transactions.len(), 1);
        assert_eq!(portfolio.holdings[0].symbol, "AAPL");
        Ok(())
    }

    #[tokio::test]
    async fn import_without_portfolio_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write_export(&dir);
        let storage = MemoryStorage::new();

        let result = commit_spreadsheet_import(&storage, &config(), &file).await?;
        assert_eq!(result["success"], false);
        assert!(storage.load_profile().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_file_aborts_before_any_write() -> Result<()> {
        let storage = MemoryStorage::new();
        add_portfolio(&storage, "Main").await?;
        let before = storage.load_profile().await?.expect("profile saved");

        let missing = Path::new("/nonexistent/export.csv");
        assert!(commit_spreadsheet_import(&storage, &config(), missing)
            .await
            .is_err());

        let after = storage.load_profile().await?.expect("profile saved");
        assert_eq!(
            serde_json::to_string(&before)?,
            serde_json::to_string(&after)?
        );
        Ok(())
    }
}

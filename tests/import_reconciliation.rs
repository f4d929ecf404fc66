//! End-to-end import flows through the app layer.

use anyhow::Result;
use folioledger::app::{add_portfolio, commit_spreadsheet_import, preview_spreadsheet_import};
use folioledger::config::ResolvedConfig;
use folioledger::storage::{MemoryStorage, Storage};
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};

const FIRST_EXPORT: &str = "\
Brokerage account 9999 history,,,,,,
Transaction Date,Action,Symbol,Description,Quantity,Price,Amount
01/02/2024,Bought,AAPL,APPLE INC UNSOLICITED TRADE #987654321,10,150,-1500
01/03/2024,Bought,VTI,VANGUARD TOTAL STOCK MARKET ETF,5,220,-1100
01/04/2024,Qualified Dividend,AAPL,APPLE INC,0,0,12.50
01/05/2024,Transferred,MSFT,MICROSOFT CORP,1,400,-400
,,,,,,
01/06/2024,Sold,AAPL,APPLE INC,-4,200,800
";

const SECOND_EXPORT: &str = "\
Transaction Date,Action,Symbol,Description,Quantity,Price,Amount
02/02/2024,Bought,AAPL,APPLE INC,2,180,-360
02/03/2024,Bought,--,UNIDENTIFIED,1,10,-10
";

fn config() -> ResolvedConfig {
    ResolvedConfig::load_or_default(Path::new("does-not-exist.toml")).unwrap()
}

fn write_export(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn first_import_creates_holdings_and_reports_skips() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = write_export(&dir, "first.csv", FIRST_EXPORT);
    let storage = MemoryStorage::new();
    let cfg = config();
    add_portfolio(&storage, "Main").await?;

    let preview = preview_spreadsheet_import(&storage, &cfg, &file).await?;
    assert_eq!(preview["summary"]["new_holding_count"], 2);
    assert_eq!(preview["summary"]["transaction_count"], 4);
    assert_eq!(preview["summary"]["counts_by_type"]["buy"], 2);
    assert_eq!(preview["summary"]["counts_by_type"]["sell"], 1);
    assert_eq!(preview["summary"]["counts_by_type"]["dividend"], 1);
    let skipped = preview["summary"]["skipped_rows"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0]["reason"]
        .as_str()
        .unwrap()
        .contains("Unsupported type: Transferred"));

    let result = commit_spreadsheet_import(&storage, &cfg, &file).await?;
    assert_eq!(result["success"], true);

    let profile = storage.load_profile().await?.expect("profile saved");
    let portfolio = &profile.portfolios[0];
    assert_eq!(portfolio.holdings.len(), 2);
    assert_eq!(portfolio.transactions.len(), 4);

    let apple = portfolio.holding_by_symbol("AAPL").unwrap();
    assert_eq!(apple.name, "Apple Inc");
    assert_eq!(apple.shares, dec!(6));
    assert_eq!(apple.average_cost, dec!(150));
    Ok(())
}

#[tokio::test]
async fn second_import_dedups_against_existing_holdings() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let first = write_export(&dir, "first.csv", FIRST_EXPORT);
    let second = write_export(&dir, "second.csv", SECOND_EXPORT);
    let storage = MemoryStorage::new();
    let cfg = config();
    add_portfolio(&storage, "Main").await?;
    commit_spreadsheet_import(&storage, &cfg, &first).await?;

    let before = storage.load_profile().await?.expect("profile saved");
    let apple_id = before.portfolios[0]
        .holding_by_symbol("AAPL")
        .unwrap()
        .id
        .clone();

    let result = commit_spreadsheet_import(&storage, &cfg, &second).await?;
    assert_eq!(result["summary"]["new_holding_count"], 0);
    assert_eq!(result["created_holdings"].as_array().unwrap().len(), 0);

    let after = storage.load_profile().await?.expect("profile saved");
    let portfolio = &after.portfolios[0];
    assert_eq!(portfolio.holdings.len(), 2);

    // The new buy attached to the existing AAPL holding.
    let apple = portfolio.holding_by_symbol("AAPL").unwrap();
    assert_eq!(apple.id, apple_id);
    assert_eq!(portfolio.transactions_for(&apple_id).len(), 4);
    assert_eq!(apple.shares, dec!(8));
    Ok(())
}

#[tokio::test]
async fn headerless_file_aborts_whole_import() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = write_export(&dir, "bad.csv", "just,some,cells\nwith,no,header\n");
    let storage = MemoryStorage::new();
    let cfg = config();
    add_portfolio(&storage, "Main").await?;

    let err = commit_spreadsheet_import(&storage, &cfg, &file)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("No header row"));

    let profile = storage.load_profile().await?.expect("profile saved");
    assert!(profile.portfolios[0].holdings.is_empty());
    assert!(profile.portfolios[0].transactions.is_empty());
    Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use folioledger::app;
use folioledger::config::{default_config_path, ResolvedConfig};
use folioledger::import::parse_trade_date;
use folioledger::market_data::ProxyQuoteSource;
use folioledger::models::{AssetType, TradeKind};
use folioledger::storage::JsonFileStorage;

#[derive(Parser)]
#[command(name = "folioledger")]
#[command(about = "Portfolio ledger and brokerage-import toolkit")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,
    /// Create a portfolio
    AddPortfolio { name: String },
    /// Add a holding to the active portfolio
    AddHolding {
        symbol: String,
        name: String,
        #[arg(long, value_enum, default_value = "stock")]
        asset_type: AssetTypeArg,
    },
    /// Record a buy
    Buy {
        symbol: String,
        shares: Decimal,
        price: Decimal,
        /// Trade date (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Record a sell
    Sell {
        symbol: String,
        shares: Decimal,
        price: Decimal,
        #[arg(long)]
        date: String,
    },
    /// Record a dividend cash receipt
    Dividend {
        symbol: String,
        amount: Decimal,
        #[arg(long)]
        date: String,
    },
    /// Delete a holding and its transactions
    RemoveHolding { symbol: String },
    /// Manually set a holding's current price
    SetPrice { symbol: String, price: Decimal },
    /// Refresh all prices from the quote proxy
    RefreshPrices,
    /// List holdings of the active portfolio
    Holdings,
    /// Show portfolio totals
    Metrics,
    /// Import a brokerage CSV export
    Import {
        file: PathBuf,
        /// Apply the import instead of only previewing it
        #[arg(long)]
        commit: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum AssetTypeArg {
    Stock,
    Etf,
    Bond,
    Crypto,
    MutualFund,
    Other,
}

impl From<AssetTypeArg> for AssetType {
    fn from(value: AssetTypeArg) -> Self {
        match value {
            AssetTypeArg::Stock => AssetType::Stock,
            AssetTypeArg::Etf => AssetType::Etf,
            AssetTypeArg::Bond => AssetType::Bond,
            AssetTypeArg::Crypto => AssetType::Crypto,
            AssetTypeArg::MutualFund => AssetType::MutualFund,
            AssetTypeArg::Other => AssetType::Other,
        }
    }
}

fn print_result(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)?;
    let storage = JsonFileStorage::new(&config.data_dir);

    let result = match cli.command {
        Command::Config => {
            println!("Config file: {}", config_path.display());
            println!("Data directory: {}", config.data_dir.display());
            println!("Fallback policy: {:?}", config.portfolio.fallback_policy);
            return Ok(());
        }
        Command::AddPortfolio { name } => app::add_portfolio(&storage, &name).await?,
        Command::AddHolding {
            symbol,
            name,
            asset_type,
        } => app::add_holding(&storage, &config, &symbol, &name, asset_type.into()).await?,
        Command::Buy {
            symbol,
            shares,
            price,
            date,
        } => {
            app::record_trade(
                &storage,
                &config,
                &symbol,
                TradeKind::Buy,
                parse_trade_date(&date),
                shares,
                price,
            )
            .await?
        }
        Command::Sell {
            symbol,
            shares,
            price,
            date,
        } => {
            app::record_trade(
                &storage,
                &config,
                &symbol,
                TradeKind::Sell,
                parse_trade_date(&date),
                shares,
                price,
            )
            .await?
        }
        Command::Dividend {
            symbol,
            amount,
            date,
        } => {
            app::record_dividend(&storage, &config, &symbol, parse_trade_date(&date), amount)
                .await?
        }
        Command::RemoveHolding { symbol } => {
            app::delete_holding(&storage, &config, &symbol).await?
        }
        Command::SetPrice { symbol, price } => {
            app::set_price(&storage, &config, &symbol, price).await?
        }
        Command::RefreshPrices => {
            let source = ProxyQuoteSource::new(&config.market_data.quote_proxy_url);
            app::update_quotes(&storage, &config, &source).await?
        }
        Command::Holdings => app::holdings_view(&storage, &config).await?,
        Command::Metrics => app::metrics_view(&storage, &config).await?,
        Command::Import { file, commit } => {
            if commit {
                app::commit_spreadsheet_import(&storage, &config, &file).await?
            } else {
                app::preview_spreadsheet_import(&storage, &config, &file).await?
            }
        }
    };

    print_result(&result)
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::import::ActivityVocabulary;
use crate::ledger::FallbackPolicy;

/// Portfolio behavior configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// What to do when the stored active-portfolio pointer does not resolve.
    /// `strict` (default) persists the corrected pointer; `lazy` recomputes
    /// the fallback on every read.
    pub fallback_policy: FallbackPolicy,
}

/// Import behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Activity-type text to trade-kind mapping used by the reconciler.
    /// Replaces the built-in vocabulary when set in the config file.
    pub activity_types: ActivityVocabulary,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            activity_types: ActivityVocabulary::default(),
        }
    }
}

/// Market data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Base URL of the quote proxy.
    pub quote_proxy_url: String,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            quote_proxy_url: "http://localhost:8787".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file
    /// location. If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub portfolio: PortfolioConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub market_data: MarketDataConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to
    /// `config_dir`. If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./folioledger.toml` if it exists in current directory
/// 2. `~/.local/share/folioledger/folioledger.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("folioledger.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("folioledger").join("folioledger.toml");
    }

    local_config
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved data directory path.
    pub data_dir: PathBuf,

    pub portfolio: PortfolioConfig,
    pub import: ImportConfig,
    pub market_data: MarketDataConfig,
}

impl ResolvedConfig {
    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent
    /// directory. A missing config file resolves to defaults with the file's
    /// would-be directory as the data dir.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        let config_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(Self {
            data_dir: config.resolve_data_dir(config_dir),
            portfolio: config.portfolio,
            import: config.import,
            market_data: config.market_data,
        })
    }
}

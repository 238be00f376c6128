//! TOML strategy file loading and validation.

use std::path::{Path, PathBuf};

use cryptodex::{FundingPriority, Strategy};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub currency: String,
    pub portfolio: PortfolioConfig,
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Directory of the file this config was loaded from.
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    /// Number of top-ranked assets held at target.
    pub assets: usize,
    /// Assets ranked right after the active window that are kept but not traded.
    #[serde(default)]
    pub max_frozen: usize,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Per-asset target cap, in percent.
    #[serde(default)]
    pub max_weight: Option<f64>,
    #[serde(default)]
    pub funding_priority: FundingPriority,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Paper exchange data file, relative to the config file.
    pub snapshot: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_max_orders")]
    pub max_orders_per_run: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_orders_per_run: default_max_orders(),
        }
    }
}

fn default_max_orders() -> usize {
    50
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&contents)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse and validate config text. Relative paths resolve against the
    /// working directory.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            return Err(Error::Config("currency must not be empty".into()));
        }
        if self.portfolio.assets == 0 {
            return Err(Error::Config("portfolio.assets must be > 0".into()));
        }
        if let Some(cap) = self.portfolio.max_weight {
            if !(cap > 0.0 && cap <= 100.0) {
                return Err(Error::Config("max_weight must be in (0, 100]".into()));
            }
            if self.portfolio.assets as f64 * cap < 100.0 {
                return Err(Error::Config(format!(
                    "max_weight {cap}% across {} assets cannot reach 100%",
                    self.portfolio.assets
                )));
            }
        }
        if self.execution.max_orders_per_run == 0 {
            return Err(Error::Config("max_orders_per_run must be > 0".into()));
        }
        Ok(())
    }

    /// Engine strategy described by this config.
    pub fn strategy(&self) -> Strategy {
        let mut strategy = Strategy::new(
            self.currency.trim(),
            self.portfolio.assets,
            self.portfolio.max_frozen,
        )
        .excluding(&self.portfolio.exclude)
        .with_funding_priority(self.portfolio.funding_priority);
        if let Some(cap) = self.portfolio.max_weight {
            strategy = strategy.with_max_weight(cap);
        }
        strategy
    }

    /// Full path to the paper exchange snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.base_dir.join(&self.exchange.snapshot)
    }
}

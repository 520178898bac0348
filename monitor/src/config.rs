//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use vertex::metrics::DEFAULT_RISK_FREE_RATE;
use vertex::persistence::FileStore;
use vertex_compliance::{ComplianceEngine, IpsLimits, SectorMetricSource};

use crate::error::{Error, Result};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub analytics: AnalyticsConfig,
    pub ips: IpsLimits,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot document.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

fn default_storage_dir() -> String {
    "./data".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Risk-free rate per period for Sharpe and Sortino.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Source of the "Single Sector Exposure" row.
    #[serde(default)]
    pub sector_metric: SectorMetricSource,
    /// Per-ticker betas. Unlisted tickers count as 1.0.
    #[serde(default)]
    pub betas: FxHashMap<String, f64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            sector_metric: SectorMetricSource::default(),
            betas: FxHashMap::default(),
        }
    }
}

fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load config from a TOML file, or use defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.storage.dir.is_empty() {
            return Err(Error::Config("storage dir must not be empty".into()));
        }
        if !self.analytics.risk_free_rate.is_finite() {
            return Err(Error::Config("risk_free_rate must be finite".into()));
        }
        if let Some((ticker, beta)) = self.analytics.betas.iter().find(|(_, b)| !b.is_finite()) {
            return Err(Error::Config(format!(
                "beta for {ticker} must be finite, got {beta}"
            )));
        }
        self.ips.validate().map_err(Error::Config)?;
        Ok(())
    }

    /// Snapshot store rooted at the storage dir.
    pub fn store(&self) -> FileStore {
        FileStore::new(&self.storage.dir)
    }

    /// Compliance engine built from the `[ips]` and `[analytics]` sections.
    pub fn engine(&self) -> ComplianceEngine {
        ComplianceEngine::new(self.ips.clone())
            .with_sector_source(self.analytics.sector_metric)
            .with_risk_free_rate(self.analytics.risk_free_rate)
            .with_betas(
                self.analytics
                    .betas
                    .iter()
                    .map(|(ticker, beta)| (ticker.clone(), *beta)),
            )
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[storage]
dir = "./state"

[analytics]
risk_free_rate = 0.012
sector_metric = "largest_security"

[analytics.betas]
CRDB = 1.2
NMB = 0.9

[ips]
max_single_security = 8.0
max_sector = 20.0

[logging]
dir = "./logs"
audit_file = "audit.jsonl"
"#
    }

    #[test]
    fn parse_example_config() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.storage.dir, "./state");
        assert_eq!(config.analytics.risk_free_rate, 0.012);
        assert_eq!(
            config.analytics.sector_metric,
            SectorMetricSource::LargestSecurity
        );
        assert_eq!(config.analytics.betas.get("CRDB"), Some(&1.2));
        assert_eq!(config.ips.max_single_security, 8.0);
        // Unspecified limits keep their defaults
        assert_eq!(config.ips.max_region, 10.0);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.storage.dir, "./data");
        assert_eq!(config.analytics.risk_free_rate, DEFAULT_RISK_FREE_RATE);
        assert_eq!(config.ips, IpsLimits::default());
    }

    #[test]
    fn validate_catches_bad_limits() {
        let toml = "[ips]\nmin_cash = 20.0\nmax_cash = 15.0\n";
        assert!(matches!(Config::from_toml(toml), Err(Error::Config(_))));
    }

    #[test]
    fn validate_catches_empty_storage_dir() {
        let toml = "[storage]\ndir = \"\"\n";
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn unknown_sector_metric_rejected() {
        let toml = "[analytics]\nsector_metric = \"median\"\n";
        assert!(matches!(Config::from_toml(toml), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn audit_path() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.audit_path(), PathBuf::from("./logs/audit.jsonl"));
    }

    #[test]
    fn engine_uses_configured_limits() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.engine().limits().max_sector, 20.0);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.audit_file, "audit.jsonl");
        assert!(Config::load(&dir.path().join("absent.toml")).is_err());
    }
}

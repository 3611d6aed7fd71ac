use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use log::LevelFilter;
use serde::Deserialize;

use crate::query::MILLIS_PER_DAY;

pub const CONFIG_FILE: &str = "./mc-chart.toml";

pub const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub aws: AwsConfig,
    pub query: QueryConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: String,
    pub identity_pool_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub table_name: String,
    pub client_id: String,
    pub lookback_days: i64,
    pub page_limit: i32,
    pub consistent_read: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub container_id: String,
    /// Fixed display correction applied to every timestamp. Not DST aware.
    pub utc_offset_hours: i64,
    pub output: PathBuf,
    pub script_src: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-2".to_string(),
            identity_pool_id: "us-east-2:81f8a4e5-1143-4b24-9e7a-659a7105dc3d".to_string(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            table_name: "mc-test".to_string(),
            client_id: "MC-1126-1-1".to_string(),
            lookback_days: 14,
            page_limit: 2500,
            consistent_read: false,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "MC3.0".to_string(),
            container_id: "container".to_string(),
            utc_offset_hours: -4,
            output: PathBuf::from("mc-chart.html"),
            script_src: "https://code.highcharts.com/highcharts.js".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.query.lookback_days < 0 {
            return Err(anyhow::anyhow!(
                "query.lookback_days must not be negative, got {}",
                self.query.lookback_days
            ));
        }
        self.query
            .lookback_days
            .checked_mul(MILLIS_PER_DAY)
            .with_context(|| format!("query.lookback_days is too large: {}", self.query.lookback_days))?;
        self.chart
            .utc_offset_hours
            .checked_mul(MILLIS_PER_HOUR)
            .with_context(|| {
                format!("chart.utc_offset_hours is too large: {}", self.chart.utc_offset_hours)
            })?;
        if self.query.page_limit < 1 {
            return Err(anyhow::anyhow!(
                "query.page_limit must be at least 1, got {}",
                self.query.page_limit
            ));
        }
        Ok(())
    }

    /// Loads [`CONFIG_FILE`] when present, defaults otherwise.
    pub fn load_or_default() -> Result<Self, anyhow::Error> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, anyhow::Error> {
        LevelFilter::from_str(&self.logging.level)
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.logging.level))
    }
}

impl ChartConfig {
    pub fn utc_offset_millis(&self) -> i64 {
        self.utc_offset_hours.saturating_mul(MILLIS_PER_HOUR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.aws.region, "us-east-2");
        assert_eq!(config.query.table_name, "mc-test");
        assert_eq!(config.query.client_id, "MC-1126-1-1");
        assert_eq!(config.query.lookback_days, 14);
        assert_eq!(config.query.page_limit, 2500);
        assert!(!config.query.consistent_read);
        assert_eq!(config.chart.title, "MC3.0");
        assert_eq!(config.chart.utc_offset_millis(), -14_400_000);
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
            [query]
            client_id = "MC-2000-1-1"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.query.client_id, "MC-2000-1-1");
        assert_eq!(config.query.table_name, "mc-test");
        assert_eq!(config.aws.region, "us-east-2");
        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Config::parse("[query]\npage_limit = \"many\"").is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "chatty".to_string();
        assert!(config.log_level().is_err());
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(Config::parse("[query]\nlookback_days = 9223372036854775807").is_err());
        assert!(Config::parse("[query]\nlookback_days = -1").is_err());
        assert!(Config::parse("[query]\npage_limit = 0").is_err());
        assert!(Config::parse("[chart]\nutc_offset_hours = -9223372036854775807").is_err());
        assert!(Config::parse("[chart]\nutc_offset_hours = 5").is_ok());
    }
}

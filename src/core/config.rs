use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ConsecutiveFallingDaysConfig {
    pub threshold: usize,
}

impl Default for ConsecutiveFallingDaysConfig {
    fn default() -> Self {
        Self { threshold: 3 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PriceDropsInWindowConfig {
    pub drop_count_threshold: usize,
    pub lookback_days: usize,
}

impl Default for PriceDropsInWindowConfig {
    fn default() -> Self {
        Self {
            drop_count_threshold: 3,
            lookback_days: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct FiltersConfig {
    pub consecutive_falling_days: ConsecutiveFallingDaysConfig,
    pub price_drops_in_window: PriceDropsInWindowConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlphaVantageConfig {
    #[serde(default = "AlphaVantageConfig::default_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
}

impl AlphaVantageConfig {
    fn default_base_url() -> String {
        "https://www.alphavantage.co".to_string()
    }
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub alpha_vantage: AlphaVantageConfig,
}

/// Downstream API receiving passing stocks and sell recommendations.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ExternalApiConfig {
    pub url: Option<String>,
    pub port: Option<u16>,
    pub list_stock_endpoint: Option<String>,
    pub sell_recommendation_endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub external_api: ExternalApiConfig,
    /// Working days of history kept per stock; also the freshness window.
    #[serde(default = "AppConfig::default_working_days_back")]
    pub working_days_back: usize,
    /// Used when the user has not stored a threshold of their own.
    #[serde(default)]
    pub rating_threshold: i32,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            filters: FiltersConfig::default(),
            providers: ProvidersConfig::default(),
            external_api: ExternalApiConfig::default(),
            working_days_back: Self::default_working_days_back(),
            rating_threshold: 0,
            data_path: None,
        }
    }
}

impl AppConfig {
    fn default_working_days_back() -> usize {
        7
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("org", "stockwatch", "stockwatch")
            .context("Could not determine project directories")
    }

    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn favorites_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("favorite_stocks.json"))
    }

    pub fn activity_log_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("activity.log"))
    }

    pub fn rating_threshold_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("rating_threshold.txt"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{ActivityLog, FilterManager};
use crate::providers::alpha_vantage::AlphaVantageProvider;
use crate::providers::external_api::HttpExternalApi;
use crate::store::{FileActivityLog, JsonFavoritesStore, RatingThresholdStore};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands the application can execute
#[derive(Debug, Clone)]
pub enum AppCommand {
    List,
    Add { symbol: String },
    Remove { symbol: String },
    Update,
    Process,
    Rate { input: Option<PathBuf> },
    Threshold { value: Option<i32> },
    Logs { lines: usize },
}

/// Collaborators shared by every command, wired from the configuration.
struct AppContext {
    config: AppConfig,
    favorites: JsonFavoritesStore,
    log: Arc<FileActivityLog>,
    thresholds: RatingThresholdStore,
}

impl AppContext {
    fn new(config: AppConfig) -> Result<Self> {
        let favorites = JsonFavoritesStore::new(config.favorites_path()?);
        let log = Arc::new(FileActivityLog::new(config.activity_log_path()?));
        let thresholds =
            RatingThresholdStore::new(config.rating_threshold_path()?, config.rating_threshold);
        debug!(favorites = %favorites.path().display(), "Using data files");

        Ok(Self {
            config,
            favorites,
            log,
            thresholds,
        })
    }

    fn market_provider(&self) -> Result<AlphaVantageProvider> {
        let alpha_vantage = &self.config.providers.alpha_vantage;
        let api_key = alpha_vantage
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .context("Alpha Vantage API key is not set in the configuration")?;
        AlphaVantageProvider::new(&alpha_vantage.base_url, api_key)
    }

    fn external_api(&self) -> Result<HttpExternalApi> {
        let log: Arc<dyn ActivityLog> = self.log.clone();
        HttpExternalApi::new(&self.config.external_api, log)
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("stockwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ctx = AppContext::new(config)?;
    let today = Local::now().date_naive();
    let working_days_back = ctx.config.working_days_back;

    match command {
        AppCommand::List => cli::favorites::list(&ctx.favorites, working_days_back, today),
        AppCommand::Add { symbol } => {
            let provider = ctx.market_provider()?;
            cli::favorites::add(
                &ctx.favorites,
                &provider,
                ctx.log.as_ref(),
                &symbol,
                working_days_back,
                today,
            )
            .await
            .map(|_| ())
        }
        AppCommand::Remove { symbol } => {
            cli::favorites::remove(&ctx.favorites, ctx.log.as_ref(), &symbol).map(|_| ())
        }
        AppCommand::Update => {
            let provider = ctx.market_provider()?;
            cli::update::run(
                &ctx.favorites,
                &provider,
                ctx.log.as_ref(),
                working_days_back,
                today,
            )
            .await
            .map(|_| ())
        }
        AppCommand::Process => {
            let filters = FilterManager::from_config(&ctx.config.filters);
            let api = ctx.external_api()?;
            cli::process::run(&ctx.favorites, &filters, &api, ctx.log.as_ref())
                .await
                .map(|_| ())
        }
        AppCommand::Rate { input } => {
            let payload = cli::rating::read_payload(input.as_deref())?;
            let api = ctx.external_api()?;
            cli::rating::rate(&payload, &ctx.thresholds, &api, ctx.log.as_ref())
                .await
                .map(|_| ())
        }
        AppCommand::Threshold { value } => {
            cli::rating::threshold(&ctx.thresholds, ctx.log.as_ref(), value).map(|_| ())
        }
        AppCommand::Logs { lines } => {
            cli::logs::run(ctx.log.as_ref(), lines);
            Ok(())
        }
    }
}

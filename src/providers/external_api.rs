use crate::core::activity::ActivityLog;
use crate::core::config::ExternalApiConfig;
use crate::core::external::ExternalApi;
use crate::core::stock::StockTransaction;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Posts JSON arrays of [`StockTransaction`] to `{url}:{port}/{endpoint}`.
pub struct HttpExternalApi {
    base_url: Option<String>,
    list_stock_endpoint: Option<String>,
    sell_recommendation_endpoint: Option<String>,
    client: reqwest::Client,
    log: Arc<dyn ActivityLog>,
}

impl HttpExternalApi {
    pub fn new(config: &ExternalApiConfig, log: Arc<dyn ActivityLog>) -> Result<Self> {
        let base_url = match (config.url.as_deref(), config.port) {
            (Some(url), Some(port)) if !url.is_empty() && port > 0 => {
                Some(format!("{}:{}", url.trim_end_matches('/'), port))
            }
            _ => {
                log.log("External API url or port is not configured.");
                None
            }
        };

        let non_empty = |endpoint: &Option<String>| {
            endpoint
                .as_deref()
                .map(|e| e.trim_matches('/'))
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            base_url,
            list_stock_endpoint: non_empty(&config.list_stock_endpoint),
            sell_recommendation_endpoint: non_empty(&config.sell_recommendation_endpoint),
            client: reqwest::Client::builder()
                .user_agent("stockwatch/0.1")
                .build()?,
            log,
        })
    }

    fn endpoint_url(&self, endpoint: Option<&str>) -> Result<String> {
        match (self.base_url.as_deref(), endpoint) {
            (Some(base), Some(endpoint)) => Ok(format!("{base}/{endpoint}")),
            _ => {
                self.log
                    .log("Cannot send data, the external API is not configured.");
                bail!("External API is not configured")
            }
        }
    }

    async fn post(&self, endpoint: Option<&str>, transactions: &[StockTransaction]) -> Result<()> {
        let url = self.endpoint_url(endpoint)?;
        let body = serde_json::to_string(transactions)?;
        self.log.log(&format!("Sending data to {url}"));
        self.log.log(&format!("Payload: {body}"));

        let response = with_retry(
            || {
                self.client
                    .post(&url)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body.clone())
                    .send()
            },
            3,
            500,
        )
        .await
        .with_context(|| format!("Failed to send data to {url}"))?;

        let status = response.status();
        debug!(?status, "External API responded");
        if !status.is_success() {
            self.log
                .log(&format!("External API rejected the data: {status}"));
            return Err(anyhow!("HTTP error: {} from {}", status, url));
        }

        self.log.log("Data sent successfully.");
        Ok(())
    }
}

#[async_trait]
impl ExternalApi for HttpExternalApi {
    #[instrument(name = "SendPassingStocks", skip_all, fields(count = names.len()))]
    async fn send_passing_stock_names(&self, names: &[String]) -> Result<()> {
        let now = Local::now().naive_local();
        let transactions: Vec<StockTransaction> = names
            .iter()
            .map(|name| StockTransaction::new(name, now))
            .collect();
        self.post(self.list_stock_endpoint.as_deref(), &transactions)
            .await
    }

    #[instrument(name = "SendSellRecommendations", skip_all, fields(count = recommendations.len()))]
    async fn send_sell_recommendations(&self, recommendations: &[StockTransaction]) -> Result<()> {
        self.post(self.sell_recommendation_endpoint.as_deref(), recommendations)
            .await
    }
}

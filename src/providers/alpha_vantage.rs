use crate::core::freshness::is_working_day;
use crate::core::market::MarketDataProvider;
use crate::core::stock::PricePoint;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("stockwatch/0.1")
            .build()?;
        Ok(AlphaVantageProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    async fn query<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let endpoint = format!("{}/query", self.base_url);
        let query = params
            .iter()
            .copied()
            .chain(std::iter::once(("apikey", self.api_key.as_str())));
        let url = reqwest::Url::parse_with_params(&endpoint, query)
            .with_context(|| format!("Invalid Alpha Vantage URL: {endpoint}"))?;
        debug!("Requesting {} with {:?}", endpoint, params);

        let response = with_retry(|| self.client.get(url.clone()).send(), 3, 500)
            .await
            .with_context(|| format!("Request error for URL: {endpoint}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for {}",
                response.status(),
                params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            ));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse Alpha Vantage response: {}", e))
    }
}

/// Explanations Alpha Vantage returns instead of data, e.g. when rate limited.
#[derive(Deserialize, Debug, Default)]
struct ApiNotice {
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

impl ApiNotice {
    fn message(&self) -> &str {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
            .unwrap_or("no data returned")
    }
}

#[derive(Deserialize, Debug)]
struct Bar {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Deserialize, Debug)]
struct IntradayResponse {
    #[serde(rename = "Time Series (15min)")]
    time_series: Option<BTreeMap<String, Bar>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Deserialize, Debug)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, Bar>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

fn parse_daily_series(
    symbol: &str,
    series: BTreeMap<String, Bar>,
    count: usize,
) -> Vec<PricePoint> {
    let mut prices: Vec<PricePoint> = series
        .into_iter()
        .filter_map(|(date_str, bar)| {
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d");
            let price = bar.close.trim().parse::<f64>();
            match (date, price) {
                (Ok(date), Ok(price)) => Some(PricePoint::new(date, price)),
                _ => {
                    warn!(
                        "Could not parse price for date '{}' for symbol '{}': {:?}",
                        date_str, symbol, bar
                    );
                    None
                }
            }
        })
        .filter(|p| is_working_day(p.date))
        .collect();

    prices.sort_by(|a, b| b.date.cmp(&a.date));
    prices.truncate(count);
    prices
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    #[instrument(name = "AlphaVantageIntraday", skip(self), fields(symbol = %symbol))]
    async fn intraday_price(&self, symbol: &str) -> Result<Option<f64>> {
        let response: IntradayResponse = self
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol),
                ("interval", "15min"),
            ])
            .await?;

        // Timestamps are "YYYY-MM-DD HH:MM:SS", so the last key is the latest
        let Some((latest, bar)) = response.time_series.as_ref().and_then(|s| s.iter().last())
        else {
            warn!(
                "Could not retrieve intraday price for '{}': {}",
                symbol,
                response.notice.message()
            );
            return Ok(None);
        };

        let price = bar.close.trim().parse::<f64>().with_context(|| {
            format!("Invalid intraday price '{}' for {symbol} at {latest}", bar.close)
        })?;
        debug!("Intraday price for {} at {}: {}", symbol, latest, price);
        Ok(Some(price))
    }

    #[instrument(name = "AlphaVantageDaily", skip(self), fields(symbol = %symbol))]
    async fn daily_prices(&self, symbol: &str, count: usize) -> Result<Vec<PricePoint>> {
        let response: DailyResponse = self
            .query(&[("function", "TIME_SERIES_DAILY"), ("symbol", symbol)])
            .await?;

        let Some(series) = response.time_series else {
            warn!(
                "Missing daily time series for '{}': {}",
                symbol,
                response.notice.message()
            );
            return Ok(Vec::new());
        };

        let prices = parse_daily_series(symbol, series, count);
        debug!("Parsed {} daily prices for {}", prices.len(), symbol);
        Ok(prices)
    }
}

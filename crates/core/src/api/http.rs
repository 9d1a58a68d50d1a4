use crate::api::error::{ApiError, ApiResult};
use crate::api::StockApi;
use crate::config::Settings;
use crate::domain::period::Period;
use crate::domain::recommendation::{
    InvestmentHorizon, Recommendation, RecommendationRequest, RiskLevel,
};
use crate::domain::sentiment::SentimentBundle;
use crate::domain::stock::{HistoricalSeries, StockInfo};
use crate::domain::symbol::Symbol;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const STOCK_DATA_PATH: &str = "/GetStockData";
const STOCK_HISTORY_PATH: &str = "/GetStockHistory";
const SENTIMENT_PATH: &str = "/GetSentimentAnalysis";
const RECOMMENDATION_PATH: &str = "/GetInvestmentRecommendation";

const API_KEY_HEADER: &str = "x-functions-key";

#[derive(Debug, Clone)]
pub struct HttpStockApi {
    http: reqwest::Client,
    base_url: String,
}

/// Whether a 400/404 from this endpoint means "unknown symbol".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Symbol,
    Other,
}

impl HttpStockApi {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &settings.api_key {
            headers.insert(
                API_KEY_HEADER,
                HeaderValue::from_str(api_key).context("STOCK_API_KEY is not a valid header value")?,
            );
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build stock api http client")?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn read_json<T: DeserializeOwned>(
        res: reqwest::Response,
        symbol: &Symbol,
        lookup: Lookup,
    ) -> ApiResult<T> {
        let status = res.status();
        let text = res.text().await.map_err(network_error)?;

        if !status.is_success() {
            tracing::warn!(symbol = %symbol, %status, "stock api returned an error status");
            if lookup == Lookup::Symbol
                && matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND)
            {
                return Err(ApiError::NotFound {
                    symbol: symbol.clone(),
                });
            }
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            ApiError::Decode(format!("{e} (symbol={symbol}, body={})", truncate(&text, 200)))
        })
    }
}

#[async_trait::async_trait]
impl StockApi for HttpStockApi {
    async fn fetch_stock_info(&self, symbol: &Symbol) -> ApiResult<StockInfo> {
        tracing::debug!(symbol = %symbol, "fetching stock info");
        let res = self
            .http
            .get(self.url(STOCK_DATA_PATH))
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        let parsed: StockDataResponse = Self::read_json(res, symbol, Lookup::Symbol).await?;
        let mut info = parsed.info;
        if info.symbol.trim().is_empty() {
            info.symbol = parsed
                .symbol
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| symbol.to_string());
        }
        Ok(info)
    }

    async fn fetch_historical_series(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> ApiResult<HistoricalSeries> {
        tracing::debug!(symbol = %symbol, %period, "fetching price history");
        let res = self
            .http
            .get(self.url(STOCK_HISTORY_PATH))
            .query(&[("symbol", symbol.as_str()), ("period", period.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        let parsed: StockHistoryResponse = Self::read_json(res, symbol, Lookup::Other).await?;
        Ok(parsed.history)
    }

    async fn fetch_sentiment(&self, symbol: &Symbol) -> ApiResult<SentimentBundle> {
        tracing::debug!(symbol = %symbol, "fetching sentiment analysis");
        let res = self
            .http
            .get(self.url(SENTIMENT_PATH))
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        Self::read_json(res, symbol, Lookup::Other).await
    }

    async fn fetch_recommendation(
        &self,
        symbol: &Symbol,
        risk_level: RiskLevel,
        horizon: InvestmentHorizon,
        bundle: &SentimentBundle,
    ) -> ApiResult<Recommendation> {
        tracing::debug!(symbol = %symbol, %risk_level, %horizon, "requesting recommendation");
        let body = RecommendationRequest::new(symbol, risk_level, horizon, bundle);
        let res = self
            .http
            .post(self.url(RECOMMENDATION_PATH))
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        Self::read_json(res, symbol, Lookup::Other).await
    }
}

#[derive(Debug, Deserialize)]
struct StockDataResponse {
    #[serde(default)]
    symbol: Option<String>,
    info: StockInfo,
}

#[derive(Debug, Deserialize)]
struct StockHistoryResponse {
    history: HistoricalSeries,
}

fn network_error(err: reqwest::Error) -> ApiError {
    tracing::warn!(error = %err, "stock api transport failure");
    ApiError::Network(err)
}

/// Backend error bodies look like `{"error": "...", "status": 500}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| truncate(body, 200).to_string())
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

//! In-memory backend for flow tests.

use chrono::NaiveDate;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::api::error::{ApiError, ApiResult};
use crate::api::StockApi;
use crate::domain::period::Period;
use crate::domain::recommendation::{
    InvestmentHorizon, Recommendation, RecommendationRequest, RiskLevel,
};
use crate::domain::sentiment::SentimentBundle;
use crate::domain::stock::{bar, HistoricalSeries, StockInfo};
use crate::domain::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Call {
    StockInfo(String),
    History(String, Period),
    Sentiment(String),
    Recommendation(String),
}

#[derive(Default)]
pub(crate) struct FakeStockApi {
    stocks: HashMap<String, StockInfo>,
    histories: HashMap<String, HistoricalSeries>,
    sentiments: HashMap<String, SentimentBundle>,
    recommendations: HashMap<String, Recommendation>,
    failing: HashSet<Call>,
    calls: Mutex<Vec<Call>>,
    recommendation_bodies: Mutex<Vec<serde_json::Value>>,
}

impl FakeStockApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_stock(mut self, info: StockInfo) -> Self {
        self.stocks.insert(info.symbol.clone(), info);
        self
    }

    pub(crate) fn with_history(mut self, symbol: &str, series: HistoricalSeries) -> Self {
        self.histories.insert(symbol.to_string(), series);
        self
    }

    pub(crate) fn with_sentiment(mut self, bundle: SentimentBundle) -> Self {
        self.sentiments.insert(bundle.symbol.clone(), bundle);
        self
    }

    pub(crate) fn with_recommendation(mut self, symbol: &str, rec: Recommendation) -> Self {
        self.recommendations.insert(symbol.to_string(), rec);
        self
    }

    pub(crate) fn failing_stock_info(mut self, symbol: &str) -> Self {
        self.failing.insert(Call::StockInfo(symbol.to_string()));
        self
    }

    // Period is ignored when matching failures.
    pub(crate) fn failing_history(mut self, symbol: &str) -> Self {
        self.failing
            .insert(Call::History(symbol.to_string(), Period::default()));
        self
    }

    pub(crate) fn failing_sentiment(mut self, symbol: &str) -> Self {
        self.failing.insert(Call::Sentiment(symbol.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn recommendation_bodies(&self) -> Vec<serde_json::Value> {
        self.recommendation_bodies.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        let key = match &call {
            Call::History(symbol, _) => Call::History(symbol.clone(), Period::default()),
            other => other.clone(),
        };
        let fails = self.failing.contains(&key);
        self.calls.lock().unwrap().push(call);
        if fails {
            return Err(ApiError::Backend {
                status: 503,
                message: "scripted failure".into(),
            });
        }
        Ok(())
    }
}

fn missing(what: &str, symbol: &Symbol) -> ApiError {
    ApiError::Backend {
        status: 500,
        message: format!("no {what} scripted for {symbol}"),
    }
}

#[async_trait::async_trait]
impl StockApi for FakeStockApi {
    async fn fetch_stock_info(&self, symbol: &Symbol) -> ApiResult<StockInfo> {
        self.record(Call::StockInfo(symbol.to_string()))?;
        self.stocks
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                symbol: symbol.clone(),
            })
    }

    async fn fetch_historical_series(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> ApiResult<HistoricalSeries> {
        self.record(Call::History(symbol.to_string(), period))?;
        self.histories
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| missing("history", symbol))
    }

    async fn fetch_sentiment(&self, symbol: &Symbol) -> ApiResult<SentimentBundle> {
        self.record(Call::Sentiment(symbol.to_string()))?;
        self.sentiments
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| missing("sentiment", symbol))
    }

    async fn fetch_recommendation(
        &self,
        symbol: &Symbol,
        risk_level: RiskLevel,
        horizon: InvestmentHorizon,
        bundle: &SentimentBundle,
    ) -> ApiResult<Recommendation> {
        self.record(Call::Recommendation(symbol.to_string()))?;
        let body = RecommendationRequest::new(symbol, risk_level, horizon, bundle);
        self.recommendation_bodies
            .lock()
            .unwrap()
            .push(serde_json::to_value(&body).unwrap());
        self.recommendations
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| missing("recommendation", symbol))
    }
}

pub(crate) fn stock(symbol: &str, name: &str, price: f64) -> StockInfo {
    serde_json::from_value(json!({
        "symbol": symbol,
        "name": name,
        "sector": "Technology",
        "industry": "Consumer Electronics",
        "current_price": price,
        "market_cap": 2.87e12,
        "pe_ratio": 29.4,
        "dividend_yield": 0.0051,
        "day_high": price + 1.5,
        "day_low": price - 1.5,
        "volume": 51_234_000u64,
        "change_percent": 0.42,
        "currency": "USD"
    }))
    .unwrap()
}

pub(crate) fn series(days: usize) -> HistoricalSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let records = (0..days)
        .map(|i| {
            let close = 100.0 + (i % 17) as f64;
            bar(
                start + chrono::Duration::days(i as i64),
                close - 1.0,
                close + 1.0,
                close,
            )
        })
        .collect();
    HistoricalSeries::new(records)
}

pub(crate) fn bundle(symbol: &str) -> SentimentBundle {
    serde_json::from_value(json!({
        "symbol": symbol,
        "company_name": format!("{symbol} Corp"),
        "articles": [{
            "title": format!("{symbol} rallies"),
            "url": "https://news.example.com/1",
            "description": "Shares rose.",
            "source": "Reuters",
            "publishedAt": "2024-05-01T12:00:00Z"
        }],
        "market_metrics": {
            "Technical": {"Current Price": "$150.0", "RSI": "61.3"},
            "Valuation": {"P/E Ratio": 29.4}
        },
        "sentiment_analysis": format!("Sentiment for {symbol} is moderately positive."),
        "analysis_timestamp": "2024-05-01T12:34:56.123456"
    }))
    .unwrap()
}

pub(crate) fn recommendation(symbol: &str, text: &str) -> Recommendation {
    Recommendation {
        symbol: symbol.to_string(),
        recommendation: text.to_string(),
        current_price: Some(150.0),
        analysis_timestamp: Some("2024-05-01T12:40:00".to_string()),
    }
}

pub mod error;
pub mod http;

use crate::domain::period::Period;
use crate::domain::recommendation::{InvestmentHorizon, Recommendation, RiskLevel};
use crate::domain::sentiment::SentimentBundle;
use crate::domain::stock::{HistoricalSeries, StockInfo};
use crate::domain::symbol::Symbol;
use error::ApiResult;

pub use http::HttpStockApi;

/// Backend operations the dashboard depends on. No retries: every error is
/// handed back to the caller as-is.
#[async_trait::async_trait]
pub trait StockApi: Send + Sync {
    async fn fetch_stock_info(&self, symbol: &Symbol) -> ApiResult<StockInfo>;

    async fn fetch_historical_series(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> ApiResult<HistoricalSeries>;

    async fn fetch_sentiment(&self, symbol: &Symbol) -> ApiResult<SentimentBundle>;

    async fn fetch_recommendation(
        &self,
        symbol: &Symbol,
        risk_level: RiskLevel,
        horizon: InvestmentHorizon,
        bundle: &SentimentBundle,
    ) -> ApiResult<Recommendation>;

    /// Symbol lookup on top of `fetch_stock_info`. Unknown symbols yield an
    /// empty list instead of an error.
    async fn search(&self, query: &Symbol) -> ApiResult<Vec<StockInfo>> {
        match self.fetch_stock_info(query).await {
            Ok(info) => Ok(vec![info]),
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }
}

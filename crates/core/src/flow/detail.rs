use serde::Serialize;

use crate::api::error::ApiResult;
use crate::api::StockApi;
use crate::domain::period::Period;
use crate::domain::stock::{HistoricalSeries, PriceRange, StockInfo};
use crate::domain::symbol::Symbol;
use crate::flow::FlowError;

pub const DETAIL_FETCH_FAILED: &str = "Failed to fetch stock data. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum DetailStatus {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed(FlowError),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DetailState {
    status: DetailStatus,
    info: Option<StockInfo>,
    history: HistoricalSeries,
}

impl DetailState {
    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == DetailStatus::Ready
    }

    pub fn info(&self) -> Option<&StockInfo> {
        self.info.as_ref()
    }

    pub fn history(&self) -> &HistoricalSeries {
        &self.history
    }

    /// Derived from whatever history is currently held.
    pub fn fifty_two_week_range(&self) -> Option<PriceRange> {
        self.history.fifty_two_week_range()
    }

    pub fn error(&self) -> Option<&FlowError> {
        match &self.status {
            DetailStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Drops the previous symbol's data before anything new is requested.
    pub fn begin(&mut self) {
        self.info = None;
        self.history = HistoricalSeries::default();
        self.status = DetailStatus::Loading;
    }

    pub fn apply(&mut self, result: ApiResult<(StockInfo, HistoricalSeries)>) {
        match result {
            Ok((info, history)) => {
                self.info = Some(info);
                self.history = history;
                self.status = DetailStatus::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "stock detail fetch failed");
                self.info = None;
                self.history = HistoricalSeries::default();
                self.status = DetailStatus::Failed(FlowError::DataFetch(DETAIL_FETCH_FAILED.to_string()));
            }
        }
    }
}

/// Info and history in parallel; the first failure fails the pair.
pub async fn fetch(
    api: &dyn StockApi,
    symbol: &Symbol,
    period: Period,
) -> ApiResult<(StockInfo, HistoricalSeries)> {
    tokio::try_join!(
        api.fetch_stock_info(symbol),
        api.fetch_historical_series(symbol, period)
    )
}

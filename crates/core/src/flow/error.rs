use serde::Serialize;
use thiserror::Error;

pub const SELECT_STOCK_FIRST: &str = "Please select a stock first";
pub const GENERATE_SENTIMENT_FIRST: &str = "Please generate sentiment analysis first";

/// What a flow reports to the user. Every variant leaves the dashboard
/// usable; the same action can simply be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FlowError {
    /// A local precondition failed; nothing was sent to the backend.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DataFetch(String),
}

impl FlowError {
    pub fn select_stock_first() -> Self {
        FlowError::Validation(SELECT_STOCK_FIRST.to_string())
    }

    pub fn generate_sentiment_first() -> Self {
        FlowError::Validation(GENERATE_SENTIMENT_FIRST.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FlowError::Validation(_))
    }
}

use thiserror::Error;

use crate::domain::symbol::Symbol;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("symbol not found: {symbol}")]
    NotFound { symbol: Symbol },

    #[error("network error")]
    Network(#[source] reqwest::Error),

    #[error("backend HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("invalid backend response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

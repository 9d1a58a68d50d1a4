use serde::Serialize;

use crate::api::error::ApiResult;
use crate::domain::recommendation::{InvestmentHorizon, Recommendation, RiskLevel};
use crate::domain::sentiment::SentimentBundle;
use crate::domain::symbol::Symbol;
use crate::flow::FlowError;

pub const RECOMMENDATION_FETCH_FAILED: &str =
    "Error getting AI recommendations. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub risk_level: RiskLevel,
    pub investment_horizon: InvestmentHorizon,
}

/// A recommendation together with the inputs it was generated for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRecommendation {
    pub recommendation: Recommendation,
    pub risk_level: RiskLevel,
    pub investment_horizon: InvestmentHorizon,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendationState {
    loading: bool,
    current: Option<GeneratedRecommendation>,
    error: Option<FlowError>,
}

/// Local checks; a failure here means no request is made.
pub fn validate<'a>(
    symbol: Option<&'a Symbol>,
    bundle: Option<&'a SentimentBundle>,
) -> Result<(&'a Symbol, &'a SentimentBundle), FlowError> {
    let symbol = symbol.ok_or_else(FlowError::select_stock_first)?;
    let bundle = bundle.ok_or_else(FlowError::generate_sentiment_first)?;
    Ok((symbol, bundle))
}

impl RecommendationState {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current(&self) -> Option<&GeneratedRecommendation> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    pub fn reject(&mut self, err: FlowError) {
        self.error = Some(err);
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A failed request also drops the previous recommendation.
    pub fn apply(&mut self, preferences: Preferences, result: ApiResult<Recommendation>) {
        self.loading = false;
        match result {
            Ok(recommendation) => {
                self.current = Some(GeneratedRecommendation {
                    recommendation,
                    risk_level: preferences.risk_level,
                    investment_horizon: preferences.investment_horizon,
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "recommendation request failed");
                self.current = None;
                self.error = Some(FlowError::DataFetch(
                    RECOMMENDATION_FETCH_FAILED.to_string(),
                ));
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

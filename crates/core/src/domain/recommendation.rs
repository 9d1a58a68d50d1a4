use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::sentiment::{MarketMetrics, SentimentBundle};
use crate::domain::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentHorizon {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [
        RiskLevel::Conservative,
        RiskLevel::Moderate,
        RiskLevel::Aggressive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Conservative => "conservative",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Aggressive => "aggressive",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            RiskLevel::Conservative => "Lower risk, stable returns",
            RiskLevel::Moderate => "Balanced risk-reward ratio",
            RiskLevel::Aggressive => "Higher risk, potential higher returns",
        }
    }
}

impl InvestmentHorizon {
    pub const ALL: [InvestmentHorizon; 3] = [
        InvestmentHorizon::ShortTerm,
        InvestmentHorizon::MediumTerm,
        InvestmentHorizon::LongTerm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InvestmentHorizon::ShortTerm => "short-term",
            InvestmentHorizon::MediumTerm => "medium-term",
            InvestmentHorizon::LongTerm => "long-term",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InvestmentHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RiskLevel::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| {
                format!("unknown risk level {s:?} (expected conservative, moderate or aggressive)")
            })
    }
}

impl FromStr for InvestmentHorizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        InvestmentHorizon::ALL
            .into_iter()
            .find(|h| h.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown investment horizon {s:?} (expected short-term, medium-term or long-term)"
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub symbol: String,
    pub recommendation: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub analysis_timestamp: Option<String>,
}

/// POST body for the recommendation endpoint. Carries the narrative and
/// metrics from the sentiment bundle; articles stay behind.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest<'a> {
    pub symbol: &'a Symbol,
    pub risk_level: RiskLevel,
    pub investment_horizon: InvestmentHorizon,
    pub sentiment_analysis: &'a str,
    pub market_metrics: &'a MarketMetrics,
}

impl<'a> RecommendationRequest<'a> {
    pub fn new(
        symbol: &'a Symbol,
        risk_level: RiskLevel,
        investment_horizon: InvestmentHorizon,
        bundle: &'a SentimentBundle,
    ) -> Self {
        Self {
            symbol,
            risk_level,
            investment_horizon,
            sentiment_analysis: &bundle.sentiment_analysis,
            market_metrics: &bundle.market_metrics,
        }
    }
}

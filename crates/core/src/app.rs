use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::StockApi;
use crate::domain::period::Period;
use crate::domain::recommendation::{InvestmentHorizon, Recommendation, RiskLevel};
use crate::domain::sentiment::SentimentBundle;
use crate::domain::stock::{HistoricalSeries, StockInfo};
use crate::domain::symbol::Symbol;
use crate::flow::detail::{self, DetailState};
use crate::flow::recommendation::{self, Preferences, RecommendationState};
use crate::flow::search::{self, SearchPhase, SearchState};
use crate::flow::sentiment::SentimentState;
use crate::flow::FlowError;

/// Identifies the selection a request was issued for. Responses carrying a
/// tag that is no longer current are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    symbol: Symbol,
    generation: u64,
}

impl RequestTag {
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationTicket {
    pub tag: RequestTag,
    pub preferences: Preferences,
    pub bundle: SentimentBundle,
}

/// Everything the dashboard shows. Sentiment and recommendation always
/// belong to `selected`; selecting again wipes them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub search: SearchState,
    selected: Option<Symbol>,
    #[serde(skip)]
    generation: u64,
    pub detail: DetailState,
    pub sentiment: SentimentState,
    pub recommendation: RecommendationState,
    pub preferences: Preferences,
}

impl AppState {
    pub fn selected(&self) -> Option<&Symbol> {
        self.selected.as_ref()
    }

    pub fn current_tag(&self) -> Option<RequestTag> {
        self.selected.as_ref().map(|symbol| RequestTag {
            symbol: symbol.clone(),
            generation: self.generation,
        })
    }

    fn is_current(&self, tag: &RequestTag) -> bool {
        self.generation == tag.generation && self.selected.as_ref() == Some(&tag.symbol)
    }

    /// New selection: stale panels are cleared first, then detail starts
    /// loading. The returned tag must accompany the detail response.
    pub fn select(&mut self, symbol: Symbol) -> RequestTag {
        self.generation += 1;
        self.sentiment.clear();
        self.recommendation.clear();
        self.detail.begin();
        self.search.clear();
        self.selected = Some(symbol.clone());
        RequestTag {
            symbol,
            generation: self.generation,
        }
    }

    pub fn commit_detail(
        &mut self,
        tag: &RequestTag,
        result: ApiResult<(StockInfo, HistoricalSeries)>,
    ) -> bool {
        if !self.is_current(tag) {
            tracing::debug!(symbol = %tag.symbol, "dropping stale stock detail response");
            return false;
        }
        self.detail.apply(result);
        true
    }

    pub fn begin_sentiment(&mut self) -> Result<RequestTag, FlowError> {
        let tag = self.current_tag().ok_or_else(FlowError::select_stock_first)?;
        self.sentiment.begin();
        Ok(tag)
    }

    pub fn commit_sentiment(&mut self, tag: &RequestTag, result: ApiResult<SentimentBundle>) -> bool {
        if !self.is_current(tag) {
            tracing::debug!(symbol = %tag.symbol, "dropping stale sentiment response");
            return false;
        }
        self.sentiment.apply(result);
        true
    }

    pub fn begin_recommendation(&mut self) -> Result<RecommendationTicket, FlowError> {
        let checked = recommendation::validate(self.selected.as_ref(), self.sentiment.bundle())
            .map(|(_, bundle)| bundle.clone());
        let bundle = match checked {
            Ok(bundle) => bundle,
            Err(err) => {
                self.recommendation.reject(err.clone());
                return Err(err);
            }
        };
        let tag = self.current_tag().ok_or_else(FlowError::select_stock_first)?;
        self.recommendation.begin();
        Ok(RecommendationTicket {
            tag,
            preferences: self.preferences,
            bundle,
        })
    }

    pub fn commit_recommendation(
        &mut self,
        ticket: &RecommendationTicket,
        result: ApiResult<Recommendation>,
    ) -> bool {
        if !self.is_current(&ticket.tag) {
            tracing::debug!(symbol = %ticket.tag.symbol, "dropping stale recommendation response");
            return false;
        }
        self.recommendation.apply(ticket.preferences, result);
        true
    }

    pub fn set_risk_level(&mut self, risk_level: RiskLevel) {
        self.preferences.risk_level = risk_level;
    }

    pub fn set_investment_horizon(&mut self, horizon: InvestmentHorizon) {
        self.preferences.investment_horizon = horizon;
    }
}

/// Drives the flows against a backend, one user action at a time.
pub struct Dashboard {
    api: Arc<dyn StockApi>,
    state: AppState,
    history_period: Period,
}

impl Dashboard {
    pub fn new(api: Arc<dyn StockApi>) -> Self {
        Self {
            api,
            state: AppState::default(),
            history_period: Period::default(),
        }
    }

    pub fn with_history_period(mut self, period: Period) -> Self {
        self.history_period = period;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history_period(&self) -> Period {
        self.history_period
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub async fn search(&mut self, query: &str) -> &SearchPhase {
        search::run(self.api.as_ref(), &mut self.state.search, query).await;
        self.state.search.phase()
    }

    /// Empties the search box, dropping any result or error.
    pub fn clear_search(&mut self) {
        self.state.search.set_query("");
    }

    /// Selects the current search hit, if any, and loads its detail view.
    pub async fn select_result(&mut self) -> Result<Symbol, FlowError> {
        let symbol = self
            .state
            .search
            .take_selection()
            .ok_or_else(|| FlowError::Validation("No search result to select".to_string()))?;
        self.select(symbol.clone()).await?;
        Ok(symbol)
    }

    pub async fn select(&mut self, symbol: Symbol) -> Result<(), FlowError> {
        let tag = self.state.select(symbol);
        tracing::info!(symbol = %tag.symbol(), period = %self.history_period, "loading stock detail");
        let result = detail::fetch(self.api.as_ref(), tag.symbol(), self.history_period).await;
        self.state.commit_detail(&tag, result);
        self.state.detail.error().cloned().map_or(Ok(()), Err)
    }

    pub async fn load_sentiment(&mut self) -> Result<(), FlowError> {
        let tag = self.state.begin_sentiment()?;
        tracing::info!(symbol = %tag.symbol(), "requesting sentiment analysis");
        let result = self.api.fetch_sentiment(tag.symbol()).await;
        self.state.commit_sentiment(&tag, result);
        self.state.sentiment.error().cloned().map_or(Ok(()), Err)
    }

    pub fn toggle_sentiment(&mut self) -> bool {
        self.state.sentiment.toggle_visible()
    }

    pub async fn recommend(&mut self) -> Result<(), FlowError> {
        let ticket = self.state.begin_recommendation()?;
        tracing::info!(
            symbol = %ticket.tag.symbol(),
            risk_level = %ticket.preferences.risk_level,
            horizon = %ticket.preferences.investment_horizon,
            "requesting recommendation"
        );
        let result = self
            .api
            .fetch_recommendation(
                ticket.tag.symbol(),
                ticket.preferences.risk_level,
                ticket.preferences.investment_horizon,
                &ticket.bundle,
            )
            .await;
        self.state.commit_recommendation(&ticket, result);
        self.state.recommendation.error().cloned().map_or(Ok(()), Err)
    }

    /// Chart data for another window. Does not touch the detail view.
    pub async fn chart_history(&self, period: Period) -> Result<HistoricalSeries, FlowError> {
        let symbol = self
            .state
            .selected()
            .ok_or_else(FlowError::select_stock_first)?;
        self.api
            .fetch_historical_series(symbol, period)
            .await
            .map_err(|err| {
                tracing::warn!(symbol = %symbol, %period, error = %err, "chart history fetch failed");
                FlowError::DataFetch(detail::DETAIL_FETCH_FAILED.to_string())
            })
    }
}

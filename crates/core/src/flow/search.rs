use serde::Serialize;

use crate::api::error::ApiResult;
use crate::api::StockApi;
use crate::domain::stock::StockInfo;
use crate::domain::symbol::Symbol;
use crate::flow::FlowError;

pub const INVALID_SYMBOL_MESSAGE: &str =
    "This stock symbol does not exist. Please enter a valid stock symbol.";

pub fn not_found_message(symbol: &Symbol) -> String {
    format!("Stock \"{symbol}\" not found. Please check the symbol and try again.")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching { symbol: Symbol },
    Found { stock: StockInfo },
    NotFound { message: String },
    Errored { message: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    query: String,
    phase: SearchPhase,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Mirrors the text box: clearing it drops results and errors.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        if query.is_empty() {
            self.phase = SearchPhase::Idle;
        }
    }

    /// Starts a search. Blank input clears results and returns `None`, in
    /// which case no request must be made.
    pub fn begin(&mut self, query: &str) -> Option<Symbol> {
        self.query = query.to_string();
        let Some(symbol) = Symbol::parse(query) else {
            self.phase = SearchPhase::Idle;
            return None;
        };
        self.phase = SearchPhase::Searching {
            symbol: symbol.clone(),
        };
        Some(symbol)
    }

    pub fn finish(&mut self, symbol: &Symbol, result: ApiResult<Vec<StockInfo>>) {
        self.phase = match result {
            Ok(results) => match results.into_iter().find(StockInfo::is_usable) {
                Some(stock) => SearchPhase::Found { stock },
                None => SearchPhase::NotFound {
                    message: not_found_message(symbol),
                },
            },
            Err(err) => {
                tracing::warn!(symbol = %symbol, error = %err, "stock search failed");
                SearchPhase::Errored {
                    message: INVALID_SYMBOL_MESSAGE.to_string(),
                }
            }
        };
    }

    pub fn results(&self) -> &[StockInfo] {
        match &self.phase {
            SearchPhase::Found { stock } => std::slice::from_ref(stock),
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<FlowError> {
        match &self.phase {
            SearchPhase::NotFound { message } => Some(FlowError::NotFound(message.clone())),
            SearchPhase::Errored { message } => Some(FlowError::DataFetch(message.clone())),
            _ => None,
        }
    }

    /// Picks the found result and resets the search box to it.
    pub fn take_selection(&mut self) -> Option<Symbol> {
        let SearchPhase::Found { stock } = &self.phase else {
            return None;
        };
        let symbol = stock
            .canonical_symbol()
            .or_else(|| Symbol::parse(&self.query))?;
        self.query = symbol.to_string();
        self.phase = SearchPhase::Idle;
        Some(symbol)
    }

    pub fn clear(&mut self) {
        self.phase = SearchPhase::Idle;
    }
}

pub async fn run(api: &dyn StockApi, state: &mut SearchState, query: &str) {
    let Some(symbol) = state.begin(query) else {
        return;
    };
    let result = api.search(&symbol).await;
    state.finish(&symbol, result);
}

use serde::Serialize;

use crate::api::error::ApiResult;
use crate::domain::sentiment::SentimentBundle;
use crate::flow::FlowError;

pub const SENTIMENT_FETCH_FAILED: &str = "Error fetching sentiment analysis. Please try again.";

#[derive(Debug, Clone, Default, Serialize)]
pub struct SentimentState {
    loading: bool,
    bundle: Option<SentimentBundle>,
    visible: bool,
    error: Option<FlowError>,
}

impl SentimentState {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Present only after a successful fetch for the current symbol. Gates
    /// the recommendation flow.
    pub fn bundle(&self) -> Option<&SentimentBundle> {
        self.bundle.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply(&mut self, result: ApiResult<SentimentBundle>) {
        self.loading = false;
        match result {
            Ok(bundle) => {
                self.bundle = Some(bundle);
                self.visible = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "sentiment fetch failed");
                self.bundle = None;
                self.visible = false;
                self.error = Some(FlowError::DataFetch(SENTIMENT_FETCH_FAILED.to_string()));
            }
        }
    }

    /// Show/hide the panel. Hiding keeps the bundle.
    pub fn toggle_visible(&mut self) -> bool {
        if self.bundle.is_some() {
            self.visible = !self.visible;
        }
        self.visible
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::null_as_empty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentBundle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company_name: String,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub market_metrics: MarketMetrics,
    pub sentiment_analysis: String,
    #[serde(default)]
    pub analysis_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "source_name")]
    pub source: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

/// Category name → (metric name → value), in backend order. Values are
/// preformatted strings ("$1.2B", "N/A") or bare numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketMetrics(Map<String, Value>);

pub const NOT_AVAILABLE: &str = "N/A";

impl MarketMetrics {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, category: &str, metric: &str) -> Option<String> {
        self.0
            .get(category)?
            .as_object()?
            .get(metric)
            .map(display_value)
    }

    /// Categories with at least one available value, each with its metrics
    /// rendered as display strings.
    pub fn visible_categories(&self) -> Vec<(&str, Vec<(&str, String)>)> {
        self.0
            .iter()
            .filter_map(|(category, metrics)| {
                let metrics = metrics.as_object()?;
                let rows: Vec<_> = metrics
                    .iter()
                    .map(|(k, v)| (k.as_str(), display_value(v)))
                    .collect();
                rows.iter()
                    .any(|(_, v)| v != NOT_AVAILABLE)
                    .then_some((category.as_str(), rows))
            })
            .collect()
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::String(s) if s.trim().is_empty() => NOT_AVAILABLE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Some backend revisions forward NewsAPI's `{ "id": .., "name": .. }` object.
fn source_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Name(String),
        Object {
            #[serde(default)]
            name: Option<String>,
        },
    }

    Ok(match Option::<Source>::deserialize(deserializer)? {
        Some(Source::Name(name)) => name,
        Some(Source::Object { name }) => name.unwrap_or_default(),
        None => String::new(),
    })
}

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::null_as_empty;
use crate::domain::symbol::Symbol;

/// Trailing window used for the 52-week range.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sector: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub industry: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Fraction, not percent: 0.0081 is 0.81%.
    pub dividend_yield: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<u64>,
    pub change_percent: Option<f64>,
    #[serde(default = "default_currency", deserialize_with = "currency_or_default")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn currency_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(default_currency))
}

impl StockInfo {
    /// The backend answers unknown tickers with zeroed placeholders, so a
    /// usable record needs a name and a non-zero price.
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty()
            && self
                .current_price
                .is_some_and(|p| p.is_finite() && p != 0.0)
    }

    pub fn canonical_symbol(&self) -> Option<Symbol> {
        Symbol::parse(&self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

/// Daily bars, always ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoricalRecord>", into = "Vec<HistoricalRecord>")]
pub struct HistoricalSeries {
    records: Vec<HistoricalRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub first_close: f64,
    pub last_close: f64,
    pub absolute: f64,
    /// `None` when the first close is zero.
    pub percent: Option<f64>,
}

impl HistoricalSeries {
    pub fn new(mut records: Vec<HistoricalRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.close)
    }

    /// The last `TRADING_DAYS_PER_YEAR` records (or all of them if fewer).
    pub fn trailing_year(&self) -> &[HistoricalRecord] {
        let start = self.records.len().saturating_sub(TRADING_DAYS_PER_YEAR);
        &self.records[start..]
    }

    pub fn fifty_two_week_range(&self) -> Option<PriceRange> {
        let window = self.trailing_year();
        let first = window.first()?;
        let init = PriceRange {
            low: first.low,
            high: first.high,
        };
        Some(window.iter().fold(init, |acc, r| PriceRange {
            low: acc.low.min(r.low),
            high: acc.high.max(r.high),
        }))
    }

    pub fn period_change(&self) -> Option<PriceChange> {
        let first_close = self.records.first()?.close;
        let last_close = self.records.last()?.close;
        let absolute = last_close - first_close;
        let percent = (first_close != 0.0).then(|| absolute / first_close * 100.0);
        Some(PriceChange {
            first_close,
            last_close,
            absolute,
            percent,
        })
    }
}

impl From<Vec<HistoricalRecord>> for HistoricalSeries {
    fn from(records: Vec<HistoricalRecord>) -> Self {
        Self::new(records)
    }
}

impl From<HistoricalSeries> for Vec<HistoricalRecord> {
    fn from(series: HistoricalSeries) -> Self {
        series.records
    }
}

#[cfg(test)]
pub(crate) fn bar(date: NaiveDate, low: f64, high: f64, close: f64) -> HistoricalRecord {
    HistoricalRecord {
        date,
        open: close,
        high,
        low,
        close,
        volume: 1_000,
    }
}

pub mod period;
pub mod recommendation;
pub mod sentiment;
pub mod stock;
pub mod symbol;

use serde::{Deserialize, Deserializer};

/// The backend forwards yfinance's `None` as `null` for text fields it
/// otherwise defaults to `""`.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Uppercase ticker. The only key that ties the flows together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trims and uppercases free-text input. Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::parse(&value).ok_or_else(|| "symbol must be non-empty".to_string())
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let s = Symbol::parse("  msft ").unwrap();
        assert_eq!(s.as_str(), "MSFT");
        assert_eq!(s.to_string(), "MSFT");
    }

    #[test]
    fn blank_input_is_not_a_symbol() {
        assert!(Symbol::parse("").is_none());
        assert!(Symbol::parse("   \t").is_none());
    }

    #[test]
    fn deserializes_from_lowercase_string() {
        let s: Symbol = serde_json::from_str("\"aapl\"").unwrap();
        assert_eq!(s.as_str(), "AAPL");
        assert!(serde_json::from_str::<Symbol>("\"  \"").is_err());
    }
}

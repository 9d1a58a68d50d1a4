pub mod api;
pub mod app;
pub mod domain;
pub mod flow;
pub mod format;

#[cfg(test)]
pub(crate) mod testing;

pub mod config {
    use crate::domain::period::Period;
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:7071/api";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: String,
        pub api_key: Option<String>,
        pub request_timeout: Option<Duration>,
        pub history_period: Period,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let api_base_url = std::env::var("STOCK_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

            let request_timeout = match std::env::var("STOCK_API_TIMEOUT_SECS") {
                Ok(s) => Some(Duration::from_secs(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("STOCK_API_TIMEOUT_SECS is not a number: {s}"))?,
                )),
                Err(_) => None,
            };

            let history_period = match std::env::var("STOCK_HISTORY_PERIOD") {
                Ok(s) => s
                    .parse::<Period>()
                    .map_err(|e| anyhow::anyhow!("STOCK_HISTORY_PERIOD is invalid: {e}"))?,
                Err(_) => Period::default(),
            };

            Ok(Self {
                api_base_url,
                api_key: std::env::var("STOCK_API_KEY").ok().filter(|s| !s.is_empty()),
                request_timeout,
                history_period,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
            self.api_base_url = base_url.into();
            self
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                api_key: None,
                request_timeout: None,
                history_period: Period::default(),
                sentry_dsn: None,
            }
        }
    }
}

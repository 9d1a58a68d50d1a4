use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockscreen_core::api::HttpStockApi;
use stockscreen_core::app::Dashboard;
use stockscreen_core::domain::period::Period;
use stockscreen_core::domain::recommendation::{InvestmentHorizon, RiskLevel};
use stockscreen_core::flow::search::SearchPhase;

mod interactive;
mod render;

#[derive(Debug, Parser)]
#[command(name = "stockscreen", about = "Stock search, detail and AI analysis from the terminal")]
struct Args {
    /// Backend base URL. Overrides STOCK_API_BASE_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print the dashboard state as JSON instead of text panels.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look a symbol up.
    Search { query: String },

    /// Stock info, 52-week range and price chart.
    Show {
        symbol: String,

        /// Chart window (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max).
        #[arg(long)]
        period: Option<Period>,
    },

    /// Stock detail followed by the AI sentiment bundle.
    Sentiment { symbol: String },

    /// Stock detail, sentiment, then a personalized recommendation.
    Recommend {
        symbol: String,

        #[arg(long, default_value_t = RiskLevel::default())]
        risk: RiskLevel,

        #[arg(long, default_value_t = InvestmentHorizon::default())]
        horizon: InvestmentHorizon,
    },

    /// Read commands from stdin against one long-lived dashboard.
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = stockscreen_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(url) = args.api_url {
        settings = settings.with_base_url(url);
    }

    let api = HttpStockApi::from_settings(&settings)?;
    tracing::debug!(base_url = api.base_url(), "stock api configured");
    let mut dash = Dashboard::new(Arc::new(api)).with_history_period(settings.history_period);

    let res = match args.command {
        Command::Search { query } => {
            dash.search(&query).await;
            emit(&dash, args.json, |d| render::search(&d.state().search))
        }
        Command::Show { symbol, period } => {
            open(&mut dash, &symbol).await?;
            let chart = match period.filter(|p| *p != settings.history_period) {
                Some(p) => Some((p, dash.chart_history(p).await?)),
                None => None,
            };
            emit(&dash, args.json, |d| {
                let chart = chart
                    .as_ref()
                    .map(|(p, s)| (*p, s))
                    .unwrap_or((settings.history_period, d.state().detail.history()));
                render::detail(&d.state().detail, chart)
            })
        }
        Command::Sentiment { symbol } => {
            open(&mut dash, &symbol).await?;
            dash.load_sentiment().await?;
            emit(&dash, args.json, |d| {
                format!(
                    "{}\n{}",
                    render::detail_summary(&d.state().detail),
                    render::sentiment(&d.state().sentiment)
                )
            })
        }
        Command::Recommend {
            symbol,
            risk,
            horizon,
        } => {
            open(&mut dash, &symbol).await?;
            dash.load_sentiment().await?;
            dash.state_mut().set_risk_level(risk);
            dash.state_mut().set_investment_horizon(horizon);
            dash.recommend().await?;
            emit(&dash, args.json, |d| {
                format!(
                    "{}\n{}",
                    render::detail_summary(&d.state().detail),
                    render::recommendation(&d.state().recommendation)
                )
            })
        }
        Command::Interactive => interactive::run(&mut dash).await,
    };

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
    }
    res
}

/// Search, then select the hit so the detail view loads.
async fn open(dash: &mut Dashboard, symbol: &str) -> anyhow::Result<()> {
    match dash.search(symbol).await {
        SearchPhase::Found { .. } => {}
        SearchPhase::NotFound { message } | SearchPhase::Errored { message } => {
            anyhow::bail!("{message}")
        }
        SearchPhase::Idle | SearchPhase::Searching { .. } => {
            anyhow::bail!("enter a stock symbol")
        }
    }
    dash.select_result().await?;
    Ok(())
}

fn emit(dash: &Dashboard, json: bool, text: impl FnOnce(&Dashboard) -> String) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(dash.state()).context("failed to serialize state")?;
        println!("{out}");
    } else {
        println!("{}", text(dash));
    }
    Ok(())
}

fn init_sentry(settings: &stockscreen_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

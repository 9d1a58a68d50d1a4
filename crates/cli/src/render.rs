use std::fmt::Write;

use stockscreen_core::domain::period::Period;
use stockscreen_core::domain::stock::HistoricalSeries;
use stockscreen_core::flow::detail::{DetailState, DetailStatus};
use stockscreen_core::flow::recommendation::RecommendationState;
use stockscreen_core::flow::search::{SearchPhase, SearchState};
use stockscreen_core::flow::sentiment::SentimentState;
use stockscreen_core::format;

const CHART_WIDTH: usize = 60;

pub fn search(state: &SearchState) -> String {
    if let Some(err) = state.error() {
        return format!("error: {err}");
    }
    if let SearchPhase::Searching { symbol } = state.phase() {
        return format!("Searching for {symbol}...");
    }
    match state.results().first() {
        Some(stock) => format!(
            "{} ({})  {}  {}\n{} · {}",
            stock.name,
            stock.symbol,
            format::currency(stock.current_price, &stock.currency),
            format::signed_percent(stock.change_percent),
            or_na(&stock.sector),
            or_na(&stock.industry),
        ),
        None => "No search results.".to_string(),
    }
}

pub fn detail_summary(state: &DetailState) -> String {
    match (state.status(), state.info()) {
        (DetailStatus::Ready, Some(info)) => format!(
            "{} ({})  {}  {}",
            info.name,
            info.symbol,
            format::currency(info.current_price, &info.currency),
            format::signed_percent(info.change_percent)
        ),
        (DetailStatus::Failed(err), _) => format!("error: {err}"),
        (DetailStatus::Loading, _) => "Loading stock data...".to_string(),
        _ => "No stock selected.".to_string(),
    }
}

pub fn detail(state: &DetailState, chart: (Period, &HistoricalSeries)) -> String {
    let Some(info) = state.info().filter(|_| state.is_ready()) else {
        return detail_summary(state);
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", detail_summary(state));
    let _ = writeln!(out, "{} · {}", or_na(&info.sector), or_na(&info.industry));
    let _ = writeln!(out);

    let range = state.fifty_two_week_range();
    let rows = [
        ("Market Cap", format::large_money(info.market_cap)),
        ("P/E Ratio", format::number(info.pe_ratio.filter(|v| *v != 0.0), 2)),
        ("Dividend Yield", format::dividend_yield(info.dividend_yield)),
        ("Volume", format::volume(info.volume)),
        (
            "Day Range",
            format!(
                "{} - {}",
                format::currency(info.day_low, &info.currency),
                format::currency(info.day_high, &info.currency)
            ),
        ),
        (
            "52-Week Range",
            format!(
                "{} - {}",
                format::currency(range.map(|r| r.low), &info.currency),
                format::currency(range.map(|r| r.high), &info.currency)
            ),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<15} {value}");
    }

    let (period, series) = chart;
    let _ = writeln!(out);
    match series.period_change() {
        Some(change) => {
            let _ = writeln!(
                out,
                "Price ({period})  {}  {}",
                format::currency(Some(change.absolute), &info.currency),
                format::signed_percent(change.percent)
            );
            let closes: Vec<f64> = series.closes().collect();
            let _ = write!(out, "  {}", format::sparkline(&closes, CHART_WIDTH));
        }
        None => {
            let _ = write!(out, "Price ({period})  no data");
        }
    }
    out
}

pub fn sentiment(state: &SentimentState) -> String {
    if state.is_loading() {
        return "Analyzing market sentiment...".to_string();
    }
    if let Some(err) = state.error() {
        return format!("error: {err}");
    }
    let Some(bundle) = state.bundle() else {
        return "No sentiment analysis yet.".to_string();
    };
    if !state.is_visible() {
        return format!("Sentiment analysis for {} (hidden)", bundle.symbol);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Market sentiment: {} ({})  as of {}",
        or_na(&bundle.company_name),
        bundle.symbol,
        format::timestamp(bundle.analysis_timestamp.as_deref())
    );

    for (category, metrics) in bundle.market_metrics.visible_categories() {
        let _ = writeln!(out, "\n[{category}]");
        for (name, value) in metrics {
            let _ = writeln!(out, "  {name:<20} {value}");
        }
    }

    let _ = writeln!(out, "\n{}", bundle.sentiment_analysis.trim());

    if !bundle.articles.is_empty() {
        let _ = writeln!(out, "\nNews");
        for article in &bundle.articles {
            let _ = writeln!(
                out,
                "  - {}\n    {} - {}\n    {}",
                article.title,
                or_na(&article.source),
                format::timestamp(Some(&article.published_at)),
                article.url
            );
        }
    }
    out.trim_end().to_string()
}

pub fn recommendation(state: &RecommendationState) -> String {
    if state.is_loading() {
        return "Generating recommendation...".to_string();
    }
    if let Some(err) = state.error() {
        return format!("error: {err}");
    }
    let Some(current) = state.current() else {
        return "No recommendation yet.".to_string();
    };

    format!(
        "AI recommendation · risk: {} ({}) · horizon: {}  as of {}\n\n{}",
        current.risk_level,
        current.risk_level.describe(),
        current.investment_horizon,
        format::timestamp(current.recommendation.analysis_timestamp.as_deref()),
        current.recommendation.recommendation.trim()
    )
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        format::NOT_AVAILABLE
    } else {
        s
    }
}

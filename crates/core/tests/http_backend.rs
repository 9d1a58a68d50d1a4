use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stockscreen_core::api::error::ApiError;
use stockscreen_core::api::{HttpStockApi, StockApi};
use stockscreen_core::app::Dashboard;
use stockscreen_core::config::Settings;
use stockscreen_core::domain::period::Period;
use stockscreen_core::domain::recommendation::{InvestmentHorizon, RiskLevel};
use stockscreen_core::domain::symbol::Symbol;
use stockscreen_core::flow::search::SearchPhase;

#[derive(Clone, Default)]
struct Backend {
    history_periods: Arc<Mutex<Vec<String>>>,
    recommendation_bodies: Arc<Mutex<Vec<Value>>>,
}

type Params = Query<HashMap<String, String>>;

async fn stock_data(Query(q): Params) -> (StatusCode, Json<Value>) {
    match q.get("symbol").map(String::as_str) {
        Some("AAPL") => (
            StatusCode::OK,
            Json(json!({
                "symbol": "AAPL",
                "info": {
                    "symbol": "AAPL",
                    "name": "Apple Inc.",
                    "current_price": 150.0,
                    "change_percent": 0.42,
                    "volume": 51234000,
                    "market_cap": 2870000000000.0,
                    "pe_ratio": 29.4,
                    "dividend_yield": 0.0051,
                    "sector": "Technology",
                    "industry": "Consumer Electronics",
                    "day_high": 151.2,
                    "day_low": 148.9,
                    "currency": "USD"
                }
            })),
        ),
        Some("BROKEN") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"symbol": "BROKEN", "error": "yfinance exploded", "status": 500})),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid stock symbol", "status": 400})),
        ),
    }
}

async fn stock_history(State(backend): State<Backend>, Query(q): Params) -> (StatusCode, Json<Value>) {
    if let Some(period) = q.get("period") {
        backend.history_periods.lock().unwrap().push(period.clone());
    }
    if q.get("symbol").map(String::as_str) != Some("AAPL") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid stock symbol or no historical data available", "status": 400})),
        );
    }
    // newest first
    (
        StatusCode::OK,
        Json(json!({
            "symbol": "AAPL",
            "history": [
                {"date": "2024-05-03", "open": 150.0, "high": 155.0, "low": 149.0, "close": 154.0, "volume": 3},
                {"date": "2024-05-02", "open": 148.0, "high": 151.0, "low": 140.0, "close": 150.0, "volume": 2},
                {"date": "2024-05-01", "open": 147.0, "high": 149.0, "low": 146.0, "close": 148.0, "volume": 1}
            ]
        })),
    )
}

async fn sentiment(Query(q): Params) -> Json<Value> {
    let symbol = q.get("symbol").cloned().unwrap_or_default();
    Json(json!({
        "symbol": symbol,
        "company_name": "Apple Inc.",
        "market_metrics": {
            "Technical": {"Current Price": "$150.0", "RSI": "61.3", "Beta": 1.29},
            "Market Sentiment": {"Analyst Rating": "N/A", "Short % of Float": "N/A"}
        },
        "articles": [{
            "title": "Apple beats estimates",
            "description": "Revenue up.",
            "url": "https://news.example.com/apple",
            "publishedAt": "2024-05-02T21:00:00Z",
            "source": "Reuters"
        }],
        "sentiment_analysis": "Moderately bullish.",
        "analysis_timestamp": "2024-05-03T09:15:00.000001"
    }))
}

async fn recommendation(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    let symbol = body["symbol"].clone();
    backend.recommendation_bodies.lock().unwrap().push(body);
    Json(json!({
        "symbol": symbol,
        "recommendation": "Accumulate below $145.",
        "current_price": 150.0,
        "analysis_timestamp": "2024-05-03T09:20:00"
    }))
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/GetStockData", get(stock_data))
        .route("/api/GetStockHistory", get(stock_history))
        .route("/api/GetSentimentAnalysis", get(sentiment))
        .route("/api/GetInvestmentRecommendation", post(recommendation))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

fn client(base_url: &str) -> HttpStockApi {
    HttpStockApi::from_settings(&Settings::default().with_base_url(base_url)).unwrap()
}

fn sym(s: &str) -> Symbol {
    Symbol::parse(s).unwrap()
}

#[tokio::test]
async fn stock_info_is_unwrapped_from_envelope() {
    let (url, _) = spawn_backend().await;
    let api = client(&url);

    let info = api.fetch_stock_info(&sym("aapl")).await.unwrap();

    assert_eq!(info.name, "Apple Inc.");
    assert_eq!(info.current_price, Some(150.0));
    assert_eq!(info.dividend_yield, Some(0.0051));
}

#[tokio::test]
async fn http_400_means_not_found_and_empty_search() {
    let (url, _) = spawn_backend().await;
    let api = client(&url);

    let err = api.fetch_stock_info(&sym("ZZZZ")).await.unwrap_err();
    assert!(err.is_not_found());

    let results = api.search(&sym("zzzz")).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn server_errors_carry_backend_message() {
    let (url, _) = spawn_backend().await;
    let api = client(&url);

    match api.fetch_stock_info(&sym("BROKEN")).await.unwrap_err() {
        ApiError::Backend { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "yfinance exploded");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
    assert!(api.search(&sym("BROKEN")).await.is_err());
}

#[tokio::test]
async fn history_is_sorted_and_period_forwarded() {
    let (url, backend) = spawn_backend().await;
    let api = client(&url);

    let series = api
        .fetch_historical_series(&sym("AAPL"), Period::SixMonths)
        .await
        .unwrap();

    let closes: Vec<f64> = series.closes().collect();
    assert_eq!(closes, vec![148.0, 150.0, 154.0]);
    let range = series.fifty_two_week_range().unwrap();
    assert_eq!((range.low, range.high), (140.0, 155.0));
    assert_eq!(*backend.history_periods.lock().unwrap(), vec!["6mo".to_string()]);
}

#[tokio::test]
async fn history_400_is_not_a_symbol_lookup_failure() {
    let (url, _) = spawn_backend().await;
    let api = client(&url);

    let err = api
        .fetch_historical_series(&sym("MSFT"), Period::OneYear)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Backend { status: 400, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(&format!("http://{addr}/api"));

    let err = api.fetch_sentiment(&sym("AAPL")).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), "network error");
    let cause = std::error::Error::source(&err).unwrap().to_string();
    assert!(!cause.is_empty());
    assert!(!err.to_string().contains(&cause));
}

#[tokio::test]
async fn dashboard_runs_every_flow_against_http_backend() {
    let (url, backend) = spawn_backend().await;
    let mut dash = Dashboard::new(Arc::new(client(&url)));

    assert!(matches!(dash.search("aapl").await, SearchPhase::Found { .. }));
    dash.select_result().await.unwrap();
    assert_eq!(dash.state().detail.history().len(), 3);
    assert_eq!(*backend.history_periods.lock().unwrap(), vec!["1y".to_string()]);

    dash.load_sentiment().await.unwrap();
    let bundle = dash.state().sentiment.bundle().unwrap();
    assert_eq!(bundle.articles.len(), 1);
    let visible: Vec<_> = bundle
        .market_metrics
        .visible_categories()
        .into_iter()
        .map(|(c, _)| c)
        .collect();
    assert_eq!(visible, vec!["Technical"]);

    dash.state_mut().set_risk_level(RiskLevel::Aggressive);
    dash.state_mut().set_investment_horizon(InvestmentHorizon::LongTerm);
    dash.recommend().await.unwrap();

    let bodies = backend.recommendation_bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "symbol": "AAPL",
            "risk_level": "aggressive",
            "investment_horizon": "long-term",
            "sentiment_analysis": "Moderately bullish.",
            "market_metrics": {
                "Technical": {"Current Price": "$150.0", "RSI": "61.3", "Beta": 1.29},
                "Market Sentiment": {"Analyst Rating": "N/A", "Short % of Float": "N/A"}
            }
        })
    );
    let rec = dash.state().recommendation.current().unwrap();
    assert_eq!(rec.recommendation.recommendation, "Accumulate below $145.");
}

#[tokio::test]
async fn dashboard_reports_unknown_symbol_by_name() {
    let (url, _) = spawn_backend().await;
    let mut dash = Dashboard::new(Arc::new(client(&url)));

    match dash.search("zzzz").await {
        SearchPhase::NotFound { message } => assert!(message.contains("ZZZZ")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

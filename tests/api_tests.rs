//! HTTP API tests for BikeCast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bikecast::api::{ApiError, ApiForecast, ApiSession, AppState};
use bikecast::forecast::FixedRandom;
use bikecast::{ErrorCode, HistoryEntry, LedgerSummary, SessionRegistry, SimulatedProvider, web};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> Router {
    let provider = SimulatedProvider::immediate(Box::new(FixedRandom::constant(0.5)));
    web::app(AppState::new(SessionRegistry::new(Arc::new(provider))), None)
}

fn forecast_body(temperature: f64, humidity: f64) -> Value {
    json!({
        "date": "2024-07-14",
        "temperature": temperature,
        "humidity": humidity,
        "windSpeed": 10,
        "weather": "clear",
        "season": "summer",
        "holiday": false,
        "workingDay": true
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>, header::HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec(), headers)
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

async fn new_session(app: &Router) -> String {
    let (status, body, _) = send(app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    parse::<ApiSession>(&body).id.to_string()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body, _) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = parse(&body);
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_stateless_predict() {
    let app = test_app();
    let (status, body, _) = send(
        &app,
        Method::POST,
        "/api/predict",
        Some(forecast_body(30.0, 50.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = parse(&body);
    assert_eq!(result["prediction"], 6700);
    assert_eq!(result["confidence"], 90);
}

#[tokio::test]
async fn test_predict_rejects_out_of_range() {
    let app = test_app();
    let (status, body, _) = send(
        &app,
        Method::POST,
        "/api/predict",
        Some(forecast_body(60.0, 50.0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ApiError = parse(&body);
    assert_eq!(error.error, ErrorCode::Validation);
    assert!(error.message.contains("Temperature"));
}

#[tokio::test]
async fn test_session_forecast_flow() {
    let app = test_app();
    let id = new_session(&app).await;

    let (status, _, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/forecasts/current"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/forecasts"),
        Some(forecast_body(30.0, 50.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let forecast: ApiForecast = parse(&body);
    assert_eq!(forecast.result.prediction, 6700);
    assert_eq!(forecast.entry.prediction, 6700);
    assert_eq!(forecast.entry.temperature, 30.0);

    let (status, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/forecasts/current"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let current: Value = parse(&body);
    assert_eq!(current["result"]["prediction"], 6700);
    assert_eq!(current["level"], "high");
    assert_eq!(current["category"], "peak");

    let (status, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/summary"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summary: LedgerSummary = parse(&body);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.latest, Some(6700));
}

#[tokio::test]
async fn test_validation_error_creates_no_history() {
    let app = test_app();
    let id = new_session(&app).await;

    let (status, _, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/forecasts"),
        Some(forecast_body(20.0, 120.0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/summary"),
        None,
    )
    .await;
    let summary: LedgerSummary = parse(&body);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.mean, 0.0);
    assert!(summary.latest.is_none());
}

#[tokio::test]
async fn test_history_order_and_clear() {
    let app = test_app();
    let id = new_session(&app).await;

    for temperature in [30.0, 10.0] {
        let (status, _, _) = send(
            &app,
            Method::POST,
            &format!("/api/sessions/{id}/forecasts"),
            Some(forecast_body(temperature, 50.0)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/history?order=oldest"),
        None,
    )
    .await;
    let oldest: Vec<HistoryEntry> = parse(&body);
    assert_eq!(oldest.len(), 2);
    assert!(oldest[0].timestamp <= oldest[1].timestamp);

    let (_, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/history"),
        None,
    )
    .await;
    let newest: Vec<HistoryEntry> = parse(&body);
    assert!(newest[0].timestamp >= newest[1].timestamp);

    let (status, _, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/sessions/{id}/history"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/history"),
        None,
    )
    .await;
    let cleared: Vec<HistoryEntry> = parse(&body);
    assert!(cleared.is_empty());
}

#[tokio::test]
async fn test_export() {
    let app = test_app();
    let id = new_session(&app).await;

    let (status, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/export"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ApiError = parse(&body);
    assert_eq!(error.error, ErrorCode::ExportRefused);

    send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/forecasts"),
        Some(forecast_body(30.0, 50.0)),
    )
    .await;

    let (status, body, headers) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/export"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("bike_predictions_"));
    assert!(disposition.ends_with(".csv\""));

    let csv = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Data,Previsão,Clima,Temperatura,Timestamp");
    assert!(lines[1].starts_with("2024-07-14,6700,clear,30°C,"));
    assert!(lines[1].ends_with('Z'));
}

#[tokio::test]
async fn test_unknown_session() {
    let app = test_app();
    let (status, body, _) = send(
        &app,
        Method::GET,
        "/api/sessions/00000000-0000-0000-0000-000000000000/summary",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ApiError = parse(&body);
    assert_eq!(error.error, ErrorCode::SessionNotFound);
}

#[tokio::test]
async fn test_dashboard() {
    let app = test_app();
    let (status, body, _) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    let dashboard: Value = parse(&body);
    assert_eq!(dashboard["model_accuracy"], 94.2);
    assert_eq!(dashboard["monthly_trend"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_engine_failure_is_bad_gateway() {
    let provider = bikecast::RemoteProvider::new(
        "http://127.0.0.1:9/api/predict",
        std::time::Duration::from_secs(2),
    )
    .unwrap();
    let app = web::app(AppState::new(SessionRegistry::new(Arc::new(provider))), None);
    let id = new_session(&app).await;

    let (status, body, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/forecasts"),
        Some(forecast_body(30.0, 50.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ApiError = parse(&body);
    assert_eq!(error.error, ErrorCode::EngineFailure);

    let (_, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/summary"),
        None,
    )
    .await;
    let summary: LedgerSummary = parse(&body);
    assert_eq!(summary.count, 0);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = test_app();
    let mut body = forecast_body(20.0, 50.0);
    body["temperature"] = json!("hot");

    let (status, response, _) = send(&app, Method::POST, "/api/predict", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ApiError = parse(&response);
    assert_eq!(error.error, ErrorCode::Validation);
    assert!(error.message.contains("temperature"));

    let id = new_session(&app).await;
    let mut missing = forecast_body(20.0, 50.0);
    missing.as_object_mut().unwrap().remove("season");
    let (status, response, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/forecasts"),
        Some(missing),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ApiError = parse(&response);
    assert_eq!(error.error, ErrorCode::Validation);

    let (_, response, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/summary"),
        None,
    )
    .await;
    let summary: LedgerSummary = parse(&response);
    assert_eq!(summary.count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_forecast_is_conflict() {
    let provider = SimulatedProvider::new(
        Duration::from_millis(2000),
        Box::new(FixedRandom::constant(0.5)),
    );
    let app = web::app(AppState::new(SessionRegistry::new(Arc::new(provider))), None);
    let id = new_session(&app).await;
    let uri = format!("/api/sessions/{id}/forecasts");

    let first = tokio::spawn({
        let app = app.clone();
        let uri = uri.clone();
        async move { send(&app, Method::POST, &uri, Some(forecast_body(30.0, 50.0))).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body, _) = send(&app, Method::POST, &uri, Some(forecast_body(30.0, 50.0))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ApiError = parse(&body);
    assert_eq!(error.error, ErrorCode::Busy);

    let (status, _, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/summary"),
        None,
    )
    .await;
    let summary: LedgerSummary = parse(&body);
    assert_eq!(summary.count, 1);
}

#[tokio::test]
async fn test_delete_session() {
    let app = test_app();
    let id = new_session(&app).await;

    let (status, _, _) = send(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body, _) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{id}/summary"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ApiError = parse(&body);
    assert_eq!(error.error, ErrorCode::SessionNotFound);

    let (status, _, _) = send(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

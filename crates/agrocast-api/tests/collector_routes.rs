//! Collector router against a mock storage service.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agrocast_api::routes::collector;
use agrocast_api::state::CollectorState;
use agrocast_client::{AgrocastClient, ServiceUrls};
use agrocast_core::{ParamLayout, ParamSpec};

/// Two parameters of three days each, one stat row, cut `1..5`.
fn tiny_layout() -> ParamLayout {
    ParamLayout::new(
        vec![ParamSpec::new("temp", 10.0), ParamSpec::new("ndvi", 1.0)],
        vec![ParamSpec::new("mean_prod", 10.0)],
        3,
        1,
        5,
    )
    .unwrap()
}

fn test_app(mock_server: &MockServer) -> Router {
    let upstream = AgrocastClient::new(ServiceUrls::all_at(&mock_server.uri()).unwrap()).unwrap();
    collector::router(CollectorState::new(tiny_layout(), upstream))
}

fn uri(path: &str, query: &[(&str, &str)]) -> String {
    let qs = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    format!("{path}?{qs}")
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn params_lists_meteo_names() {
    let mock_server = MockServer::start().await;
    let (status, body) = get(test_app(&mock_server), "/params").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"], json!(["temp", "ndvi"]));
}

#[tokio::test]
async fn health_reports_storage_unavailable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (status, body) = get(test_app(&mock_server), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["storage_status"], "unavailable");
}

#[tokio::test]
async fn timeseries_slices_param() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/row"))
        .and(query_param("year", "2020"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK", "region": "r", "district": "d", "year": 2020,
            "row_index": 4, "data": [1.0, 2.0, 3.0, 0.1, 0.2, 0.3]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/timeseries", &[("region", "r"), ("district", "d"), ("year", "2020"), ("param", "ndvi")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["param"], "ndvi");
    assert_eq!(body["timeseries"], json!([0.1, 0.2, 0.3]));
}

#[tokio::test]
async fn unknown_param_is_400_without_storage_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/row"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/timeseries", &[("region", "r"), ("district", "d"), ("year", "2020"), ("param", "rain")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("rain"));
}

#[tokio::test]
async fn storage_failure_is_502() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/row"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/timeseries", &[("region", "r"), ("district", "d"), ("year", "2020"), ("param", "ndvi")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert!(!body["error"]["message"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn storage_not_found_stays_404() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/all_years"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "NOT_FOUND", "message": "unknown district"}
        })))
        .mount(&mock_server)
        .await;

    let (status, _) = get(
        test_app(&mock_server),
        &uri("/correlation", &[("region", "r"), ("district", "x")]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_bad_request_stays_400() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/with_yield"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "BAD_REQUEST", "message": "invalid year"}
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/predict_data", &[("region", "r"), ("district", "d"), ("year", "2020")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn correlation_takes_ndvi_max_per_year() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/all_years"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK", "region": "r", "district": "d", "count": 2,
            "rows": [
                {"year": 2019, "productive": 20.0, "meteo_data": [0.0, 0.0, 0.0, 0.1, 0.6, 0.2]},
                {"year": 2020, "productive": 25.0, "meteo_data": [0.0, 0.0, 0.0, 0.7, 0.3, 0.2]}
            ]
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/correlation", &[("region", "r"), ("district", "d")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0], json!({"year": 2019, "ndvi_max": 0.6, "productive": 20.0}));
    assert_eq!(body["data"][1]["ndvi_max"], 0.7);
}

#[tokio::test]
async fn predict_data_merges_normalizes_and_cuts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/with_yield"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK", "region": "r", "district": "d", "year": 2020, "row_index": 1,
            "meteo_data_prev": [1.0, 2.0, 3.0, 0.1, 0.2, 0.3],
            "meteo_data": [4.0, 5.0, 6.0, 0.4, 0.9, 0.5],
            "productive": 30.0, "mean_productive": 25.0, "trend": 0.5,
            "prod_disperssion_norm": 0.1
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/predict_data", &[("region", "r"), ("district", "d"), ("year", "2020")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_of_params"], 3);
    assert_eq!(body["productive"], 30.0);
    assert_eq!(
        body["data"],
        json!([0.2, 0.3, 0.4, 0.5, 0.2, 0.3, 0.4, 0.9, 2.5, 2.5, 2.5, 2.5])
    );
}

#[tokio::test]
async fn regression_data_defaults_history_to_five() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meteo/multi_year"))
        .and(query_param("history", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK", "region": "r", "district": "d", "target_year": 2020,
            "years": [2019, 2020],
            "meteo_rows": [[0.0, 0.0, 0.0, 0.5, 0.1, 0.1], [0.0, 0.0, 0.0, 0.1, 0.8, 0.1]],
            "yields": [20.0, 32.0]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(
        test_app(&mock_server),
        &uri("/regression_data", &[("region", "r"), ("district", "d"), ("year", "2020")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target_year"], 2020);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][1], json!({"year": 2020, "ndvi_max": 0.8, "productive": 32.0}));
}

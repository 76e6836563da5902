//! Integration tests for `DistanceMatrixClient` and `fetch_batch` using
//! wiremock HTTP mocks.

use clinicmap_core::{BatchOutcome, Location, SkipReason, UnitSystem};
use clinicmap_matrix::{fetch_batch, BatchRequest, DistanceMatrixClient, MatrixError};
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MATRIX_PATH: &str = "/maps/api/distancematrix/json";

fn test_client(base_url: &str) -> DistanceMatrixClient {
    DistanceMatrixClient::with_base_url("test-key", 5, "clinicmap-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn location(id: usize, address: &str) -> Location {
    let mut fields = Map::new();
    fields.insert("clinicAddress".to_string(), Value::String(address.to_string()));
    Location {
        id,
        address: address.to_string(),
        fields,
    }
}

fn two_destination_body() -> Value {
    json!({
        "status": "OK",
        "origin_addresses": ["Helena, MT 59601, USA"],
        "destination_addresses": ["1 A St, Helena, MT 59601, USA", "2 B St, Helena, MT 59601, USA"],
        "rows": [{
            "elements": [
                {
                    "status": "OK",
                    "distance": { "text": "5 mi", "value": 8047 },
                    "duration": { "text": "9 mins", "value": 540 }
                },
                {
                    "status": "ZERO_RESULTS"
                }
            ]
        }]
    })
}

#[tokio::test]
async fn get_matrix_sends_expected_query_and_parses_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .and(query_param("origins", "46.59,-112.03"))
        .and(query_param("destinations", "1 A St|2 B St"))
        .and(query_param("mode", "driving"))
        .and(query_param("units", "imperial"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_destination_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .get_matrix("46.59,-112.03", &["1 A St", "2 B St"], UnitSystem::Imperial)
        .await
        .expect("should parse matrix");

    assert_eq!(response.status, "OK");
    assert_eq!(response.origin_address(), Some("Helena, MT 59601, USA"));
    assert_eq!(response.destination_addresses.len(), 2);
    assert_eq!(response.rows[0].elements.len(), 2);
}

#[tokio::test]
async fn get_matrix_surfaces_request_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "rows": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_matrix("o", &["d"], UnitSystem::Imperial)
        .await
        .unwrap_err();

    assert!(
        matches!(err, MatrixError::ApiStatus { ref status, .. } if status == "REQUEST_DENIED"),
        "expected ApiStatus(REQUEST_DENIED), got: {err:?}"
    );
}

#[tokio::test]
async fn get_matrix_maps_server_error_to_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_matrix("o", &["d"], UnitSystem::Imperial)
        .await
        .unwrap_err();
    assert!(matches!(err, MatrixError::Http(_)), "got: {err:?}");
}

#[tokio::test]
async fn get_matrix_rejects_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_matrix("o", &["d"], UnitSystem::Imperial)
        .await
        .unwrap_err();
    match err {
        MatrixError::Deserialize { context, .. } => {
            assert!(!context.contains("test-key"), "context leaks key: {context}");
        }
        other => panic!("expected Deserialize, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_batch_keeps_reachable_and_skips_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_destination_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let locations = [location(0, "1 A St"), location(1, "2 B St")];
    let outcome = fetch_batch(
        &client,
        BatchRequest {
            region: "59601",
            origin: "46.59,-112.03",
            batch_index: 0,
            locations: &locations,
            units: UnitSystem::Imperial,
        },
    )
    .await;

    let (records, skipped) = match outcome {
        BatchOutcome::Fetched { records, skipped } => (records, skipped),
        other @ BatchOutcome::Failed { .. } => panic!("expected fetched outcome, got: {other:?}"),
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location_id, 0);
    assert_eq!(records[0].resolved_address, "1 A St, Helena, MT 59601, USA");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].location_id, 1);
    assert_eq!(skipped[0].reason, SkipReason::NoRoute);
}

#[tokio::test]
async fn fetch_batch_turns_transport_failure_into_failed_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let locations = [location(0, "1 A St")];
    let outcome = fetch_batch(
        &client,
        BatchRequest {
            region: "59601",
            origin: "46.59,-112.03",
            batch_index: 3,
            locations: &locations,
            units: UnitSystem::Metric,
        },
    )
    .await;

    assert!(outcome.is_failed(), "expected failed outcome, got: {outcome:?}");
    assert!(outcome.records().is_empty());
}

#[tokio::test]
async fn fetch_batch_keeps_good_destinations_when_one_address_is_null() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "origin_addresses": ["Helena, MT 59601, USA"],
            "destination_addresses": [null, "2 B St, Helena, MT 59601, USA"],
            "rows": [{
                "elements": [
                    {
                        "status": "OK",
                        "distance": { "text": "5 mi", "value": 8047 },
                        "duration": { "text": "9 mins", "value": 540 }
                    },
                    {
                        "status": "OK",
                        "distance": { "text": "2 mi", "value": 3219 },
                        "duration": { "text": "4 mins", "value": 240 }
                    }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let locations = [location(0, "1 A St"), location(1, "2 B St")];
    let outcome = fetch_batch(
        &client,
        BatchRequest {
            region: "59601",
            origin: "46.59,-112.03",
            batch_index: 0,
            locations: &locations,
            units: UnitSystem::Imperial,
        },
    )
    .await;

    assert!(!outcome.is_failed(), "expected fetched outcome, got: {outcome:?}");
    let records = outcome.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location_id, 1);
    assert_eq!(records[0].resolved_address, "2 B St, Helena, MT 59601, USA");
}

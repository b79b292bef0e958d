//! Tests for the dashboard backend HTTP client

mod common;

use common::backend_mock::*;
use ftth_netmap::client::http_client::NetworkHttpClient;
use ftth_netmap::client::{NetworkApi, NetworkStatus, RecordId};
use ftth_netmap::config::{ApiConfig, EndpointConfig};
use ftth_netmap::NetMapError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use url::Url;

fn client_for(base_url: &str, timeout: Duration) -> NetworkHttpClient {
    let config = ApiConfig {
        base_url: Url::parse(base_url).unwrap(),
        timeout,
        ..ApiConfig::default()
    };
    NetworkHttpClient::new(config, EndpointConfig::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_status() {
    let backend = MockBackend::start_with_fixtures().await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let status = client.fetch_status().await.unwrap();

    assert_eq!(
        status,
        NetworkStatus {
            total_customers: 42,
            online_customers: 30,
            total_odp: 5,
            total_odc: 2,
        }
    );
}

#[tokio::test]
async fn test_status_null_and_missing_counters_are_zero() {
    let backend = MockBackend::start().await;
    backend
        .mock_json(
            STATUS_PATH,
            json!({"total_customers": null, "online_customers": 3}),
        )
        .await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let status = client.fetch_status().await.unwrap();

    assert_eq!(status.total_customers, 0);
    assert_eq!(status.online_customers, 3);
    assert_eq!(status.total_odp, 0);
    assert_eq!(status.total_odc, 0);
}

#[tokio::test]
async fn test_customers_accept_loose_types() {
    let backend = MockBackend::start_with_fixtures().await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let customers = client.fetch_customers().await.unwrap();

    assert_eq!(customers.len(), 6);
    assert_eq!(customers[1].lat, Some(-7.7702));
    assert_eq!(customers[1].address, None);
    assert_eq!(customers[2].id, RecordId::Text("C-003".to_string()));
    assert_eq!(customers[4].lat, None);
    assert_eq!(customers[5].lat, None);
    assert_eq!(customers[5].lng, None);
}

#[tokio::test]
async fn test_odp_and_odc_lists() {
    let backend = MockBackend::start_with_fixtures().await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let odp = client.fetch_odp().await.unwrap();
    let odc = client.fetch_odc().await.unwrap();

    assert_eq!(odp.len(), 3);
    assert_eq!(odp[1].latitude, None);
    assert_eq!(odp[1].used_ports, None);
    assert_eq!(odp[2].latitude, Some(-7.792));
    assert_eq!(odc.len(), 2);
    assert_eq!(odc[0].capacity, 144);
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let backend = MockBackend::start().await;
    backend.mock_error(ODP_PATH, 500).await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let err = client.fetch_odp().await.unwrap_err();

    match err {
        NetMapError::Status { endpoint, status } => {
            assert_eq!(endpoint, ODP_PATH);
            assert_eq!(status, 500);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unmounted_endpoint_is_an_error() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let err = client.fetch_odc().await.unwrap_err();

    assert!(matches!(err, NetMapError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let backend = MockBackend::start().await;
    backend.mock_garbage(CUSTOMERS_PATH).await;
    let client = client_for(&backend.base_url, Duration::from_secs(5));

    let err = client.fetch_customers().await.unwrap_err();

    assert!(matches!(err, NetMapError::Json(_)));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = MockBackend::start().await;
    backend
        .mock_json_delayed(STATUS_PATH, sample_status(), Duration::from_secs(2))
        .await;
    let client = client_for(&backend.base_url, Duration::from_millis(200));

    let err = client.fetch_status().await.unwrap_err();

    assert!(matches!(err, NetMapError::Timeout(_)), "got {err:?}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 9 locally
    let client = client_for("http://127.0.0.1:9", Duration::from_secs(2));

    let err = client.fetch_status().await.unwrap_err();

    assert!(err.is_transport(), "got {err:?}");
}

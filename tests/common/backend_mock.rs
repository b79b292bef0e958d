//! WireMock-based dashboard API mocking
//!
//! Serves the four endpoints the map page reads, with fixture data that
//! mixes well-formed records and the kinds of junk the real backend emits.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const STATUS_PATH: &str = "/api/network/status";
pub const CUSTOMERS_PATH: &str = "/api/customers/map";
pub const ODP_PATH: &str = "/api/network/odp";
pub const ODC_PATH: &str = "/api/network/odc";

/// Mock dashboard backend
pub struct MockBackend {
    pub server: MockServer,
    pub base_url: String,
}

impl MockBackend {
    /// Start a server with no endpoints mounted; every request gets a 404
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Start a server serving the default fixtures on all four endpoints
    pub async fn start_with_fixtures() -> Self {
        let backend = Self::start().await;
        backend.mock_json(STATUS_PATH, sample_status()).await;
        backend.mock_json(CUSTOMERS_PATH, sample_customers()).await;
        backend.mock_json(ODP_PATH, sample_odp()).await;
        backend.mock_json(ODC_PATH, sample_odc()).await;
        backend
    }

    /// Answer GET `endpoint` with `body`
    pub async fn mock_json(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer GET `endpoint` with `body` after `delay`
    pub async fn mock_json_delayed(&self, endpoint: &str, body: Value, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer GET `endpoint` with an error status
    pub async fn mock_error(&self, endpoint: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"error": "Internal error"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer GET `endpoint` with a body that is not JSON
    pub async fn mock_garbage(&self, endpoint: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&self.server)
            .await;
    }

    /// Drop every mounted endpoint
    pub async fn reset(&self) {
        self.server.reset().await;
    }

    /// Requests received on `endpoint`
    pub async fn hits(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == endpoint)
            .count()
    }
}

pub fn sample_status() -> Value {
    json!({
        "total_customers": 42,
        "online_customers": 30,
        "total_odp": 5,
        "total_odc": 2
    })
}

/// Six customers, four of them placeable
pub fn sample_customers() -> Value {
    json!([
        {"id": 1, "full_name": "Budi Santoso", "address": "Jl. Kaliurang 12", "status": "active", "lat": -7.7601, "lng": 110.3801},
        {"id": 2, "full_name": "Siti Rahayu", "address": null, "status": "inactive", "lat": "-7.7702", "lng": "110.3902"},
        {"id": "C-003", "full_name": "Agus Wibowo", "status": "suspended", "lat": -7.7803, "lng": 110.4003},
        {"id": 4, "full_name": "Dewi Lestari", "address": "Jl. Malioboro 5", "status": "active", "lat": -7.7904, "lng": 110.3654},
        {"id": 5, "full_name": "No Location", "status": "active", "lat": null, "lng": 110.37},
        {"id": 6, "full_name": "Bad Location", "status": "inactive", "lat": "n/a", "lng": "n/a"}
    ])
}

/// Three ODP, one without a latitude
pub fn sample_odp() -> Value {
    json!([
        {"id": 10, "name": "ODP-KLR-01", "capacity": 16, "used_ports": 9, "address": "Jl. Kaliurang KM 5", "latitude": -7.7610, "longitude": 110.3810},
        {"id": 11, "name": "ODP-KLR-02", "capacity": 8, "used_ports": null, "latitude": null, "longitude": 110.3820},
        {"id": 12, "name": "ODP-MLB-01", "capacity": 16, "used_ports": 2, "latitude": "-7.7920", "longitude": "110.3660"}
    ])
}

pub fn sample_odc() -> Value {
    json!([
        {"id": 100, "name": "ODC-NORTH", "capacity": 144, "latitude": -7.7500, "longitude": 110.3700},
        {"id": 101, "name": "ODC-SOUTH", "capacity": 96, "address": "Jl. Parangtritis", "latitude": -7.8100, "longitude": 110.3650}
    ])
}

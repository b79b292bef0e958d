//! HTTP client implementation for the dashboard backend
//!
//! Plain JSON GETs against fixed endpoints. Any non-success status is a
//! failure; there is no retry, a failed load is only repeated when the
//! user refreshes.

use crate::client::{CustomerRecord, NetworkApi, NetworkStatus, OdcRecord, OdpRecord};
use crate::config::{ApiConfig, EndpointConfig};
use crate::error::{NetMapError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for the dashboard backend
pub struct NetworkHttpClient {
    /// HTTP client instance
    client: Client,

    /// Base URL for the backend
    base_url: Url,

    /// Endpoint paths
    endpoints: EndpointConfig,
}

impl NetworkHttpClient {
    /// Create a new HTTP client
    pub fn new(config: ApiConfig, endpoints: EndpointConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("ftth-netmap/{}", env!("CARGO_PKG_VERSION")));

        if !config.verify_ssl {
            warn!("SSL verification disabled - this is insecure for production use");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| NetMapError::connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url,
            endpoints,
        })
    }

    /// Build URL for API endpoint
    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| NetMapError::connection(format!("Invalid URL path {path}: {e}")))
    }

    /// GET an endpoint and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path)?;
        debug!("GET {url}");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                NetMapError::timeout(format!("{path}: {e}"))
            } else if e.is_connect() {
                NetMapError::connection(format!("{path}: {e}"))
            } else {
                NetMapError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetMapError::status(path, status.as_u16()));
        }

        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body)?;
        Ok(value)
    }
}

#[async_trait]
impl NetworkApi for NetworkHttpClient {
    async fn fetch_status(&self) -> Result<NetworkStatus> {
        self.get_json(&self.endpoints.status).await
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>> {
        let customers: Vec<CustomerRecord> = self.get_json(&self.endpoints.customers).await?;
        debug!("Customers map data loaded: {} customers", customers.len());
        Ok(customers)
    }

    async fn fetch_odp(&self) -> Result<Vec<OdpRecord>> {
        let odp: Vec<OdpRecord> = self.get_json(&self.endpoints.odp).await?;
        debug!("ODP data loaded: {} ODP", odp.len());
        Ok(odp)
    }

    async fn fetch_odc(&self) -> Result<Vec<OdcRecord>> {
        let odc: Vec<OdcRecord> = self.get_json(&self.endpoints.odc).await?;
        debug!("ODC data loaded: {} ODC", odc.len());
        Ok(odc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_absolute_paths() {
        let config = ApiConfig {
            base_url: Url::parse("http://10.1.1.1:5000/dashboard/").unwrap(),
            ..ApiConfig::default()
        };
        let client = NetworkHttpClient::new(config, EndpointConfig::default()).unwrap();

        let url = client.build_url("/api/network/odp").unwrap();
        assert_eq!(url.as_str(), "http://10.1.1.1:5000/api/network/odp");

        let url = client.build_url("api/network/odp").unwrap();
        assert_eq!(url.as_str(), "http://10.1.1.1:5000/dashboard/api/network/odp");
    }
}

//! Configuration management for the network map controller

use crate::error::{NetMapError, Result};
use serde::{Deserialize, Serialize};
use std::{env, path::Path, time::Duration};
use url::Url;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NetMapConfig {
    /// Backend API configuration
    pub api: ApiConfig,

    /// Endpoint paths, relative to the API base URL
    pub endpoints: EndpointConfig,

    /// Initial map view
    pub map: MapViewConfig,

    /// UI timing
    pub ui: UiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Dashboard backend URL (e.g., "http://127.0.0.1:5000")
    pub base_url: Url,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Enable SSL/TLS verification
    pub verify_ssl: bool,
}

/// Endpoint paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub status: String,
    pub customers: String,
    pub odp: String,
    pub odc: String,
}

/// Initial center and zoom of the map surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

/// UI timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the refresh control stays disabled after a refresh completes
    #[serde(with = "humantime_serde")]
    pub refresh_restore_delay: Duration,

    /// How long a transient notification stays on screen
    #[serde(with = "humantime_serde")]
    pub notification_ttl: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable structured JSON logging
    pub json_format: bool,

    /// Log to file (path)
    pub file: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:5000").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
            verify_ssl: true,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            status: "/api/network/status".to_string(),
            customers: "/api/customers/map".to_string(),
            odp: "/api/network/odp".to_string(),
            odc: "/api/network/odc".to_string(),
        }
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        // Yogyakarta
        Self {
            center_lat: -7.7956,
            center_lng: 110.3695,
            zoom: 12,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_restore_delay: Duration::from_secs(1),
            notification_ttl: Duration::from_secs(3),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file: None,
        }
    }
}

impl NetMapConfig {
    /// Load configuration from a TOML file. Missing keys fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            NetMapError::config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("NETMAP_API_URL") {
            self.api.base_url = url
                .parse()
                .map_err(|e| NetMapError::config(format!("Invalid NETMAP_API_URL: {}", e)))?;
        }

        if let Ok(timeout) = env::var("NETMAP_TIMEOUT") {
            self.api.timeout = Duration::from_secs(
                timeout
                    .parse()
                    .map_err(|e| NetMapError::config(format!("Invalid NETMAP_TIMEOUT: {}", e)))?,
            );
        }

        if let Ok(verify) = env::var("NETMAP_VERIFY_SSL") {
            self.api.verify_ssl = match verify.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(NetMapError::config(format!(
                        "Invalid NETMAP_VERIFY_SSL: {}. Use 'true' or 'false'",
                        verify
                    )));
                }
            };
        }

        if let Ok(delay) = env::var("NETMAP_REFRESH_DELAY_MS") {
            self.ui.refresh_restore_delay = Duration::from_millis(delay.parse().map_err(|e| {
                NetMapError::config(format!("Invalid NETMAP_REFRESH_DELAY_MS: {}", e))
            })?);
        }

        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let scheme = self.api.base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(NetMapError::config("API URL must use http or https scheme"));
        }

        if self.api.timeout.is_zero() {
            return Err(NetMapError::config("Timeout must be greater than zero"));
        }

        for (name, endpoint) in [
            ("status", &self.endpoints.status),
            ("customers", &self.endpoints.customers),
            ("odp", &self.endpoints.odp),
            ("odc", &self.endpoints.odc),
        ] {
            if endpoint.trim().is_empty() {
                return Err(NetMapError::config(format!(
                    "Endpoint path for {} cannot be empty",
                    name
                )));
            }
        }

        if !(-90.0..=90.0).contains(&self.map.center_lat)
            || !(-180.0..=180.0).contains(&self.map.center_lng)
        {
            return Err(NetMapError::config("Map center is out of range"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = NetMapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoints.customers, "/api/customers/map");
        assert_eq!(config.ui.refresh_restore_delay, Duration::from_secs(1));
        assert_eq!(config.map.zoom, 12);
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("NETMAP_API_URL", Some("https://noc.example.net")),
                ("NETMAP_TIMEOUT", Some("5")),
                ("NETMAP_VERIFY_SSL", Some("false")),
                ("NETMAP_REFRESH_DELAY_MS", Some("250")),
            ],
            || {
                let config = NetMapConfig::from_env().unwrap();
                assert_eq!(config.api.base_url.as_str(), "https://noc.example.net/");
                assert_eq!(config.api.timeout, Duration::from_secs(5));
                assert!(!config.api.verify_ssl);
                assert_eq!(config.ui.refresh_restore_delay, Duration::from_millis(250));
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        temp_env::with_var("NETMAP_TIMEOUT", Some("soon"), || {
            let err = NetMapConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("NETMAP_TIMEOUT"));
        });
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://10.0.0.2:8000"
timeout = "10s"

[ui]
refresh_restore_delay = "1500ms"
"#
        )
        .unwrap();

        let config = NetMapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://10.0.0.2:8000/");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert!(config.api.verify_ssl);
        assert_eq!(config.ui.refresh_restore_delay, Duration::from_millis(1500));
        assert_eq!(config.ui.notification_ttl, Duration::from_secs(3));
        assert_eq!(config.endpoints.odc, "/api/network/odc");
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let mut config = NetMapConfig::default();
        config.api.base_url = Url::parse("ftp://10.0.0.2").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_endpoint() {
        let mut config = NetMapConfig::default();
        config.endpoints.odp = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("odp"));
    }
}

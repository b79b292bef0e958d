//! Backend API client for the network dashboard
//!
//! Record types mirror the JSON the dashboard backend returns. The backend
//! is loose about types (ids, counters and coordinates arrive as numbers or
//! strings, any field may be `null`), so every field decodes leniently: a
//! single malformed record must not fail the whole list. Validity is decided
//! later when markers are built.

pub mod http_client;

use crate::config::NetMapConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identifier of a backend record; the API emits both integer and string ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => RecordId::Number(i),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    RecordId::Number(f as i64)
                }
                _ => RecordId::Text(n.to_string()),
            },
            Value::String(s) => RecordId::Text(s),
            Value::Null => RecordId::Text(String::new()),
            other => RecordId::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RecordId::from_value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Aggregate counters from `/api/network/status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatus {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_customers: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub online_customers: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_odp: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_odc: u64,
}

/// Customer entry from `/api/customers/map`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lng: Option<f64>,
}

/// Optical distribution point from `/api/network/odp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdpRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "lenient_optional_count")]
    pub used_ports: Option<u32>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
}

/// Optical distribution cabinet from `/api/network/odc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdcRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
}

/// Backend port used by the map controller
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Aggregate counters for the dashboard cards
    async fn fetch_status(&self) -> Result<NetworkStatus>;

    /// Customers with their map coordinates
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>>;

    /// Optical distribution points
    async fn fetch_odp(&self) -> Result<Vec<OdpRecord>>;

    /// Optical distribution cabinets
    async fn fetch_odc(&self) -> Result<Vec<OdcRecord>>;
}

/// Create the HTTP-backed API client from configuration
pub fn create_client(config: &NetMapConfig) -> Result<Arc<dyn NetworkApi>> {
    let client = http_client::NetworkHttpClient::new(config.api.clone(), config.endpoints.clone())?;
    Ok(Arc::new(client))
}

/// Non-negative whole number from a number or numeric string
fn count_from_value(value: &Value) -> Option<u64> {
    let whole = |f: f64| (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64);
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

/// Counter or capacity; `null`, negative or junk values become zero
fn lenient_count<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + TryFrom<u64>,
{
    Ok(lenient_optional_count(deserializer)?.unwrap_or_default())
}

fn lenient_optional_count<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).and_then(|n| T::try_from(n).ok()))
}

/// Strings pass through, numbers and booleans are rendered, anything else is `None`
fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(Value::deserialize(deserializer)?))
}

/// Accept numbers, numeric strings, `null` or junk; anything that is not a
/// usable number becomes `None`
fn lenient_coordinate<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

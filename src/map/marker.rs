//! Marker construction from backend records

use crate::client::{CustomerRecord, OdcRecord, OdpRecord, RecordId};
use crate::map::{MarkerCategory, MarkerHandle, MarkerIcon, MarkerSpec};
use serde::{Deserialize, Serialize};

/// Customer status that counts as online
pub const ACTIVE_STATUS: &str = "active";

/// Status shown when the backend omits one
pub const UNKNOWN_STATUS: &str = "unknown";

const MISSING_ADDRESS: &str = "Not available";

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    /// Build a position when both coordinates are usable.
    ///
    /// Zero is rejected along with missing, non-finite and out-of-range
    /// values: the backend stores unplaced assets at 0.
    pub fn from_pair(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        let lat = lat.filter(|v| v.is_finite() && *v != 0.0 && (-90.0..=90.0).contains(v))?;
        let lng = lng.filter(|v| v.is_finite() && *v != 0.0 && (-180.0..=180.0).contains(v))?;
        Some(Self { lat, lng })
    }
}

/// Button offered inside an info popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum InfoAction {
    ShowCustomerDetails(RecordId),
    ViewOdpCustomers(RecordId),
}

/// Content of the info popup opened when a marker is clicked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoContent {
    pub title: String,
    /// Label/value rows in display order
    pub fields: Vec<(String, String)>,
    pub action: Option<InfoAction>,
}

/// A marker before the surface has created it
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub id: RecordId,
    pub spec: MarkerSpec,
    pub status: Option<String>,
    pub info: InfoContent,
}

impl MarkerDraft {
    pub fn from_customer(customer: &CustomerRecord) -> Option<Self> {
        let position = GeoPosition::from_pair(customer.lat, customer.lng)?;
        let status = customer
            .status
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

        Some(Self {
            id: customer.id.clone(),
            spec: MarkerSpec {
                position,
                title: customer.full_name.clone(),
                category: MarkerCategory::Customer,
                icon: MarkerIcon::CustomerDot {
                    status: status.clone(),
                },
            },
            info: InfoContent {
                title: customer.full_name.clone(),
                fields: vec![
                    ("Address".to_string(), address_or_placeholder(&customer.address)),
                    ("Status".to_string(), status.clone()),
                ],
                action: Some(InfoAction::ShowCustomerDetails(customer.id.clone())),
            },
            status: Some(status),
        })
    }

    pub fn from_odp(odp: &OdpRecord) -> Option<Self> {
        let position = GeoPosition::from_pair(odp.latitude, odp.longitude)?;

        Some(Self {
            id: odp.id.clone(),
            spec: MarkerSpec {
                position,
                title: odp.name.clone(),
                category: MarkerCategory::Odp,
                icon: MarkerIcon::OdpAntenna,
            },
            status: None,
            info: InfoContent {
                title: odp.name.clone(),
                fields: vec![
                    ("Capacity".to_string(), format!("{} ports", odp.capacity)),
                    (
                        "Used ports".to_string(),
                        odp.used_ports.unwrap_or(0).to_string(),
                    ),
                    ("Address".to_string(), address_or_placeholder(&odp.address)),
                ],
                action: Some(InfoAction::ViewOdpCustomers(odp.id.clone())),
            },
        })
    }

    pub fn from_odc(odc: &OdcRecord) -> Option<Self> {
        let position = GeoPosition::from_pair(odc.latitude, odc.longitude)?;

        Some(Self {
            id: odc.id.clone(),
            spec: MarkerSpec {
                position,
                title: odc.name.clone(),
                category: MarkerCategory::Odc,
                icon: MarkerIcon::OdcBuilding,
            },
            status: None,
            info: InfoContent {
                title: odc.name.clone(),
                fields: vec![
                    ("Capacity".to_string(), format!("{} ports", odc.capacity)),
                    ("Address".to_string(), address_or_placeholder(&odc.address)),
                ],
                action: None,
            },
        })
    }
}

fn address_or_placeholder(address: &Option<String>) -> String {
    address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(MISSING_ADDRESS)
        .to_string()
}

/// One plotted entity
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: RecordId,
    pub category: MarkerCategory,
    pub position: GeoPosition,
    pub title: String,
    /// Customer status string; `None` for network equipment
    pub status: Option<String>,
    pub info: InfoContent,
    handle: MarkerHandle,
    attached: bool,
}

impl Marker {
    pub(crate) fn new(draft: MarkerDraft, handle: MarkerHandle) -> Self {
        Self {
            id: draft.id,
            category: draft.spec.category,
            position: draft.spec.position,
            title: draft.spec.title,
            status: draft.status,
            info: draft.info,
            handle,
            attached: false,
        }
    }

    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    /// Whether the marker is currently shown on the map
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Customer is online
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }

    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }
}

//! Map surface port and marker model
//!
//! The controller never touches a concrete map widget. It creates markers,
//! attaches and detaches them, and opens info popups through
//! [`MapSurface`]; a browser binding, a native renderer or the bundled
//! [`InMemorySurface`] can sit behind it.

pub mod collection;
pub mod marker;
pub mod memory;

pub use collection::MarkerCollection;
pub use marker::{GeoPosition, InfoAction, InfoContent, Marker, MarkerDraft};
pub use memory::InMemorySurface;

use serde::{Deserialize, Serialize};
use std::fmt;

/// DOM id of the map container
pub const MAP_ELEMENT_ID: &str = "google-map";

/// Opaque handle to a marker owned by the map widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Kind of network asset a marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerCategory {
    Customer,
    Odp,
    Odc,
}

impl MarkerCategory {
    /// Plural label used in notifications
    pub fn label(&self) -> &'static str {
        match self {
            MarkerCategory::Customer => "customers",
            MarkerCategory::Odp => "ODP",
            MarkerCategory::Odc => "ODC",
        }
    }
}

/// Visual of a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerIcon {
    /// Coloured dot, styled by the customer status string
    CustomerDot { status: String },
    /// Antenna icon
    OdpAntenna,
    /// Building icon
    OdcBuilding,
}

/// Everything the surface needs to create a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub position: GeoPosition,
    pub title: String,
    pub category: MarkerCategory,
    pub icon: MarkerIcon,
}

/// Initial map view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    pub center: GeoPosition,
    pub zoom: u8,
}

/// Map widget port
///
/// Calls are synchronous; implementations are expected to be cheap and to
/// use interior mutability. Detaching or discarding an unknown handle is a
/// no-op.
pub trait MapSurface: Send + Sync {
    /// Prepare the widget with its initial view
    fn initialize(&self, options: &MapOptions);

    /// Create a detached marker and return its handle
    fn create_marker(&self, spec: &MarkerSpec) -> MarkerHandle;

    /// Show the marker on the map
    fn attach(&self, handle: MarkerHandle);

    /// Remove the marker from the map, keeping the handle valid
    fn detach(&self, handle: MarkerHandle);

    /// Release the marker; the handle must not be used afterwards
    fn discard(&self, handle: MarkerHandle);

    /// Open the info popup anchored at the marker
    fn open_info_window(&self, handle: MarkerHandle, content: &InfoContent);
}

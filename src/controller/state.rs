//! Mutable state owned by the map view controller

use crate::client::NetworkStatus;
use crate::controller::filters::{OdpSelection, StatusFilter};
use crate::map::{MarkerCategory, MarkerCollection};
use serde::Serialize;

/// One of the four data loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadKind {
    Status,
    Customers,
    Odp,
    Odc,
}

impl LoadKind {
    fn index(self) -> usize {
        match self {
            LoadKind::Status => 0,
            LoadKind::Customers => 1,
            LoadKind::Odp => 2,
            LoadKind::Odc => 3,
        }
    }
}

impl From<MarkerCategory> for LoadKind {
    fn from(category: MarkerCategory) -> Self {
        match category {
            MarkerCategory::Customer => LoadKind::Customers,
            MarkerCategory::Odp => LoadKind::Odp,
            MarkerCategory::Odc => LoadKind::Odc,
        }
    }
}

/// Per-load sequence numbers.
///
/// A completion applies only if its ticket is still the newest one issued
/// for that load, so a slow earlier request cannot overwrite a later one.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    issued: [u64; 4],
}

impl LoadSequencer {
    pub fn issue(&mut self, kind: LoadKind) -> u64 {
        let slot = &mut self.issued[kind.index()];
        *slot += 1;
        *slot
    }

    pub fn is_latest(&self, kind: LoadKind, ticket: u64) -> bool {
        self.issued[kind.index()] == ticket
    }
}

/// Markers, layer flags, filters and counters
#[derive(Debug)]
pub struct MapState {
    pub customers: MarkerCollection,
    pub odp: MarkerCollection,
    pub odc: MarkerCollection,
    /// Governs ODP and ODC markers together
    pub odp_layer_visible: bool,
    pub customer_layer_visible: bool,
    pub status_filter: StatusFilter,
    pub odp_selection: OdpSelection,
    pub status: NetworkStatus,
    pub sequencer: LoadSequencer,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            customers: MarkerCollection::new(),
            odp: MarkerCollection::new(),
            odc: MarkerCollection::new(),
            odp_layer_visible: true,
            customer_layer_visible: true,
            status_filter: StatusFilter::All,
            odp_selection: OdpSelection::All,
            status: NetworkStatus::default(),
            sequencer: LoadSequencer::default(),
        }
    }
}

impl MapState {
    pub fn collection(&self, category: MarkerCategory) -> &MarkerCollection {
        match category {
            MarkerCategory::Customer => &self.customers,
            MarkerCategory::Odp => &self.odp,
            MarkerCategory::Odc => &self.odc,
        }
    }

    pub fn collection_mut(&mut self, category: MarkerCategory) -> &mut MarkerCollection {
        match category {
            MarkerCategory::Customer => &mut self.customers,
            MarkerCategory::Odp => &mut self.odp,
            MarkerCategory::Odc => &mut self.odc,
        }
    }

    /// Visibility flag governing a category
    pub fn is_visible(&self, category: MarkerCategory) -> bool {
        match category {
            MarkerCategory::Customer => self.customer_layer_visible,
            MarkerCategory::Odp | MarkerCategory::Odc => self.odp_layer_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_tracks_latest_per_kind() {
        let mut sequencer = LoadSequencer::default();
        let first = sequencer.issue(LoadKind::Customers);
        let second = sequencer.issue(LoadKind::Customers);
        let odp = sequencer.issue(LoadKind::Odp);

        assert!(!sequencer.is_latest(LoadKind::Customers, first));
        assert!(sequencer.is_latest(LoadKind::Customers, second));
        assert!(sequencer.is_latest(LoadKind::Odp, odp));
    }

    #[test]
    fn test_odc_follows_odp_layer() {
        let mut state = MapState::default();
        state.odp_layer_visible = false;
        assert!(!state.is_visible(MarkerCategory::Odc));
        assert!(state.is_visible(MarkerCategory::Customer));
    }
}

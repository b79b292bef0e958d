//! Map view controller
//!
//! Owns the map lifecycle, the three marker collections, layer visibility
//! and filters, and sequences the four backend loads that feed them. All
//! state lives behind one lock that is never held across a network await:
//! a load fetches first, then applies its result in a single critical
//! section, so a category either refreshes completely or keeps its
//! previous markers.

pub mod filters;
pub mod state;

pub use filters::{OdpSelection, StatusFilter, ALL_ODP};
pub use state::{LoadKind, MapState};

use crate::client::{NetworkApi, NetworkStatus};
use crate::config::NetMapConfig;
use crate::display::{Counter, Display, FilterOption, Layer, Notification, NotificationKind};
use crate::error::Result;
use crate::map::{
    GeoPosition, InfoAction, MapOptions, MapSurface, Marker, MarkerCategory, MarkerDraft,
    MarkerHandle,
};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Result of one data load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The response was applied. `markers` counts records that had valid
    /// coordinates; it is zero for the status counters.
    Applied { records: usize, markers: usize },
    /// A newer load of the same kind was issued while this one was in
    /// flight; its result was dropped
    Superseded,
}

/// Outcome of the four loads run by a refresh or the initial load
#[derive(Debug)]
pub struct RefreshReport {
    pub status: Result<LoadOutcome>,
    pub customers: Result<LoadOutcome>,
    pub odp: Result<LoadOutcome>,
    pub odc: Result<LoadOutcome>,
}

impl RefreshReport {
    pub fn is_success(&self) -> bool {
        self.status.is_ok() && self.customers.is_ok() && self.odp.is_ok() && self.odc.is_ok()
    }

    /// Loads that failed
    pub fn failures(&self) -> Vec<LoadKind> {
        [
            (LoadKind::Status, self.status.is_err()),
            (LoadKind::Customers, self.customers.is_err()),
            (LoadKind::Odp, self.odp.is_err()),
            (LoadKind::Odc, self.odc.is_err()),
        ]
        .into_iter()
        .filter_map(|(kind, failed)| failed.then_some(kind))
        .collect()
    }
}

/// Marker totals of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerCounts {
    pub total: usize,
    pub attached: usize,
}

/// Serializable view of the controller state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub status: NetworkStatus,
    pub odp_layer_visible: bool,
    pub customer_layer_visible: bool,
    pub status_filter: StatusFilter,
    pub odp_selection: OdpSelection,
    pub customers: LayerCounts,
    pub odp: LayerCounts,
    pub odc: LayerCounts,
}

/// Controller behind the network map page
pub struct MapViewController {
    config: NetMapConfig,
    api: Arc<dyn NetworkApi>,
    surface: Arc<dyn MapSurface>,
    display: Arc<dyn Display>,
    state: RwLock<MapState>,
    ready: AtomicBool,
    refreshing: AtomicBool,
}

/// Clears the refresh flag when a refresh ends or is dropped
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl MapViewController {
    pub fn new(
        config: NetMapConfig,
        api: Arc<dyn NetworkApi>,
        surface: Arc<dyn MapSurface>,
        display: Arc<dyn Display>,
    ) -> Self {
        Self {
            config,
            api,
            surface,
            display,
            state: RwLock::new(MapState::default()),
            ready: AtomicBool::new(false),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Set up the map surface and sync the layer buttons with the initial flags
    pub fn initialize(&self) {
        let options = MapOptions {
            center: GeoPosition {
                lat: self.config.map.center_lat,
                lng: self.config.map.center_lng,
            },
            zoom: self.config.map.zoom,
        };
        info!(
            lat = options.center.lat,
            lng = options.center.lng,
            zoom = options.zoom,
            "Initializing map surface"
        );
        self.surface.initialize(&options);
        self.display.set_layer_button(Layer::Odp, true);
        self.display.set_layer_button(Layer::Customers, true);
    }

    /// Ready signal from the map widget. The first call runs the initial
    /// load; later calls return `None` without doing anything.
    pub async fn on_map_ready(&self) -> Option<RefreshReport> {
        if self.ready.swap(true, Ordering::SeqCst) {
            debug!("Map ready signal ignored, initial load already triggered");
            return None;
        }

        info!("Loading initial data...");
        Some(self.load_all().await)
    }

    /// Reload everything while the refresh control shows as busy. Returns
    /// `None` without loading when a refresh is already running.
    pub async fn refresh(&self) -> Option<RefreshReport> {
        if self.refreshing.swap(true, Ordering::SeqCst) {
            debug!("Refresh already in progress, ignoring request");
            return None;
        }
        let _guard = RefreshGuard(&self.refreshing);

        info!("Refreshing map data");
        self.display.set_refresh_busy(true);

        let report = self.load_all().await;
        if report.is_success() {
            self.notify(NotificationKind::Success, "Data refreshed successfully");
        } else {
            warn!(failed = ?report.failures(), "Refresh completed with errors");
            self.notify(NotificationKind::Error, "Error refreshing data");
        }

        // Keep the busy state visible for a moment to avoid flicker
        tokio::time::sleep(self.config.ui.refresh_restore_delay).await;
        self.display.set_refresh_busy(false);

        Some(report)
    }

    async fn load_all(&self) -> RefreshReport {
        let (status, customers, odp, odc) = futures::join!(
            self.load_network_status(),
            self.load_customers(),
            self.load_odp(),
            self.load_odc()
        );

        RefreshReport {
            status,
            customers,
            odp,
            odc,
        }
    }

    /// Fetch the aggregate counters. On failure the counters drop to zero.
    pub async fn load_network_status(&self) -> Result<LoadOutcome> {
        let ticket = self.state.write().await.sequencer.issue(LoadKind::Status);
        let result = self.api.fetch_status().await;

        let mut state = self.state.write().await;
        if !state.sequencer.is_latest(LoadKind::Status, ticket) {
            debug!(ticket, "Discarding superseded network status response");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(status) => {
                debug!(?status, "Network status loaded");
                state.status = status;
                self.show_counters(&status);
                Ok(LoadOutcome::Applied {
                    records: 1,
                    markers: 0,
                })
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Error loading network status");
                state.status = NetworkStatus::default();
                self.show_counters(&state.status);
                self.notify(NotificationKind::Error, "Error loading network status");
                Err(e)
            }
        }
    }

    /// Rebuild customer markers. A successful reload clears the status filter.
    pub async fn load_customers(&self) -> Result<LoadOutcome> {
        self.load_category(
            MarkerCategory::Customer,
            self.api.fetch_customers(),
            MarkerDraft::from_customer,
            |state, _| {
                if state.status_filter != StatusFilter::All {
                    debug!(previous = %state.status_filter, "Status filter reset by reload");
                }
                state.status_filter = StatusFilter::All;
            },
        )
        .await
    }

    /// Rebuild ODP markers and repopulate the ODP filter select
    pub async fn load_odp(&self) -> Result<LoadOutcome> {
        self.load_category(
            MarkerCategory::Odp,
            self.api.fetch_odp(),
            MarkerDraft::from_odp,
            |state, odp_list| {
                let ids: Vec<String> = odp_list.iter().map(|odp| odp.id.to_string()).collect();
                state.odp_selection = state
                    .odp_selection
                    .reconcile(ids.iter().map(String::as_str));

                let options: Vec<FilterOption> = std::iter::once(FilterOption {
                    value: ALL_ODP.to_string(),
                    label: "All ODP".to_string(),
                })
                .chain(odp_list.iter().zip(&ids).map(|(odp, id)| FilterOption {
                    value: id.clone(),
                    label: odp.name.clone(),
                }))
                .collect();

                self.display
                    .set_odp_filter_options(&options, state.odp_selection.value());
            },
        )
        .await
    }

    /// Rebuild ODC markers
    pub async fn load_odc(&self) -> Result<LoadOutcome> {
        self.load_category(
            MarkerCategory::Odc,
            self.api.fetch_odc(),
            MarkerDraft::from_odc,
            |_, _| {},
        )
        .await
    }

    async fn load_category<T, F, A>(
        &self,
        category: MarkerCategory,
        fetch: F,
        draft: fn(&T) -> Option<MarkerDraft>,
        on_applied: A,
    ) -> Result<LoadOutcome>
    where
        F: Future<Output = Result<Vec<T>>>,
        A: FnOnce(&mut MapState, &[T]),
    {
        let kind = LoadKind::from(category);
        let ticket = self.state.write().await.sequencer.issue(kind);
        let result = fetch.await;

        let mut state = self.state.write().await;
        if !state.sequencer.is_latest(kind, ticket) {
            debug!(?kind, ticket, "Discarding superseded response");
            return Ok(LoadOutcome::Superseded);
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                error!(?kind, error = %e, "Error loading {} data", category.label());
                self.notify(
                    NotificationKind::Error,
                    format!("Error loading {} data", category.label()),
                );
                return Err(e);
            }
        };

        let visible = state.is_visible(category);
        let collection = state.collection_mut(category);
        collection.replace(self.surface.as_ref(), records.iter().filter_map(draft), visible);
        let markers = collection.len();

        on_applied(&mut *state, records.as_slice());

        info!(
            ?kind,
            records = records.len(),
            markers,
            skipped = records.len() - markers,
            "{} loaded",
            category.label()
        );
        if !records.is_empty() {
            self.notify(
                NotificationKind::Success,
                format!("{} {} loaded on map", records.len(), category.label()),
            );
        }

        Ok(LoadOutcome::Applied {
            records: records.len(),
            markers,
        })
    }

    /// Flip the ODP layer (ODP and ODC markers). Returns the new visibility.
    pub async fn toggle_odp_layer(&self) -> bool {
        let mut state = self.state.write().await;
        state.odp_layer_visible = !state.odp_layer_visible;
        let visible = state.odp_layer_visible;

        let surface = self.surface.as_ref();
        if visible {
            state.odp.attach_all(surface);
            state.odc.attach_all(surface);
        } else {
            state.odp.detach_all(surface);
            state.odc.detach_all(surface);
        }

        self.display.set_layer_button(Layer::Odp, visible);
        if visible {
            self.notify(NotificationKind::Success, "ODP shown");
        } else {
            self.notify(NotificationKind::Info, "ODP hidden");
        }
        visible
    }

    /// Flip the customer layer. Showing it attaches every customer marker,
    /// which also clears any status filter.
    pub async fn toggle_customer_layer(&self) -> bool {
        let mut state = self.state.write().await;
        state.customer_layer_visible = !state.customer_layer_visible;
        let visible = state.customer_layer_visible;

        let surface = self.surface.as_ref();
        if visible {
            state.customers.attach_all(surface);
            state.status_filter = StatusFilter::All;
        } else {
            state.customers.detach_all(surface);
        }

        self.display.set_layer_button(Layer::Customers, visible);
        if visible {
            self.notify(NotificationKind::Success, "Customers shown");
        } else {
            self.notify(NotificationKind::Info, "Customers hidden");
        }
        visible
    }

    /// Show only customers matching `filter`, within the customer layer.
    /// Returns how many customer markers are attached afterwards.
    pub async fn filter_by_status(&self, filter: StatusFilter) -> usize {
        let mut state = self.state.write().await;
        let layer_visible = state.customer_layer_visible;
        state.status_filter = filter;
        state
            .customers
            .apply(self.surface.as_ref(), |marker| layer_visible && filter.admits(marker));
        let shown = state.customers.attached_count();

        debug!(%filter, shown, total = state.customers.len(), "Status filter applied");
        self.notify(NotificationKind::Info, format!("Status filter: {filter}"));
        shown
    }

    /// Record the ODP filter selection
    pub async fn filter_by_odp(&self, value: &str) {
        let selection = OdpSelection::from_value(value);
        debug!(selection = selection.value(), "ODP filter selected");
        self.notify(
            NotificationKind::Info,
            format!("ODP filter: {}", selection.value()),
        );
        self.state.write().await.odp_selection = selection;
    }

    /// Click on a marker: open its info popup. Returns false for unknown handles.
    pub async fn handle_marker_click(&self, handle: MarkerHandle) -> bool {
        let state = self.state.read().await;
        let marker = [&state.customers, &state.odp, &state.odc]
            .into_iter()
            .find_map(|collection| collection.find(handle));

        match marker {
            Some(marker) => {
                self.surface.open_info_window(handle, &marker.info);
                true
            }
            None => {
                debug!(%handle, "Click on unknown marker");
                false
            }
        }
    }

    /// Button inside an info popup
    pub fn handle_info_action(&self, action: &InfoAction) {
        match action {
            InfoAction::ShowCustomerDetails(id) => {
                info!(%id, "Show customer details");
                self.notify(
                    NotificationKind::Info,
                    format!("Opening customer details ID: {id}"),
                );
            }
            InfoAction::ViewOdpCustomers(id) => {
                info!(%id, "View ODP customers");
                self.notify(
                    NotificationKind::Info,
                    format!("Viewing customers of ODP ID: {id}"),
                );
            }
        }
    }

    pub fn ping_selected_customer(&self) {
        self.notify(NotificationKind::Info, "Ping feature coming soon");
    }

    /// Detach and discard every marker
    pub async fn dispose(&self) {
        let mut state = self.state.write().await;
        let surface = self.surface.as_ref();
        state.customers.clear(surface);
        state.odp.clear(surface);
        state.odc.clear(surface);
        info!("Map view disposed");
    }

    /// Copy of the markers of one category
    pub async fn markers(&self, category: MarkerCategory) -> Vec<Marker> {
        self.state
            .read()
            .await
            .collection(category)
            .iter()
            .cloned()
            .collect()
    }

    pub async fn is_layer_visible(&self, layer: Layer) -> bool {
        let state = self.state.read().await;
        match layer {
            Layer::Odp => state.odp_layer_visible,
            Layer::Customers => state.customer_layer_visible,
        }
    }

    pub async fn snapshot(&self) -> MapSnapshot {
        let state = self.state.read().await;
        let counts = |category: MarkerCategory| {
            let collection = state.collection(category);
            LayerCounts {
                total: collection.len(),
                attached: collection.attached_count(),
            }
        };

        MapSnapshot {
            status: state.status,
            odp_layer_visible: state.odp_layer_visible,
            customer_layer_visible: state.customer_layer_visible,
            status_filter: state.status_filter,
            odp_selection: state.odp_selection.clone(),
            customers: counts(MarkerCategory::Customer),
            odp: counts(MarkerCategory::Odp),
            odc: counts(MarkerCategory::Odc),
        }
    }

    fn show_counters(&self, status: &NetworkStatus) {
        for counter in Counter::ALL {
            let value = match counter {
                Counter::TotalCustomers => status.total_customers,
                Counter::OnlineCustomers => status.online_customers,
                Counter::TotalOdp => status.total_odp,
                Counter::TotalOdc => status.total_odc,
            };
            self.display.set_counter(counter, value);
        }
    }

    fn notify<S: Into<String>>(&self, kind: NotificationKind, message: S) {
        self.display.notify(&Notification {
            message: message.into(),
            kind,
            ttl: self.config.ui.notification_ttl,
        });
    }
}

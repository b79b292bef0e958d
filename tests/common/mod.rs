//! Common test utilities
//!
//! A WireMock-backed dashboard API, JSON fixtures and a display that keeps
//! what the controller showed.

#![allow(dead_code)]

pub mod backend_mock;

use ftth_netmap::display::{Counter, Display, FilterOption, Layer, Notification, NotificationKind};
use ftth_netmap::map::InMemorySurface;
use ftth_netmap::{client, MapViewController, NetMapConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Configuration pointing at a mock backend, with a short restore delay
pub fn test_config(base_url: &str) -> NetMapConfig {
    let mut config = NetMapConfig::default();
    config.api.base_url = Url::parse(base_url).unwrap();
    config.api.timeout = Duration::from_secs(5);
    config.ui.refresh_restore_delay = Duration::from_millis(20);
    config
}

/// Controller wired to the HTTP client, an in-memory surface and a capturing display
pub fn build_controller(
    config: NetMapConfig,
) -> (MapViewController, Arc<InMemorySurface>, Arc<CapturingDisplay>) {
    let api = client::create_client(&config).unwrap();
    let surface = Arc::new(InMemorySurface::new());
    let display = Arc::new(CapturingDisplay::default());
    let controller = MapViewController::new(config, api, surface.clone(), display.clone());
    (controller, surface, display)
}

/// Display that remembers the latest state of every element
#[derive(Debug, Default)]
pub struct CapturingDisplay {
    counters: Mutex<HashMap<Counter, u64>>,
    notifications: Mutex<Vec<Notification>>,
    layer_buttons: Mutex<HashMap<Layer, bool>>,
    busy: Mutex<Vec<bool>>,
    odp_options: Mutex<Option<(Vec<FilterOption>, String)>>,
}

impl CapturingDisplay {
    pub fn counter(&self, counter: Counter) -> Option<u64> {
        self.counters.lock().unwrap().get(&counter).copied()
    }

    pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn layer_button(&self, layer: Layer) -> Option<bool> {
        self.layer_buttons.lock().unwrap().get(&layer).copied()
    }

    pub fn busy_history(&self) -> Vec<bool> {
        self.busy.lock().unwrap().clone()
    }

    pub fn odp_options(&self) -> Option<(Vec<FilterOption>, String)> {
        self.odp_options.lock().unwrap().clone()
    }
}

impl Display for CapturingDisplay {
    fn set_counter(&self, counter: Counter, value: u64) {
        self.counters.lock().unwrap().insert(counter, value);
    }

    fn notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }

    fn set_layer_button(&self, layer: Layer, active: bool) {
        self.layer_buttons.lock().unwrap().insert(layer, active);
    }

    fn set_refresh_busy(&self, busy: bool) {
        self.busy.lock().unwrap().push(busy);
    }

    fn set_odp_filter_options(&self, options: &[FilterOption], selected: &str) {
        *self.odp_options.lock().unwrap() = Some((options.to_vec(), selected.to_string()));
    }
}

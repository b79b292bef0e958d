//! Display port: counters, controls and transient notifications
//!
//! Element ids match the dashboard template so a DOM binding can map each
//! call straight onto an element.

use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

/// Statistics cards on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    TotalCustomers,
    OnlineCustomers,
    TotalOdp,
    TotalOdc,
}

impl Counter {
    pub const ALL: [Counter; 4] = [
        Counter::TotalCustomers,
        Counter::OnlineCustomers,
        Counter::TotalOdp,
        Counter::TotalOdc,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            Counter::TotalCustomers => "total-customers",
            Counter::OnlineCustomers => "online-customers",
            Counter::TotalOdp => "total-odp",
            Counter::TotalOdc => "total-odc",
        }
    }
}

/// Toggleable marker layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// ODP and ODC markers together
    Odp,
    Customers,
}

impl Layer {
    /// Id of the toggle button
    pub fn button_id(&self) -> &'static str {
        match self {
            Layer::Odp => "toggleODPBtn",
            Layer::Customers => "toggleCustomerBtn",
        }
    }
}

pub const REFRESH_BUTTON_ID: &str = "refreshBtn";
pub const LOADING_INDICATOR_ID: &str = "loadingSpinner";

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    /// Bootstrap alert class suffix
    pub fn alert_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "danger",
        }
    }
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    /// Auto-dismiss delay
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

/// Option of the ODP filter select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Presentation port the controller writes through
pub trait Display: Send + Sync {
    fn set_counter(&self, counter: Counter, value: u64);

    fn notify(&self, notification: &Notification);

    /// Mark a layer toggle button as active or inactive
    fn set_layer_button(&self, layer: Layer, active: bool);

    /// Disable the refresh control and show the loading indicator, or undo it
    fn set_refresh_busy(&self, busy: bool);

    /// Replace the ODP filter options and select `selected`
    fn set_odp_filter_options(&self, options: &[FilterOption], selected: &str);
}

/// Display that reports everything through `tracing`
#[derive(Debug, Default)]
pub struct LogDisplay;

impl Display for LogDisplay {
    fn set_counter(&self, counter: Counter, value: u64) {
        info!(counter = counter.element_id(), value, "counter updated");
    }

    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Error => error!("{}", notification.message),
            NotificationKind::Warning => warn!("{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                info!("{}", notification.message)
            }
        }
    }

    fn set_layer_button(&self, layer: Layer, active: bool) {
        info!(button = layer.button_id(), active, "layer toggled");
    }

    fn set_refresh_busy(&self, busy: bool) {
        info!(busy, "refresh state changed");
    }

    fn set_odp_filter_options(&self, options: &[FilterOption], selected: &str) {
        info!(options = options.len(), selected, "ODP filter repopulated");
    }
}

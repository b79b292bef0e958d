//! Mock implementations for testing
//!
//! Scriptable backend and a display that records every call.

use crate::client::{CustomerRecord, NetworkApi, NetworkStatus, OdcRecord, OdpRecord};
use crate::display::{Counter, Display, FilterOption, Layer, Notification, NotificationKind};
use crate::error::{NetMapError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct ScriptState<T> {
    /// One-shot replies, consumed in order; `None` means failure
    queue: VecDeque<(Option<T>, Duration)>,
    /// Reply once the queue is empty
    fallback: Option<T>,
    calls: usize,
}

/// Replies of one mocked endpoint
#[derive(Debug)]
pub struct Scripted<T> {
    endpoint: &'static str,
    state: Mutex<ScriptState<T>>,
}

impl<T: Clone> Scripted<T> {
    fn new(endpoint: &'static str, initial: T) -> Self {
        Self {
            endpoint,
            state: Mutex::new(ScriptState {
                queue: VecDeque::new(),
                fallback: Some(initial),
                calls: 0,
            }),
        }
    }

    /// Answer every later call with `value`
    pub fn respond(&self, value: T) {
        lock(&self.state).fallback = Some(value);
    }

    /// Fail every later call with HTTP 500
    pub fn fail(&self) {
        lock(&self.state).fallback = None;
    }

    /// Queue a single reply that arrives after `delay`
    pub fn enqueue(&self, reply: Option<T>, delay: Duration) {
        lock(&self.state).queue.push_back((reply, delay));
    }

    /// Number of requests made so far
    pub fn calls(&self) -> usize {
        lock(&self.state).calls
    }

    async fn next(&self) -> Result<T> {
        let (reply, delay) = {
            let mut state = lock(&self.state);
            state.calls += 1;
            match state.queue.pop_front() {
                Some(queued) => queued,
                None => (state.fallback.clone(), Duration::ZERO),
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.ok_or_else(|| NetMapError::status(self.endpoint, 500))
    }
}

/// Mock backend; unconfigured endpoints answer with empty data
#[derive(Debug)]
pub struct MockNetworkApi {
    pub status: Scripted<NetworkStatus>,
    pub customers: Scripted<Vec<CustomerRecord>>,
    pub odp: Scripted<Vec<OdpRecord>>,
    pub odc: Scripted<Vec<OdcRecord>>,
}

impl MockNetworkApi {
    pub fn new() -> Self {
        Self {
            status: Scripted::new("/api/network/status", NetworkStatus::default()),
            customers: Scripted::new("/api/customers/map", Vec::new()),
            odp: Scripted::new("/api/network/odp", Vec::new()),
            odc: Scripted::new("/api/network/odc", Vec::new()),
        }
    }

    /// Total requests over all endpoints
    pub fn total_calls(&self) -> usize {
        self.status.calls() + self.customers.calls() + self.odp.calls() + self.odc.calls()
    }
}

impl Default for MockNetworkApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkApi for MockNetworkApi {
    async fn fetch_status(&self) -> Result<NetworkStatus> {
        self.status.next().await
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>> {
        self.customers.next().await
    }

    async fn fetch_odp(&self) -> Result<Vec<OdpRecord>> {
        self.odp.next().await
    }

    async fn fetch_odc(&self) -> Result<Vec<OdcRecord>> {
        self.odc.next().await
    }
}

/// Call received by [`RecordingDisplay`]
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Counter(Counter, u64),
    Notify(Notification),
    LayerButton(Layer, bool),
    RefreshBusy(bool),
    OdpOptions {
        options: Vec<FilterOption>,
        selected: String,
    },
}

/// Display that keeps a timestamped log of calls
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<(Instant, DisplayEvent)>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: DisplayEvent) {
        lock(&self.events).push((Instant::now(), event));
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        lock(&self.events).iter().map(|(_, e)| e.clone()).collect()
    }

    /// Latest value written to each counter
    pub fn counters(&self) -> HashMap<Counter, u64> {
        let mut counters = HashMap::new();
        for (_, event) in lock(&self.events).iter() {
            if let DisplayEvent::Counter(counter, value) = event {
                counters.insert(*counter, *value);
            }
        }
        counters
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.events)
            .iter()
            .filter_map(|(_, event)| match event {
                DisplayEvent::Notify(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn has_notification(&self, kind: NotificationKind, message: &str) -> bool {
        self.notifications()
            .iter()
            .any(|n| n.kind == kind && n.message == message)
    }

    /// Busy-state changes of the refresh control with their timestamps
    pub fn busy_transitions(&self) -> Vec<(Instant, bool)> {
        lock(&self.events)
            .iter()
            .filter_map(|(at, event)| match event {
                DisplayEvent::RefreshBusy(busy) => Some((*at, *busy)),
                _ => None,
            })
            .collect()
    }

    pub fn last_odp_options(&self) -> Option<(Vec<FilterOption>, String)> {
        lock(&self.events)
            .iter()
            .rev()
            .find_map(|(_, event)| match event {
                DisplayEvent::OdpOptions { options, selected } => {
                    Some((options.clone(), selected.clone()))
                }
                _ => None,
            })
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl Display for RecordingDisplay {
    fn set_counter(&self, counter: Counter, value: u64) {
        self.record(DisplayEvent::Counter(counter, value));
    }

    fn notify(&self, notification: &Notification) {
        self.record(DisplayEvent::Notify(notification.clone()));
    }

    fn set_layer_button(&self, layer: Layer, active: bool) {
        self.record(DisplayEvent::LayerButton(layer, active));
    }

    fn set_refresh_busy(&self, busy: bool) {
        self.record(DisplayEvent::RefreshBusy(busy));
    }

    fn set_odp_filter_options(&self, options: &[FilterOption], selected: &str) {
        self.record(DisplayEvent::OdpOptions {
            options: options.to_vec(),
            selected: selected.to_string(),
        });
    }
}

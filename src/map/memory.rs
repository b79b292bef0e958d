//! In-memory map surface
//!
//! Keeps markers in a table instead of drawing them. Used by the headless
//! CLI and as the surface in tests.

use crate::map::{InfoContent, MapOptions, MapSurface, MarkerCategory, MarkerHandle, MarkerSpec};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{trace, warn};

#[derive(Debug, Clone)]
struct SurfaceMarker {
    spec: MarkerSpec,
    attached: bool,
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_handle: u64,
    options: Option<MapOptions>,
    markers: BTreeMap<MarkerHandle, SurfaceMarker>,
    popups: Vec<(MarkerHandle, InfoContent)>,
}

/// Map surface backed by a table of markers
#[derive(Debug, Default)]
pub struct InMemorySurface {
    state: Mutex<SurfaceState>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Surface state mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Options passed to `initialize`, if it was called
    pub fn options(&self) -> Option<MapOptions> {
        self.lock().options.clone()
    }

    /// Live (not discarded) markers
    pub fn marker_count(&self) -> usize {
        self.lock().markers.len()
    }

    /// Markers currently shown
    pub fn attached_count(&self) -> usize {
        self.lock().markers.values().filter(|m| m.attached).count()
    }

    /// Markers of one category currently shown
    pub fn attached_in(&self, category: MarkerCategory) -> usize {
        self.lock()
            .markers
            .values()
            .filter(|m| m.attached && m.spec.category == category)
            .count()
    }

    pub fn exists(&self, handle: MarkerHandle) -> bool {
        self.lock().markers.contains_key(&handle)
    }

    pub fn is_attached(&self, handle: MarkerHandle) -> bool {
        self.lock()
            .markers
            .get(&handle)
            .map(|m| m.attached)
            .unwrap_or(false)
    }

    /// Specs of the markers currently shown, in handle order
    pub fn attached_specs(&self) -> Vec<MarkerSpec> {
        self.lock()
            .markers
            .values()
            .filter(|m| m.attached)
            .map(|m| m.spec.clone())
            .collect()
    }

    /// Info popups opened so far
    pub fn opened_popups(&self) -> Vec<(MarkerHandle, InfoContent)> {
        self.lock().popups.clone()
    }
}

impl MapSurface for InMemorySurface {
    fn initialize(&self, options: &MapOptions) {
        self.lock().options = Some(options.clone());
    }

    fn create_marker(&self, spec: &MarkerSpec) -> MarkerHandle {
        let mut state = self.lock();
        state.next_handle += 1;
        let handle = MarkerHandle(state.next_handle);
        state.markers.insert(
            handle,
            SurfaceMarker {
                spec: spec.clone(),
                attached: false,
            },
        );
        trace!(%handle, title = %spec.title, "marker created");
        handle
    }

    fn attach(&self, handle: MarkerHandle) {
        if let Some(marker) = self.lock().markers.get_mut(&handle) {
            marker.attached = true;
        }
    }

    fn detach(&self, handle: MarkerHandle) {
        if let Some(marker) = self.lock().markers.get_mut(&handle) {
            marker.attached = false;
        }
    }

    fn discard(&self, handle: MarkerHandle) {
        self.lock().markers.remove(&handle);
    }

    fn open_info_window(&self, handle: MarkerHandle, content: &InfoContent) {
        let mut state = self.lock();
        if state.markers.contains_key(&handle) {
            state.popups.push((handle, content.clone()));
        }
    }
}

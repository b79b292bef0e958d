//! Per-category marker collections

use crate::map::{MapSurface, Marker, MarkerDraft, MarkerHandle};

/// Ordered markers of one category, kept in sync with the surface
#[derive(Debug, Default)]
pub struct MarkerCollection {
    markers: Vec<Marker>,
}

impl MarkerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Number of markers currently shown on the map
    pub fn attached_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_attached()).count()
    }

    pub fn find(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.markers.iter().find(|m| m.handle() == handle)
    }

    /// Drop every current marker and build a new set from `drafts`.
    ///
    /// New markers are attached only when `visible` is set.
    pub fn replace<I>(&mut self, surface: &dyn MapSurface, drafts: I, visible: bool)
    where
        I: IntoIterator<Item = MarkerDraft>,
    {
        self.clear(surface);

        for draft in drafts {
            let handle = surface.create_marker(&draft.spec);
            let mut marker = Marker::new(draft, handle);
            if visible {
                surface.attach(handle);
                marker.set_attached(true);
            }
            self.markers.push(marker);
        }
    }

    /// Detach and discard every marker
    pub fn clear(&mut self, surface: &dyn MapSurface) {
        for marker in self.markers.drain(..) {
            if marker.is_attached() {
                surface.detach(marker.handle());
            }
            surface.discard(marker.handle());
        }
    }

    /// Show every marker
    pub fn attach_all(&mut self, surface: &dyn MapSurface) {
        self.apply(surface, |_| true);
    }

    /// Hide every marker, keeping them in the collection
    pub fn detach_all(&mut self, surface: &dyn MapSurface) {
        self.apply(surface, |_| false);
    }

    /// Attach markers the predicate accepts and detach the rest
    pub fn apply<F>(&mut self, surface: &dyn MapSurface, mut show: F)
    where
        F: FnMut(&Marker) -> bool,
    {
        for marker in &mut self.markers {
            let wanted = show(marker);
            if wanted && !marker.is_attached() {
                surface.attach(marker.handle());
                marker.set_attached(true);
            } else if !wanted && marker.is_attached() {
                surface.detach(marker.handle());
                marker.set_attached(false);
            }
        }
    }
}

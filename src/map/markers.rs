use crate::geo::LatLng;
use serde::{Deserialize, Serialize};

/// What happens to detached markers when the viewport changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRetention {
    /// Detached markers stay in the tracking list for the whole session.
    Retain,
    /// Detached markers are dropped together with the detach.
    #[default]
    Release,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    attached: bool,
}

impl Marker {
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    retention: MarkerRetention,
}

impl MarkerLayer {
    pub fn new(retention: MarkerRetention) -> Self {
        Self {
            markers: Vec::new(),
            retention,
        }
    }

    pub fn retention(&self) -> MarkerRetention {
        self.retention
    }

    /// Creates a marker attached to the map and tracks it. The list has no
    /// capacity bound.
    pub fn add(&mut self, position: LatLng) {
        self.markers.push(Marker {
            position,
            attached: true,
        });
    }

    /// Detaches every marker at once.
    pub fn detach_all(&mut self) {
        match self.retention {
            MarkerRetention::Retain => {
                for marker in &mut self.markers {
                    marker.attached = false;
                }
            }
            MarkerRetention::Release => self.markers.clear(),
        }
    }

    pub fn attached(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.attached)
    }

    pub fn attached_count(&self) -> usize {
        self.attached().count()
    }

    /// Number of tracked markers, attached or not.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

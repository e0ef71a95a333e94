//! Terminal map viewport.
//!
//! The map is an equirectangular projection drawn on a character grid. Zoom
//! levels behave like web map zoom levels: each step halves the number of
//! degrees covered by one terminal column. The view reports "idle" once the
//! configured delay has passed since the last pan, zoom, resize, fit or
//! recenter, which is when the client submits its bounds.

pub mod markers;

use crate::geo::{LatLng, LatLngBounds};
use std::time::{Duration, Instant};
use tracing::debug;

/// Number of terminal columns spanning 360 degrees of longitude at zoom 0.
pub const WORLD_COLUMNS_AT_ZOOM_0: f64 = 64.0;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 2.0;

const MAX_LATITUDE: f64 = 85.0;
const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub initial_bounds: LatLngBounds,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub idle_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct MapView {
    center: LatLng,
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    size: (u16, u16),
    pending_fit: Option<LatLngBounds>,
    idle_delay: Duration,
    moved_at: Option<Instant>,
}

impl MapView {
    /// Creates a view fitted to `initial_bounds`. The fit is applied once the
    /// panel size is known.
    pub fn new(options: MapOptions) -> Self {
        let min_zoom = options.min_zoom.min(options.max_zoom);
        Self {
            center: options.initial_bounds.center(),
            zoom: min_zoom,
            min_zoom,
            max_zoom: options.max_zoom,
            size: (0, 0),
            pending_fit: Some(options.initial_bounds),
            idle_delay: options.idle_delay,
            moved_at: None,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn is_sized(&self) -> bool {
        self.size.0 > 0 && self.size.1 > 0
    }

    fn degrees_per_column(zoom: u8) -> f64 {
        360.0 / (WORLD_COLUMNS_AT_ZOOM_0 * 2f64.powi(zoom as i32))
    }

    fn spans_at(&self, zoom: u8) -> (f64, f64) {
        let per_column = Self::degrees_per_column(zoom);
        let lng_span = self.size.0 as f64 * per_column;
        let lat_span = self.size.1 as f64 * per_column * CELL_ASPECT;
        (lat_span, lng_span)
    }

    /// The rectangle currently visible on screen. Corners are clipped to the
    /// valid coordinate range, so a view touching the antimeridian reports a
    /// narrower rectangle instead of a longitude past +/-180.
    pub fn bounds(&self) -> LatLngBounds {
        let (lat_span, lng_span) = self.spans_at(self.zoom);
        LatLngBounds::new(
            LatLng::new(
                (self.center.lat - lat_span / 2.0).max(-MAX_LATITUDE),
                (self.center.lng - lng_span / 2.0).max(-MAX_LONGITUDE),
            ),
            LatLng::new(
                (self.center.lat + lat_span / 2.0).min(MAX_LATITUDE),
                (self.center.lng + lng_span / 2.0).min(MAX_LONGITUDE),
            ),
        )
    }

    pub fn set_size(&mut self, cols: u16, rows: u16, now: Instant) {
        if self.size == (cols, rows) {
            return;
        }
        self.size = (cols, rows);
        if self.is_sized() {
            if let Some(target) = self.pending_fit.take() {
                self.apply_fit(target);
            }
        }
        self.mark_moved(now);
    }

    /// Picks the largest zoom in range that shows the whole rectangle and
    /// centers on it.
    pub fn fit_bounds(&mut self, target: LatLngBounds, now: Instant) {
        if self.is_sized() {
            self.apply_fit(target);
        } else {
            self.pending_fit = Some(target);
        }
        self.mark_moved(now);
    }

    fn apply_fit(&mut self, target: LatLngBounds) {
        let zoom = (self.min_zoom..=self.max_zoom)
            .rev()
            .find(|&zoom| {
                let (lat_span, lng_span) = self.spans_at(zoom);
                lat_span >= target.lat_span() && lng_span >= target.lng_span()
            })
            .unwrap_or(self.min_zoom);
        self.zoom = zoom;
        self.center = clamp_center(target.center());
        debug!(zoom, lat = self.center.lat, lng = self.center.lng, "map fitted to bounds");
    }

    pub fn set_center(&mut self, center: LatLng, now: Instant) {
        self.pending_fit = None;
        self.center = clamp_center(center);
        self.mark_moved(now);
    }

    /// Moves the center by a fraction of the visible span. Positive `dx` pans
    /// east, positive `dy` pans north.
    pub fn pan(&mut self, dx: f64, dy: f64, now: Instant) {
        let bounds = self.bounds();
        let center = LatLng::new(
            self.center.lat + dy * bounds.lat_span(),
            self.center.lng + dx * bounds.lng_span(),
        );
        self.set_center(center, now);
    }

    pub fn zoom_in(&mut self, now: Instant) {
        self.set_zoom(self.zoom.saturating_add(1), now);
    }

    pub fn zoom_out(&mut self, now: Instant) {
        self.set_zoom(self.zoom.saturating_sub(1), now);
    }

    fn set_zoom(&mut self, zoom: u8, now: Instant) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.mark_moved(now);
        }
    }

    fn mark_moved(&mut self, now: Instant) {
        self.moved_at = Some(now);
    }

    /// Returns true once per settled change, after the idle delay elapsed.
    pub fn take_idle(&mut self, now: Instant) -> bool {
        if !self.is_sized() {
            return false;
        }
        match self.moved_at {
            Some(moved_at) if now.saturating_duration_since(moved_at) >= self.idle_delay => {
                self.moved_at = None;
                true
            }
            _ => false,
        }
    }
}

fn clamp_center(center: LatLng) -> LatLng {
    LatLng::new(
        center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        wrap_longitude(center.lng),
    )
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    fn new_york() -> LatLngBounds {
        LatLngBounds::new(LatLng::new(40.0, -74.0), LatLng::new(41.0, -73.0))
    }

    fn view() -> MapView {
        MapView::new(MapOptions {
            initial_bounds: new_york(),
            min_zoom: 7,
            max_zoom: 12,
            idle_delay: DELAY,
        })
    }

    #[test]
    fn test_unsized_map_never_idles() {
        let mut map = view();
        let now = Instant::now();
        assert!(!map.take_idle(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_initial_fit_applied_on_first_size() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);

        let bounds = map.bounds();
        assert!(bounds.contains(&new_york().sw));
        assert!(bounds.contains(&new_york().ne));
        assert_eq!(map.center(), new_york().center());
        assert!((7..=12).contains(&map.zoom()));

        // One zoom level further in would no longer show the whole rectangle.
        let (lat_span, lng_span) = map.spans_at(map.zoom() + 1);
        assert!(lat_span < 1.0 || lng_span < 1.0);
    }

    #[test]
    fn test_idle_fires_once_after_delay() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);

        assert!(!map.take_idle(now + Duration::from_millis(100)));
        assert!(map.take_idle(now + DELAY));
        assert!(!map.take_idle(now + DELAY * 4));
    }

    #[test]
    fn test_movement_restarts_idle_delay() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);
        map.pan(0.25, 0.0, now + Duration::from_millis(200));

        assert!(!map.take_idle(now + DELAY));
        assert!(map.take_idle(now + Duration::from_millis(200) + DELAY));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);
        assert!(map.take_idle(now + DELAY));

        for _ in 0..20 {
            map.zoom_in(now);
        }
        assert_eq!(map.zoom(), 12);

        for _ in 0..20 {
            map.zoom_out(now);
        }
        assert_eq!(map.zoom(), 7);
    }

    #[test]
    fn test_zoom_at_limit_does_not_trigger_idle() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);
        for _ in 0..20 {
            map.zoom_out(now);
        }
        assert!(map.take_idle(now + DELAY));

        map.zoom_out(now + DELAY * 2);
        assert!(!map.take_idle(now + DELAY * 10));
    }

    #[test]
    fn test_huge_bounds_fall_back_to_min_zoom() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);
        map.fit_bounds(
            LatLngBounds::new(LatLng::new(-60.0, -170.0), LatLng::new(60.0, 170.0)),
            now,
        );
        assert_eq!(map.zoom(), 7);
        assert_eq!(map.center(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_set_center_keeps_bounds_symmetric() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);
        map.set_center(LatLng::new(40.0, -73.0), now);

        let center = map.bounds().center();
        assert!((center.lat - 40.0).abs() < 1e-9);
        assert!((center.lng + 73.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_near_antimeridian_stay_in_range() {
        let mut map = view();
        let now = Instant::now();
        map.set_size(80, 30, now);

        map.set_center(LatLng::new(0.0, 179.5), now);
        let east = map.bounds();
        assert!(east.is_valid(), "{:?}", east);
        assert_eq!(east.ne.lng, 180.0);
        assert!(east.sw.lng < 179.5);

        map.set_center(LatLng::new(0.0, -179.5), now);
        let west = map.bounds();
        assert!(west.is_valid(), "{:?}", west);
        assert_eq!(west.sw.lng, -180.0);
        assert!(west.ne.lng > -179.5);
    }

    #[test]
    fn test_size_tracks_canvas() {
        let mut map = view();
        assert_eq!(map.size(), (0, 0));
        map.set_size(80, 30, Instant::now());
        assert_eq!(map.size(), (80, 30));
    }

    #[test]
    fn test_longitude_wraps() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(-73.0), -73.0);
    }
}

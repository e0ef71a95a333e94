//! The shared client context and its event handlers.
//!
//! A [`Session`] owns the map, markers, feed, form and status for the whole
//! run. Every external event (map idle, server message, form submit) is a
//! method on it. Handlers never talk to the network: a bounds submission is
//! returned to the caller, which emits it.

use crate::channel::protocol::{Connected, NewTweet, SubmitBounds};
use crate::channel::ServerEvent;
use crate::config::Config;
use crate::form::{CoordForm, FormError};
use crate::map::markers::{MarkerLayer, MarkerRetention};
use crate::map::{MapOptions, MapView};
use crate::tweets::TweetFeed;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Failed(String),
}

#[derive(Debug)]
pub struct Session {
    pub map: MapView,
    pub markers: MarkerLayer,
    pub feed: TweetFeed,
    pub form: CoordForm,
    ws_id: Option<String>,
    connection: ConnectionState,
    last_submitted: Option<SubmitBounds>,
}

impl Session {
    pub fn new(map: MapOptions, max_tweets: usize, retention: MarkerRetention) -> Self {
        let mut form = CoordForm::new();
        form.set_center(map.initial_bounds.center());

        Self {
            map: MapView::new(map),
            markers: MarkerLayer::new(retention),
            feed: TweetFeed::new(max_tweets),
            form,
            ws_id: None,
            connection: ConnectionState::Connecting,
            last_submitted: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.map_options(),
            config.feed.max_tweets,
            config.markers.retention,
        )
    }

    pub fn ws_id(&self) -> Option<&str> {
        self.ws_id.as_deref()
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn last_submitted(&self) -> Option<&SubmitBounds> {
        self.last_submitted.as_ref()
    }

    /// Runs the bounds submission if the map has settled since its last change.
    pub fn poll_idle(&mut self, now: Instant) -> Option<SubmitBounds> {
        if self.map.take_idle(now) {
            Some(self.submit_bounds())
        } else {
            None
        }
    }

    /// Reads the visible rectangle, syncs the form, clears markers and feed,
    /// and returns the payload to emit.
    pub fn submit_bounds(&mut self) -> SubmitBounds {
        let bounds = self.map.bounds();
        self.form.set_center(bounds.center());
        self.markers.detach_all();
        self.feed.clear();

        let payload = SubmitBounds::from(bounds);
        info!(
            sw_lat = payload.sw.lat,
            sw_lng = payload.sw.lng,
            ne_lat = payload.ne.lat,
            ne_lng = payload.ne.lng,
            "viewport changed"
        );
        self.last_submitted = Some(payload);
        payload
    }

    pub fn on_connected(&mut self, msg: Connected, now: Instant) {
        info!(ws_id = %msg.ws_id, "session established");
        let bounds = msg.bounds();
        self.ws_id = Some(msg.ws_id);
        self.connection = ConnectionState::Connected;
        self.map.fit_bounds(bounds, now);
        self.form.set_center(bounds.center());
    }

    pub fn on_new_tweet(&mut self, msg: NewTweet) {
        debug!(lat = msg.lat, lng = msg.lng, "tweet received");
        let position = msg.position();
        self.feed.push(msg.tweet);
        self.markers.add(position);
    }

    pub fn on_disconnected(&mut self) {
        warn!("server connection closed");
        self.connection = ConnectionState::Disconnected;
    }

    pub fn on_error(&mut self, message: String) {
        warn!(%message, "server reported an error");
        self.connection = ConnectionState::Failed(message);
    }

    pub fn handle_server_event(&mut self, event: ServerEvent, now: Instant) {
        match event {
            ServerEvent::Connected(msg) => self.on_connected(msg, now),
            ServerEvent::NewTweet(msg) => self.on_new_tweet(msg),
            ServerEvent::Disconnected => self.on_disconnected(),
            ServerEvent::Error(message) => self.on_error(message),
        }
    }

    /// Recenters the map on the form's point. The resulting idle event
    /// produces the bounds submission.
    pub fn submit_form(&mut self, now: Instant) -> Result<(), FormError> {
        let center = self.form.read()?;
        debug!(lat = center.lat, lng = center.lng, "form submitted");
        self.map.set_center(center, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{LatLng, LatLngBounds};
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(250);

    fn session(retention: MarkerRetention) -> (Session, Instant) {
        let mut session = Session::new(
            MapOptions {
                initial_bounds: LatLngBounds::new(
                    LatLng::new(40.0, -74.0),
                    LatLng::new(41.0, -73.0),
                ),
                min_zoom: 7,
                max_zoom: 12,
                idle_delay: DELAY,
            },
            5,
            retention,
        );
        let now = Instant::now();
        session.map.set_size(80, 30, now);
        (session, now)
    }

    fn tweet(text: &str, lat: f64, lng: f64) -> NewTweet {
        NewTweet {
            tweet: text.to_string(),
            lat,
            lng,
        }
    }

    fn feed_texts(session: &Session) -> Vec<String> {
        session.feed.entries().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn test_initial_load_submits_bounds_once_idle() {
        let (mut session, now) = session(MarkerRetention::Release);
        assert!(session.poll_idle(now).is_none());

        let submitted = session.poll_idle(now + DELAY).expect("idle after initial fit");
        let center = submitted.bounds().center();
        assert!((center.lat - 40.5).abs() < 1e-9);
        assert!((center.lng + 73.5).abs() < 1e-9);
        assert_eq!(session.last_submitted(), Some(&submitted));
        assert!(session.poll_idle(now + DELAY * 2).is_none());
    }

    #[test]
    fn test_submit_writes_center_into_form() {
        let (mut session, _) = session(MarkerRetention::Release);
        session.map.fit_bounds(
            LatLngBounds::new(LatLng::new(10.0, 10.0), LatLng::new(20.0, 20.0)),
            Instant::now(),
        );
        let submitted = session.submit_bounds();
        let form = session.form.read().unwrap();
        assert_eq!(form, submitted.bounds().center());
        assert!((form.lat - 15.0).abs() < 1e-9);
        assert!((form.lng - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_connected_sets_status_and_form() {
        let (mut session, now) = session(MarkerRetention::Release);
        session.on_connected(
            Connected {
                ws_id: "abc".to_string(),
                sw: LatLng::new(1.0, 1.0),
                ne: LatLng::new(3.0, 3.0),
            },
            now,
        );

        assert_eq!(session.ws_id(), Some("abc"));
        assert_eq!(session.connection(), &ConnectionState::Connected);
        assert_eq!(session.form.latitude(), "2");
        assert_eq!(session.form.longitude(), "2");
        assert_eq!(session.map.center(), LatLng::new(2.0, 2.0));

        // The fit itself moves the map, which leads to a fresh submission.
        let submitted = session.poll_idle(now + DELAY).unwrap();
        assert_eq!(submitted.bounds().center(), LatLng::new(2.0, 2.0));
    }

    #[test]
    fn test_six_tweets_keep_five_newest_and_six_markers() {
        let (mut session, _) = session(MarkerRetention::Retain);
        session.submit_bounds();
        for i in 1..=6 {
            session.on_new_tweet(tweet(&format!("t{}", i), 40.5, -73.5));
        }

        assert_eq!(feed_texts(&session), vec!["t6", "t5", "t4", "t3", "t2"]);
        assert_eq!(session.markers.len(), 6);
        assert_eq!(session.markers.attached_count(), 6);
    }

    #[test]
    fn test_feed_counts_tweets_since_last_viewport_change() {
        let (mut session, _) = session(MarkerRetention::Release);
        for i in 0..4 {
            session.on_new_tweet(tweet(&format!("old{}", i), 40.5, -73.5));
        }
        session.submit_bounds();
        assert!(session.feed.is_empty());
        assert_eq!(session.feed.count(), 0);

        for n in 1..=12 {
            session.on_new_tweet(tweet(&format!("new{}", n), 40.5, -73.5));
            assert_eq!(session.feed.len(), n.min(5));
            assert!(session.feed.len() <= 5);
        }
    }

    #[test]
    fn test_submission_detaches_markers_retained() {
        let (mut session, _) = session(MarkerRetention::Retain);
        let mut previous_len = 0;
        for round in 0..3 {
            for i in 0..=round {
                session.on_new_tweet(tweet(&format!("r{}-{}", round, i), 40.5, -73.5));
            }
            session.submit_bounds();
            assert_eq!(session.markers.attached_count(), 0);
            assert!(session.markers.len() >= previous_len);
            previous_len = session.markers.len();
        }
        assert_eq!(session.markers.len(), 6);
    }

    #[test]
    fn test_submission_releases_markers() {
        let (mut session, _) = session(MarkerRetention::Release);
        session.on_new_tweet(tweet("a", 40.5, -73.5));
        session.on_new_tweet(tweet("b", 40.6, -73.4));
        session.submit_bounds();
        assert!(session.markers.is_empty());
    }

    #[test]
    fn test_form_submit_recenters_then_idle_submits() {
        let (mut session, now) = session(MarkerRetention::Release);
        session.poll_idle(now + DELAY);

        session.form.clear_active();
        for c in "40.0".chars() {
            session.form.add_char(c);
        }
        session.form.next_field();
        session.form.clear_active();
        for c in "-73.0".chars() {
            session.form.add_char(c);
        }

        let later = now + DELAY * 2;
        session.submit_form(later).unwrap();
        assert!(session.poll_idle(later).is_none());

        let submitted = session.poll_idle(later + DELAY).unwrap();
        let center = submitted.bounds().center();
        assert!((center.lat - 40.0).abs() < 1e-6);
        assert!((center.lng + 73.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_form_leaves_map_alone() {
        let (mut session, now) = session(MarkerRetention::Release);
        session.poll_idle(now + DELAY);
        let before = session.map.center();

        session.form.clear_active();
        let result = session.submit_form(now + DELAY * 2);
        assert_eq!(result, Err(FormError::Empty { field: "latitude" }));
        assert_eq!(session.map.center(), before);
        assert!(session.poll_idle(now + DELAY * 10).is_none());
    }

    #[test]
    fn test_server_event_dispatch() {
        let (mut session, now) = session(MarkerRetention::Release);
        session.handle_server_event(ServerEvent::NewTweet(tweet("x", 1.0, 2.0)), now);
        assert_eq!(session.markers.len(), 1);

        session.handle_server_event(ServerEvent::Disconnected, now);
        assert_eq!(session.connection(), &ConnectionState::Disconnected);

        session.handle_server_event(ServerEvent::Error("boom".to_string()), now);
        assert_eq!(
            session.connection(),
            &ConnectionState::Failed("boom".to_string())
        );
    }
}

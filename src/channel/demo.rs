//! Offline stand-in for the tweet server.
//!
//! Mirrors the server's fake stream: a random session id is announced on
//! start, and every bounds submission restarts a generator that emits a tweet
//! at a random point inside the submitted rectangle every few seconds.

use super::protocol::{Connected, NewTweet, SubmitBounds};
use super::{EventChannel, ServerEvent, ServerEventSender};
use crate::geo::LatLngBounds;
use anyhow::Result;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DemoSettings {
    pub interval: Duration,
    pub jitter_secs: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            jitter_secs: 3,
        }
    }
}

pub struct DemoChannel {
    session_id: String,
    settings: DemoSettings,
    events: ServerEventSender,
    generator: Mutex<Option<JoinHandle<()>>>,
}

impl DemoChannel {
    /// Announces a new session for `initial` and starts streaming inside it.
    /// Must be called from within a tokio runtime.
    pub fn start(initial: LatLngBounds, settings: DemoSettings, events: ServerEventSender) -> Self {
        let session_id = random_session_id(&mut StdRng::from_entropy());
        info!(%session_id, "starting demo channel");

        let _ = events.send(ServerEvent::Connected(Connected {
            ws_id: session_id.clone(),
            sw: initial.sw,
            ne: initial.ne,
        }));

        let channel = Self {
            session_id,
            settings,
            events,
            generator: Mutex::new(None),
        };
        channel.restart(initial);
        channel
    }

    fn restart(&self, bounds: LatLngBounds) {
        let task = tokio::spawn(generate(bounds, self.settings.clone(), self.events.clone()));
        let mut generator = self.generator.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = generator.replace(task) {
            previous.abort();
        }
    }

    fn stop(&self) {
        let mut generator = self.generator.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = generator.take() {
            task.abort();
        }
    }
}

impl Drop for DemoChannel {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn generate(bounds: LatLngBounds, settings: DemoSettings, events: ServerEventSender) {
    let mut rng = StdRng::from_entropy();
    debug!(?bounds, "demo stream started");
    loop {
        let tweet = random_tweet(&mut rng, &bounds, chrono::Utc::now().timestamp());
        if events.send(ServerEvent::NewTweet(tweet)).is_err() {
            break;
        }
        let jitter = Duration::from_secs(rng.gen_range(0..=settings.jitter_secs));
        tokio::time::sleep(settings.interval + jitter).await;
    }
}

fn random_tweet(rng: &mut impl Rng, bounds: &LatLngBounds, unix_secs: i64) -> NewTweet {
    NewTweet {
        tweet: format!("Tweet {}: {}", rng.gen_range(1..=100), unix_secs),
        lat: rng.gen_range(bounds.sw.lat..=bounds.ne.lat),
        lng: rng.gen_range(bounds.sw.lng..=bounds.ne.lng),
    }
}

fn random_session_id(rng: &mut impl Rng) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}

#[async_trait]
impl EventChannel for DemoChannel {
    async fn submit_bounds(&self, payload: &SubmitBounds) -> Result<()> {
        let bounds = payload.bounds();
        if !bounds.is_valid() {
            anyhow::bail!("Refusing to stream inside invalid bounds {:?}", bounds);
        }
        self.restart(bounds);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.stop();
        let _ = self.events.send(ServerEvent::Disconnected);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("demo ({})", self.session_id)
    }
}

pub mod demo;
pub mod protocol;
pub mod socketio;

use crate::config::{Config, ServerMode};
use anyhow::{Context, Result};
use async_trait::async_trait;
use demo::DemoChannel;
use protocol::{Connected, NewTweet, SubmitBounds};
use socketio::SocketIoChannel;
use tokio::sync::mpsc;

/// Everything the server side can tell the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected(Connected),
    NewTweet(NewTweet),
    Disconnected,
    Error(String),
}

pub type ServerEventSender = mpsc::UnboundedSender<ServerEvent>;
pub type ServerEventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

pub fn server_events() -> (ServerEventSender, ServerEventReceiver) {
    mpsc::unbounded_channel()
}

/// The outbound half of the connection. Inbound traffic arrives as
/// [`ServerEvent`]s on the receiver handed out when the channel was opened.
#[async_trait]
pub trait EventChannel: Send + Sync {
    async fn submit_bounds(&self, payload: &SubmitBounds) -> Result<()>;

    async fn close(&self) -> Result<()>;

    /// Short description for the status panel.
    fn describe(&self) -> String;
}

/// Opens the channel selected by `[server] mode`.
pub async fn open(config: &Config, events: ServerEventSender) -> Result<Box<dyn EventChannel>> {
    match config.server.mode {
        ServerMode::Demo => Ok(Box::new(DemoChannel::start(
            config.initial_bounds(),
            config.demo_settings(),
            events,
        ))),
        ServerMode::Socketio => {
            let channel =
                SocketIoChannel::connect(&config.server.url, &config.server.namespace, events)
                    .await
                    .context("Is the server running? Use --demo to run without one")?;
            Ok(Box::new(channel))
        }
    }
}

use super::protocol::{self, Connected, NewTweet, ProtocolError, SubmitBounds};
use super::{EventChannel, ServerEvent, ServerEventSender};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::FutureExt;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::Payload;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Socket.IO connection to the tweet server.
pub struct SocketIoChannel {
    client: Client,
    url: String,
}

impl SocketIoChannel {
    /// Connects and wires the server's events into `events`.
    pub async fn connect(url: &str, namespace: &str, events: ServerEventSender) -> Result<Self> {
        let on_connected = events.clone();
        let on_tweet = events.clone();
        let on_close = events.clone();
        let on_error = events;

        let mut builder = ClientBuilder::new(url);
        if !namespace.is_empty() {
            builder = builder.namespace(namespace);
        }

        let client = builder
            .on(protocol::CONNECTED, move |payload, _client| {
                let tx = on_connected.clone();
                async move {
                    forward::<Connected>(&tx, protocol::CONNECTED, payload, ServerEvent::Connected)
                }
                .boxed()
            })
            .on(protocol::NEW_TWEET, move |payload, _client| {
                let tx = on_tweet.clone();
                async move { forward::<NewTweet>(&tx, protocol::NEW_TWEET, payload, ServerEvent::NewTweet) }
                    .boxed()
            })
            .on("close", move |_payload, _client| {
                let tx = on_close.clone();
                async move {
                    info!("socket closed by server");
                    let _ = tx.send(ServerEvent::Disconnected);
                }
                .boxed()
            })
            .on("error", move |payload, _client| {
                let tx = on_error.clone();
                async move {
                    let message = describe_payload(&payload);
                    warn!(%message, "socket error");
                    let _ = tx.send(ServerEvent::Error(message));
                }
                .boxed()
            })
            .connect()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        info!(url, namespace, "socket connected");

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

fn forward<T: DeserializeOwned>(
    tx: &ServerEventSender,
    event: &'static str,
    payload: Payload,
    wrap: fn(T) -> ServerEvent,
) {
    match decode_payload::<T>(event, payload) {
        Ok(record) => {
            let _ = tx.send(wrap(record));
        }
        Err(e) => warn!(error = %e, "dropping server event"),
    }
}

fn decode_payload<T: DeserializeOwned>(event: &'static str, payload: Payload) -> Result<T, ProtocolError> {
    match payload {
        Payload::Text(args) => protocol::decode(event, &args),
        _ => Err(ProtocolError::UnsupportedPayload { event }),
    }
}

fn describe_payload(payload: &Payload) -> String {
    match payload {
        Payload::Text(args) => args
            .iter()
            .map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => "unknown error".to_string(),
    }
}

#[async_trait]
impl EventChannel for SocketIoChannel {
    async fn submit_bounds(&self, payload: &SubmitBounds) -> Result<()> {
        let value = serde_json::to_value(payload)?;
        debug!(%value, "emitting {}", protocol::SUBMIT_BOUNDS);
        self.client
            .emit(protocol::SUBMIT_BOUNDS, value)
            .await
            .context("Failed to emit submit_bounds")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .context("Failed to disconnect socket")?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

//! Event names and payload records exchanged with the tweet server.

use crate::geo::{LatLng, LatLngBounds};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const SUBMIT_BOUNDS: &str = "submit_bounds";
pub const CONNECTED: &str = "connected";
pub const NEW_TWEET: &str = "new_tweet";

/// Outbound: the viewport the client is now looking at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubmitBounds {
    pub ne: LatLng,
    pub sw: LatLng,
}

impl SubmitBounds {
    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.sw, self.ne)
    }
}

impl From<LatLngBounds> for SubmitBounds {
    fn from(bounds: LatLngBounds) -> Self {
        Self {
            ne: bounds.ne,
            sw: bounds.sw,
        }
    }
}

/// Inbound, once per connection: the session id and the area to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connected {
    pub ws_id: String,
    pub sw: LatLng,
    pub ne: LatLng,
}

impl Connected {
    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.sw, self.ne)
    }
}

/// Inbound: one geotagged tweet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTweet {
    pub tweet: String,
    pub lat: f64,
    pub lng: f64,
}

impl NewTweet {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("{event} arrived without a payload")]
    EmptyPayload { event: &'static str },

    #[error("{event} arrived with a non-JSON payload")]
    UnsupportedPayload { event: &'static str },

    #[error("malformed {event} payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes the first argument of an event into its typed record.
pub fn decode<T: DeserializeOwned>(event: &'static str, args: &[Value]) -> Result<T, ProtocolError> {
    let first = args.first().ok_or(ProtocolError::EmptyPayload { event })?;
    serde_json::from_value(first.clone()).map_err(|source| ProtocolError::Malformed { event, source })
}

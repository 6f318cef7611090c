//! State-change events pushed to browser clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every event name a client may receive. The string form is the SSE
/// `event:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerEventKind {
    ImageList,
    ImageOrder,
    SlideshowState,
    SlideshowSettings,
    DeviceName,
    SelectedImages,
}

impl ServerEventKind {
    pub const ALL: [ServerEventKind; 6] = [
        ServerEventKind::ImageList,
        ServerEventKind::ImageOrder,
        ServerEventKind::SlideshowState,
        ServerEventKind::SlideshowSettings,
        ServerEventKind::DeviceName,
        ServerEventKind::SelectedImages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServerEventKind::ImageList => "image_list",
            ServerEventKind::ImageOrder => "image_order",
            ServerEventKind::SlideshowState => "slideshow_state",
            ServerEventKind::SlideshowSettings => "slideshow_settings",
            ServerEventKind::DeviceName => "device_name",
            ServerEventKind::SelectedImages => "selected_images",
        }
    }
}

impl fmt::Display for ServerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named event with a JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEvent {
    pub kind: ServerEventKind,
    pub payload: serde_json::Value,
    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ServerEvent {
    pub fn new(kind: ServerEventKind, payload: serde_json::Value) -> Self {
        Self {
            kind,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Build an event from any serializable payload.
    pub fn from_payload<T: Serialize>(
        kind: ServerEventKind,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(kind, serde_json::to_value(payload)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_serde() {
        for kind in ServerEventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn from_payload_serializes() {
        let event =
            ServerEvent::from_payload(ServerEventKind::SlideshowState, &serde_json::json!({"active": true}))
                .unwrap();
        assert_eq!(event.kind, ServerEventKind::SlideshowState);
        assert_eq!(event.payload["active"], true);
    }
}

//! Server-Sent Events: live state synchronisation with browser clients.
//!
//! Each connected client gets a snapshot of every event kind on connect and
//! then every event published on the [`EventBus`](slidekiosk_events::EventBus),
//! with a `ping` event whenever the stream has been idle for the keepalive
//! interval.

pub mod handler;
pub mod snapshot;

pub use snapshot::{publish, snapshot};

//! Slidekiosk event bus.
//!
//! - [`EventBus`]: in-process fan-out of [`ServerEvent`]s to per-subscriber
//!   FIFO queues. Subscribers whose queue cannot take an event are pruned
//!   on the spot.
//! - [`ServerEvent`] / [`ServerEventKind`]: the named state-change events
//!   streamed to browsers over Server-Sent Events.

pub mod bus;
pub mod event;

pub use bus::{EventBus, Subscription};
pub use event::{ServerEvent, ServerEventKind};

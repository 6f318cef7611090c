//! Slidekiosk domain types and pure rules.
//!
//! Nothing in this crate touches the filesystem or the network; the store,
//! API and renderer crates all build on these definitions.

pub mod error;
pub mod naming;
pub mod ordering;
pub mod settings;
pub mod transition;
pub mod types;

pub use error::CoreError;
pub use settings::SlideshowSettings;
pub use transition::Transition;

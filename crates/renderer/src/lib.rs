//! Slidekiosk slideshow renderer.
//!
//! Decodes the images once, fits them to the display, and cycles through
//! them with time-driven transitions:
//!
//! - [`cli`]: positional command line handed over by the control server.
//! - [`loader`]: decoding and aspect-preserving fit onto a black canvas.
//! - [`effects`]: pure per-frame compositing functions.
//! - [`compositor`]: picks the effect for a transition, owns the rotation cache.
//! - [`playback`]: the `Loading → SteadyDisplay ⇄ Transitioning → Terminated` machine.
//! - [`app`]: the full-screen eframe window that drives it all.

pub mod app;
pub mod cache;
pub mod cli;
pub mod compositor;
pub mod effects;
pub mod error;
pub mod loader;
pub mod playback;

pub use error::RenderError;

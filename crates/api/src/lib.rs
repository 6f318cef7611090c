//! Slidekiosk control server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! SSE, renderer supervision) so integration tests and the binary
//! entrypoint can both access them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod sse;
pub mod state;
pub mod supervisor;

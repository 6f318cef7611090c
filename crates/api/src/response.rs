//! Shared response bodies for API handlers.

use serde::Serialize;

/// `{ "status": "success" }` acknowledgement returned by mutating endpoints
/// that have nothing else to report.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

/// `{ "status": "success", "name": ... }` returned after a device rename.
#[derive(Debug, Serialize)]
pub struct DeviceNameResponse {
    pub status: &'static str,
    pub name: String,
}

//! Periodic reconciliation of the persisted slideshow flag.
//!
//! The renderer may exit on its own (Escape pressed, nothing decodable).
//! This loop notices and flips `slideshow_state.json` back to inactive,
//! broadcasting the change to connected clients.

use std::time::Duration;

use slidekiosk_events::ServerEventKind;
use tokio_util::sync::CancellationToken;

use crate::sse;
use crate::state::AppState;

/// Run the state monitor loop until `cancel` is triggered.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let period = Duration::from_secs(state.config.state_poll_secs.max(1));
    tracing::info!(interval_secs = period.as_secs(), "Slideshow state monitor started");

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Slideshow state monitor stopping");
                break;
            }
            _ = interval.tick() => {
                match sse::snapshot::reconciled_active(&state).await {
                    Ok((_, true)) => {
                        sse::publish(&state, &[ServerEventKind::SlideshowState]).await;
                    }
                    Ok((_, false)) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Slideshow state monitor: reconcile failed");
                    }
                }
            }
        }
    }
}

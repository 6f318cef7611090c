use std::convert::Infallible;
use std::time::Duration;

use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use slidekiosk_events::ServerEvent;

use crate::sse::snapshot;
use crate::state::AppState;

/// Name of the heartbeat event sent on an idle stream.
pub const PING_EVENT: &str = "ping";

fn to_sse(event: &ServerEvent) -> Event {
    Event::default()
        .event(event.kind.as_str())
        .data(event.payload.to_string())
}

/// GET /events
///
/// Streams a snapshot of every event kind, then live events. The
/// subscription is taken before the snapshot is read so nothing published
/// in between is missed. Dropping the stream (client gone) drops the
/// subscription, which unsubscribes it.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.event_bus.subscribe();
    let subscriber = subscription.id();
    let initial = snapshot::snapshot(&state).await;
    let keepalive = Duration::from_secs(state.config.sse_keepalive_secs.max(1));

    tracing::info!(
        subscriber,
        subscribers = state.event_bus.subscriber_count(),
        "SSE client connected"
    );

    let event_stream = stream! {
        for event in &initial {
            yield Ok(to_sse(event));
        }
        loop {
            match tokio::time::timeout(keepalive, subscription.recv()).await {
                Ok(Some(event)) => yield Ok(to_sse(&event)),
                Ok(None) => {
                    tracing::debug!(subscriber, "Event bus closed the stream");
                    break;
                }
                Err(_) => yield Ok(Event::default().event(PING_EVENT).data("{}")),
            }
        }
    };

    Sse::new(event_stream)
}

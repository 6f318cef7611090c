use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidekiosk_api::config::ServerConfig;
use slidekiosk_api::router::build_app_router;
use slidekiosk_api::state::AppState;
use slidekiosk_api::{background, sse};
use slidekiosk_events::ServerEventKind;
use slidekiosk_store::repositories::SlideshowStateRepo;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        eprintln!("slidekiosk-api: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slidekiosk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let state = AppState::new(config.clone());
    state.images.ensure_dir().await?;
    state.data.ensure_dir().await?;
    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        data_dir = %config.data_dir.display(),
        "Storage ready"
    );

    // No renderer survives a restart of the server.
    SlideshowStateRepo::save(&state.data, false).await?;

    // --- Background tasks ---
    let monitor_cancel = tokio_util::sync::CancellationToken::new();
    let monitor_handle = tokio::spawn(background::state_monitor::run(
        state.clone(),
        monitor_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state.clone(), &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    monitor_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), monitor_handle).await;
    tracing::info!("State monitor stopped");

    if state.supervisor.stop().await {
        tracing::info!("Renderer stopped");
    }
    SlideshowStateRepo::save(&state.data, false).await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Once a signal
/// arrives every SSE stream is closed so open connections can drain.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    // Tell clients the slideshow is going away before their streams end.
    if state.supervisor.stop().await {
        if let Err(e) = SlideshowStateRepo::save(&state.data, false).await {
            tracing::error!(error = %e, "Failed to persist stopped state");
        }
        sse::publish(&state, &[ServerEventKind::SlideshowState]).await;
    }
    state.event_bus.close_all();
}

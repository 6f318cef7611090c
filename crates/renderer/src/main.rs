use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidekiosk_renderer::app::SlideshowApp;
use slidekiosk_renderer::cli::Args;
use slidekiosk_renderer::loader;

fn main() -> anyhow::Result<()> {
    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slidekiosk_renderer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Arguments ---
    let args = Args::parse();
    let settings = args.settings().context("invalid slideshow settings")?;
    let paths = args.image_paths();
    if paths.is_empty() {
        anyhow::bail!("no image paths given");
    }
    tracing::info!(
        images = paths.len(),
        delay = settings.delay,
        transition = %settings.transition,
        transition_duration = settings.transition_duration,
        "Starting renderer"
    );

    // --- Decode ---
    let decoded = loader::decode_all(&paths);
    if decoded.is_empty() {
        tracing::error!("None of the images could be decoded; nothing to show");
        return Ok(());
    }

    // --- Window ---
    let mut viewport = egui::ViewportBuilder::default()
        .with_title("slidekiosk")
        .with_fullscreen(!args.windowed)
        .with_decorations(args.windowed);
    if let Some((w, h)) = args.canvas_size() {
        viewport = viewport.with_inner_size([w as f32, h as f32]);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let canvas = args.canvas_size();
    eframe::run_native(
        "slidekiosk",
        options,
        Box::new(move |_cc| Ok(Box::new(SlideshowApp::new(decoded, settings, canvas)))),
    )
    .map_err(|e| anyhow::anyhow!("renderer window failed: {e}"))?;

    tracing::info!("Renderer exited");
    Ok(())
}

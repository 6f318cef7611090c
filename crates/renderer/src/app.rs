//! Full-screen slideshow window.

use std::time::{Duration, Instant};

use egui::{Color32, ColorImage, Key, Pos2, Rect, TextureHandle, TextureOptions};
use image::RgbaImage;
use slidekiosk_core::{SlideshowSettings, Transition};

use crate::compositor::Compositor;
use crate::loader::{self, DecodedImage};
use crate::playback::{Playback, Presentation};

/// Upper bound on repaint rate.
pub const TARGET_FPS: u64 = 60;

const FRAME_INTERVAL: Duration = Duration::from_millis(1000 / TARGET_FPS);

pub struct SlideshowApp {
    decoded: Vec<DecodedImage>,
    forced_canvas: Option<(u32, u32)>,
    transition: Transition,
    frames: Vec<RgbaImage>,
    playback: Playback,
    compositor: Compositor,
    texture: Option<TextureHandle>,
    shown: Option<Presentation>,
    last_tick: Option<Instant>,
}

impl SlideshowApp {
    pub fn new(
        decoded: Vec<DecodedImage>,
        settings: SlideshowSettings,
        forced_canvas: Option<(u32, u32)>,
    ) -> Self {
        Self {
            decoded,
            forced_canvas,
            transition: settings.transition,
            frames: Vec::new(),
            playback: Playback::new(&settings, Instant::now()),
            compositor: Compositor::default(),
            texture: None,
            shown: None,
            last_tick: None,
        }
    }

    /// Canvas in physical pixels: the forced size, else the monitor, else
    /// the current viewport.
    fn canvas_size(&self, ctx: &egui::Context) -> (u32, u32) {
        if let Some(size) = self.forced_canvas {
            return size;
        }
        let ppp = ctx.pixels_per_point();
        let points = ctx
            .input(|i| i.viewport().monitor_size)
            .unwrap_or_else(|| ctx.input(|i| i.viewport_rect()).size());
        let px = |v: f32| ((v * ppp).round() as u32).max(1);
        (px(points.x), px(points.y))
    }

    /// Fit the decoded images to the display and start playback.
    fn load(&mut self, ctx: &egui::Context) {
        let canvas = self.canvas_size(ctx);
        tracing::info!(
            width = canvas.0,
            height = canvas.1,
            images = self.decoded.len(),
            "Preparing slides"
        );
        self.frames = loader::fit_all(&self.decoded, canvas);
        // Originals are no longer needed once fitted.
        self.decoded = Vec::new();

        if self.frames.is_empty() {
            tracing::error!("No slide could be prepared for the display");
        }
        self.playback.start(self.frames.len(), Instant::now());
    }

    fn quit_requested(ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            i.key_pressed(Key::Escape) || i.key_pressed(Key::Q) || i.viewport().close_requested()
        })
    }

    fn upload(&mut self, ctx: &egui::Context, frame: &RgbaImage) {
        let size = [frame.width() as usize, frame.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("slide", image, TextureOptions::LINEAR));
            }
        }
    }

    /// Compose and upload the frame for `presentation` if it changed.
    fn present(&mut self, ctx: &egui::Context, presentation: Presentation) {
        if self.shown == Some(presentation) {
            return;
        }
        match presentation {
            Presentation::Blank => {}
            Presentation::Frame(index) => {
                let frame = self.frames[index].clone();
                self.upload(ctx, &frame);
            }
            Presentation::Blend { from, to, progress } => {
                let frame = self
                    .compositor
                    .compose(&self.frames, from, to, self.transition, progress);
                self.upload(ctx, &frame);
            }
        }
        self.shown = Some(presentation);
    }

    fn paint(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| {
                let Some(texture) = &self.texture else {
                    return;
                };
                if self.shown == Some(Presentation::Blank) {
                    return;
                }
                let area = ui.max_rect();
                let rect = letterbox(area, texture.size_vec2());
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
            });
    }
}

/// Time left before the next frame may be composed, or `None` when one is
/// due. Extra `update` calls (input events) inside the interval only repaint.
fn frame_wait(last_tick: Option<Instant>, now: Instant) -> Option<Duration> {
    let elapsed = now.saturating_duration_since(last_tick?);
    (elapsed < FRAME_INTERVAL).then(|| FRAME_INTERVAL - elapsed)
}

/// Largest rect with the texture's aspect ratio centred in `area`.
fn letterbox(area: Rect, texture: egui::Vec2) -> Rect {
    if texture.x <= 0.0 || texture.y <= 0.0 {
        return area;
    }
    let scale = (area.width() / texture.x).min(area.height() / texture.y);
    Rect::from_center_size(area.center(), texture * scale)
}

impl eframe::App for SlideshowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if Self::quit_requested(ctx) {
            tracing::info!("Quit requested");
            self.playback.terminate();
        }

        if self.frames.is_empty() && !self.playback.is_terminated() {
            self.load(ctx);
        }

        let now = Instant::now();
        if !self.playback.is_terminated() {
            if let Some(wait) = frame_wait(self.last_tick, now) {
                self.paint(ctx);
                ctx.request_repaint_after(wait);
                return;
            }
        }
        self.last_tick = Some(now);

        let presentation = self.playback.tick(now);
        if self.playback.is_terminated() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.present(ctx, presentation);
        self.paint(ctx);
        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}

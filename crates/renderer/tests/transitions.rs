use image::{Rgba, RgbaImage};
use slidekiosk_core::Transition;
use slidekiosk_renderer::cache::RotationCache;
use slidekiosk_renderer::compositor::Compositor;

fn gradient(w: u32, h: u32, seed: u8) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([
            seed.wrapping_add((x * 17) as u8),
            seed.wrapping_mul(3).wrapping_add((y * 29) as u8),
            ((x + y) * 11) as u8,
            255,
        ])
    })
}

fn max_channel_diff(a: &RgbaImage, b: &RgbaImage) -> u8 {
    assert_eq!(a.dimensions(), b.dimensions());
    a.as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

fn frames() -> Vec<RgbaImage> {
    vec![gradient(8, 6, 10), gradient(8, 6, 200)]
}

#[test]
fn progress_zero_shows_first_frame_for_every_transition() {
    let frames = frames();
    for transition in Transition::ALL {
        let mut compositor = Compositor::default();
        let out = compositor.compose(&frames, 0, 1, transition, 0.0);
        assert_eq!(out, frames[0], "{transition} at progress 0");
    }
}

#[test]
fn progress_near_one_shows_second_frame_for_every_transition() {
    let frames = frames();
    for transition in Transition::ALL {
        if transition.is_instant() {
            continue;
        }
        let mut compositor = Compositor::default();
        let out = compositor.compose(&frames, 0, 1, transition, 0.9999);
        let diff = max_channel_diff(&out, &frames[1]);
        assert!(diff <= 1, "{transition} near progress 1 differs by {diff}");
    }
}

#[test]
fn output_keeps_canvas_size_and_is_opaque() {
    let frames = frames();
    for transition in Transition::ALL {
        let mut compositor = Compositor::default();
        for step in 0..=10 {
            let out = compositor.compose(&frames, 1, 0, transition, step as f32 / 10.0);
            assert_eq!(out.dimensions(), (8, 6));
            assert!(out.pixels().all(|p| p.0[3] == 255), "{transition} produced alpha");
        }
    }
}

#[test]
fn rotate_reuses_cached_frames() {
    let frames = frames();
    let mut compositor = Compositor::new(RotationCache::new(64));
    compositor.compose(&frames, 0, 1, Transition::Rotate, 0.5);
    let after_first = compositor.rotation_cache().len();
    compositor.compose(&frames, 0, 1, Transition::Rotate, 0.5);
    assert_eq!(compositor.rotation_cache().len(), after_first);
    assert_eq!(after_first, 2);
}

#[test]
fn long_rotate_run_keeps_cache_bounded() {
    let frames = frames();
    let mut compositor = Compositor::new(RotationCache::new(8));
    for step in 0..500 {
        compositor.compose(&frames, step % 2, (step + 1) % 2, Transition::Rotate, (step % 100) as f32 / 100.0);
        assert!(compositor.rotation_cache().len() <= 8);
    }
}

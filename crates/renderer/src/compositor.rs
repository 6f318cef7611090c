//! Maps a transition and progress value onto an effect.

use std::sync::Arc;

use image::RgbaImage;
use slidekiosk_core::transition::SlideDirection;
use slidekiosk_core::Transition;

use crate::cache::RotationCache;
use crate::effects;

/// Produces the frame shown at a given point of a transition.
#[derive(Debug, Default)]
pub struct Compositor {
    rotations: RotationCache,
}

impl Compositor {
    pub fn new(rotations: RotationCache) -> Self {
        Self { rotations }
    }

    pub fn rotation_cache(&self) -> &RotationCache {
        &self.rotations
    }

    /// Composite `frames[from]` into `frames[to]` at `progress`.
    pub fn compose(
        &mut self,
        frames: &[RgbaImage],
        from: usize,
        to: usize,
        transition: Transition,
        progress: f32,
    ) -> RgbaImage {
        let a = &frames[from];
        let b = &frames[to];
        let p = progress.clamp(0.0, 1.0);

        match transition {
            Transition::None => {
                if p < 1.0 {
                    a.clone()
                } else {
                    b.clone()
                }
            }
            Transition::Fade => effects::fade(a, b, p),
            Transition::FadeBlack => effects::fade_black(a, b, p),
            Transition::ZoomIn => effects::zoom(a, b, p, effects::ZOOM_IN_END),
            Transition::ZoomOut => effects::zoom(a, b, p, effects::ZOOM_OUT_END),
            Transition::Rotate => {
                let (deg_a, deg_b) = effects::rotate_angles(p);
                let ra = self.rotated(frames, from, deg_a);
                let rb = self.rotated(frames, to, deg_b);
                effects::blend(&ra, &rb, p)
            }
            Transition::SlideLeft => effects::slide(a, b, p, SlideDirection::Left),
            Transition::SlideRight => effects::slide(a, b, p, SlideDirection::Right),
            Transition::SlideUp => effects::slide(a, b, p, SlideDirection::Up),
            Transition::SlideDown => effects::slide(a, b, p, SlideDirection::Down),
        }
    }

    fn rotated(&mut self, frames: &[RgbaImage], index: usize, degrees: f32) -> Arc<RgbaImage> {
        let key = RotationCache::key_degrees(degrees);
        let frame = &frames[index];
        if key == 0 {
            return Arc::new(frame.clone());
        }
        self.rotations
            .get_or_insert_with(index, key, || effects::transform(frame, 1.0, key as f32))
    }
}

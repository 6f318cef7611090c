//! Per-frame compositing primitives.
//!
//! Every function here is pure: it reads two same-sized opaque frames and a
//! progress value in `[0, 1]` and returns a new frame. Progress `0` yields
//! the first frame unchanged.

use image::{Rgba, RgbaImage};
use slidekiosk_core::transition::SlideDirection;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[inline]
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let (a, b) = (f32::from(a), f32::from(b));
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// Per-channel `a·(1−t) + b·t`.
pub fn blend(a: &RgbaImage, b: &RgbaImage, t: f32) -> RgbaImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let t = t.clamp(0.0, 1.0);
    let (w, h) = a.dimensions();
    let mut out = RgbaImage::new(w, h);

    for ((o, pa), pb) in out
        .chunks_exact_mut(4)
        .zip(a.as_raw().chunks_exact(4))
        .zip(b.as_raw().chunks_exact(4))
    {
        o[0] = lerp_u8(pa[0], pb[0], t);
        o[1] = lerp_u8(pa[1], pb[1], t);
        o[2] = lerp_u8(pa[2], pb[2], t);
        o[3] = 255;
    }
    out
}

/// Scale every colour channel by `k` (`0` = black, `1` = unchanged).
pub fn darken(img: &RgbaImage, k: f32) -> RgbaImage {
    let k = k.clamp(0.0, 1.0);
    let mut out = img.clone();
    for px in out.chunks_exact_mut(4) {
        px[0] = lerp_u8(0, px[0], k);
        px[1] = lerp_u8(0, px[1], k);
        px[2] = lerp_u8(0, px[2], k);
        px[3] = 255;
    }
    out
}

/// Cross-fade.
pub fn fade(a: &RgbaImage, b: &RgbaImage, progress: f32) -> RgbaImage {
    blend(a, b, progress)
}

/// A fades to black over the first half, B fades in over the second.
pub fn fade_black(a: &RgbaImage, b: &RgbaImage, progress: f32) -> RgbaImage {
    if progress < 0.5 {
        darken(a, 1.0 - 2.0 * progress)
    } else {
        darken(b, 2.0 * progress - 1.0)
    }
}

/// Copy `src` into `dst` with its origin at `(dx, dy)`, clipping to `dst`.
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, dx: i64, dy: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = (-dx).max(0);
    let x1 = sw.min(dw - dx);
    if x0 >= x1 {
        return;
    }
    let row_bytes = ((x1 - x0) * 4) as usize;

    let src_raw = src.as_raw();
    let dst_stride = (dw * 4) as usize;
    let src_stride = (sw * 4) as usize;
    let dst_raw: &mut [u8] = dst;

    for sy in 0..sh {
        let ty = sy + dy;
        if ty < 0 || ty >= dh {
            continue;
        }
        let s = sy as usize * src_stride + (x0 * 4) as usize;
        let d = ty as usize * dst_stride + ((x0 + dx) * 4) as usize;
        dst_raw[d..d + row_bytes].copy_from_slice(&src_raw[s..s + row_bytes]);
    }
}

/// Push A out and B in along `direction`; the offset is `progress` times
/// the frame dimension on that axis, rounded to the nearest pixel.
pub fn slide(a: &RgbaImage, b: &RgbaImage, progress: f32, direction: SlideDirection) -> RgbaImage {
    let (w, h) = a.dimensions();
    let (w, h) = (i64::from(w), i64::from(h));
    let p = progress.clamp(0.0, 1.0);
    let mut out = RgbaImage::from_pixel(w as u32, h as u32, BLACK);

    let along = |dim: i64| ((dim as f32 * p).round() as i64).clamp(0, dim);

    match direction {
        SlideDirection::Left => {
            let off = along(w);
            blit(&mut out, a, -off, 0);
            blit(&mut out, b, w - off, 0);
        }
        SlideDirection::Right => {
            let off = along(w);
            blit(&mut out, a, off, 0);
            blit(&mut out, b, off - w, 0);
        }
        SlideDirection::Up => {
            let off = along(h);
            blit(&mut out, a, 0, -off);
            blit(&mut out, b, 0, h - off);
        }
        SlideDirection::Down => {
            let off = along(h);
            blit(&mut out, a, 0, off);
            blit(&mut out, b, 0, off - h);
        }
    }
    out
}

/// Scale and rotate `src` about its centre, keeping the frame size.
///
/// Nearest-neighbour inverse mapping; pixels that map outside the source
/// are black. `scale == 1` with `degrees == 0` returns an exact copy.
pub fn transform(src: &RgbaImage, scale: f32, degrees: f32) -> RgbaImage {
    if scale == 1.0 && degrees == 0.0 {
        return src.clone();
    }
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::from_pixel(w, h, BLACK);
    if scale <= 0.0 {
        return out;
    }

    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let inv = 1.0 / scale;
    let src_raw = src.as_raw();
    let stride = w as usize * 4;

    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let sx = (dx * cos + dy * sin) * inv + cx;
        let sy = (-dx * sin + dy * cos) * inv + cy;
        if sx < 0.0 || sy < 0.0 {
            continue;
        }
        let (ix, iy) = (sx as u32, sy as u32);
        if ix >= w || iy >= h {
            continue;
        }
        let i = iy as usize * stride + ix as usize * 4;
        px.0 = [src_raw[i], src_raw[i + 1], src_raw[i + 2], 255];
    }
    out
}

/// Zoom start and end scales for A.
pub const ZOOM_IN_END: f32 = 1.3;
pub const ZOOM_OUT_END: f32 = 0.7;

/// A scales from 100% toward `end_scale` while B fades in.
pub fn zoom(a: &RgbaImage, b: &RgbaImage, progress: f32, end_scale: f32) -> RgbaImage {
    let p = progress.clamp(0.0, 1.0);
    let scale = 1.0 + (end_scale - 1.0) * p;
    let scaled = transform(a, scale, 0.0);
    blend(&scaled, b, p)
}

/// Rotation angles in degrees for (A, B) at `progress`.
pub fn rotate_angles(progress: f32) -> (f32, f32) {
    let p = progress.clamp(0.0, 1.0);
    (180.0 * p, 180.0 * (1.0 - p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, c: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([c[0], c[1], c[2], 255]))
    }

    #[test]
    fn blend_midpoint_rounds() {
        let out = blend(&solid(2, 2, [0, 100, 255]), &solid(2, 2, [255, 0, 0]), 0.5);
        assert_eq!(out.get_pixel(0, 0).0, [128, 50, 128, 255]);
    }

    #[test]
    fn fade_black_is_black_at_half() {
        let out = fade_black(&solid(2, 2, [200, 200, 200]), &solid(2, 2, [10, 10, 10]), 0.5);
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn fade_black_first_half_only_shows_a() {
        let out = fade_black(&solid(2, 2, [200, 0, 0]), &solid(2, 2, [0, 200, 0]), 0.25);
        assert_eq!(out.get_pixel(0, 0).0, [100, 0, 0, 255]);
    }

    #[test]
    fn slide_left_halfway_splits_frame() {
        let a = solid(10, 2, [255, 0, 0]);
        let b = solid(10, 2, [0, 0, 255]);
        let out = slide(&a, &b, 0.5, SlideDirection::Left);
        assert_eq!(out.get_pixel(4, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(5, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn slide_down_halfway_puts_b_on_top() {
        let a = solid(2, 10, [255, 0, 0]);
        let b = solid(2, 10, [0, 0, 255]);
        let out = slide(&a, &b, 0.5, SlideDirection::Down);
        assert_eq!(out.get_pixel(0, 4).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(0, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn blit_clips_negative_offsets() {
        let mut dst = solid(4, 4, [0, 0, 0]);
        let src = solid(4, 4, [9, 9, 9]);
        blit(&mut dst, &src, -3, 3);
        assert_eq!(dst.get_pixel(0, 3).0, [9, 9, 9, 255]);
        assert_eq!(dst.get_pixel(1, 3).0, [0, 0, 0, 255]);
        assert_eq!(dst.get_pixel(0, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn blit_fully_outside_is_noop() {
        let mut dst = solid(4, 4, [0, 0, 0]);
        blit(&mut dst, &solid(4, 4, [9, 9, 9]), 4, 0);
        assert!(dst.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn transform_180_flips_both_axes() {
        let mut src = solid(4, 2, [0, 0, 0]);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let out = transform(&src, 1.0, 180.0);
        assert_eq!(out.get_pixel(3, 1).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn shrinking_leaves_black_border() {
        let out = transform(&solid(10, 10, [50, 50, 50]), 0.5, 0.0);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(5, 5).0, [50, 50, 50, 255]);
    }

    #[test]
    fn rotate_angles_meet_in_the_middle() {
        assert_eq!(rotate_angles(0.0), (0.0, 180.0));
        assert_eq!(rotate_angles(0.5), (90.0, 90.0));
        assert_eq!(rotate_angles(1.0), (180.0, 0.0));
    }
}

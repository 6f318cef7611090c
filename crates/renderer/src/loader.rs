//! Image decoding and display fitting.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::error::RenderError;

/// An image decoded from disk, not yet fitted to a display.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub image: DynamicImage,
}

/// Decode one image.
pub fn decode(path: &Path) -> Result<DecodedImage, RenderError> {
    let image = image::open(path).map_err(|source| RenderError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(RenderError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), width = w, height = h, "Decoded image");
    Ok(DecodedImage {
        path: path.to_path_buf(),
        image,
    })
}

/// Decode every path, logging and skipping the ones that fail.
pub fn decode_all(paths: &[PathBuf]) -> Vec<DecodedImage> {
    paths
        .iter()
        .filter_map(|path| match decode(path) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping image");
                None
            }
        })
        .collect()
}

/// Largest size with the image's aspect ratio that fits in the canvas.
pub fn fitted_size(image: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    let (iw, ih) = (image.0 as f64, image.1 as f64);
    let (cw, ch) = (canvas.0 as f64, canvas.1 as f64);
    let aspect = iw / ih;

    let (w, h) = if cw / ch > aspect {
        (ch * aspect, ch)
    } else {
        (cw, cw / aspect)
    };
    ((w as u32).clamp(1, canvas.0), (h as u32).clamp(1, canvas.1))
}

/// Scale `decoded` to fit `canvas` and centre it on an opaque black frame.
pub fn fit_to_canvas(decoded: &DecodedImage, canvas: (u32, u32)) -> Result<RgbaImage, RenderError> {
    let (cw, ch) = canvas;
    if cw == 0 || ch == 0 {
        return Err(RenderError::InvalidCanvas {
            width: cw,
            height: ch,
        });
    }
    let (iw, ih) = decoded.image.dimensions();
    if iw == 0 || ih == 0 {
        return Err(RenderError::EmptyImage {
            path: decoded.path.clone(),
        });
    }

    let (w, h) = fitted_size((iw, ih), canvas);
    let scaled = if (w, h) == (iw, ih) {
        decoded.image.to_rgba8()
    } else {
        decoded.image.resize_exact(w, h, FilterType::Triangle).to_rgba8()
    };

    let mut frame = RgbaImage::from_pixel(cw, ch, Rgba([0, 0, 0, 255]));
    paste_over_black(&mut frame, &scaled, (cw - w) / 2, (ch - h) / 2);

    tracing::debug!(
        path = %decoded.path.display(),
        original = %format!("{iw}x{ih}"),
        scaled = %format!("{w}x{h}"),
        "Fitted image to canvas"
    );
    Ok(frame)
}

/// Fit every decoded image, skipping the ones that cannot be scaled.
pub fn fit_all(decoded: &[DecodedImage], canvas: (u32, u32)) -> Vec<RgbaImage> {
    decoded
        .iter()
        .filter_map(|d| match fit_to_canvas(d, canvas) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping image");
                None
            }
        })
        .collect()
}

/// Composite `src` over the black `frame` at `(x, y)`. The result is fully
/// opaque so later blends never see translucency.
fn paste_over_black(frame: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, px) in src.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let out = if a == 255 {
            [r, g, b, 255]
        } else {
            let k = f32::from(a) / 255.0;
            [
                (f32::from(r) * k).round() as u8,
                (f32::from(g) * k).round() as u8,
                (f32::from(b) * k).round() as u8,
                255,
            ]
        };
        frame.put_pixel(x + sx, y + sy, Rgba(out));
    }
}

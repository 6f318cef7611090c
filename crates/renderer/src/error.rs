use std::path::PathBuf;

/// Errors raised while preparing slides.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has zero width or height")]
    EmptyImage { path: PathBuf },

    #[error("canvas size {width}x{height} is not usable")]
    InvalidCanvas { width: u32, height: u32 },
}

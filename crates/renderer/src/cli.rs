//! Renderer command line.
//!
//! The control server invokes the renderer as
//! `slidekiosk-renderer IMAGES DELAY TRANSITION DURATION`, where `IMAGES` is
//! a comma-separated list of image paths.

use std::path::PathBuf;

use clap::Parser;
use slidekiosk_core::error::CoreError;
use slidekiosk_core::{SlideshowSettings, Transition};

#[derive(Parser, Debug, Clone)]
#[command(name = "slidekiosk-renderer", version, about = "Full-screen slideshow renderer")]
pub struct Args {
    /// Comma-separated image paths.
    pub images: String,

    /// Seconds each slide is shown.
    pub delay: f64,

    /// Transition name (none, fade, fade-black, slide-left, slide-right,
    /// slide-up, slide-down, zoom-in, zoom-out, rotate).
    #[arg(value_parser = parse_transition)]
    pub transition: Transition,

    /// Seconds a transition takes.
    pub transition_duration: f64,

    /// Force the canvas width in pixels instead of using the display size.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Force the canvas height in pixels instead of using the display size.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Run in a normal window instead of full screen.
    #[arg(long)]
    pub windowed: bool,
}

fn parse_transition(s: &str) -> Result<Transition, String> {
    s.parse::<Transition>().map_err(|e| e.to_string())
}

impl Args {
    /// Non-blank entries of the comma-separated image list, trimmed.
    pub fn image_paths(&self) -> Vec<PathBuf> {
        self.images
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Playback settings carried by the positional arguments, validated.
    pub fn settings(&self) -> Result<SlideshowSettings, CoreError> {
        let settings = SlideshowSettings {
            delay: self.delay,
            transition: self.transition,
            transition_duration: self.transition_duration,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Forced canvas size, when both `--width` and `--height` were given.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("slidekiosk-renderer").chain(args.iter().copied()))
    }

    #[test]
    fn positional_arguments_parse() {
        let args = parse(&["/a.png, /b.jpg,,", "5", "slide-up", "1.5"]).unwrap();
        assert_eq!(
            args.image_paths(),
            vec![PathBuf::from("/a.png"), PathBuf::from("/b.jpg")]
        );
        let settings = args.settings().unwrap();
        assert_eq!(settings.delay, 5.0);
        assert_eq!(settings.transition, Transition::SlideUp);
        assert_eq!(settings.transition_duration, 1.5);
        assert!(args.canvas_size().is_none());
        assert!(!args.windowed);
    }

    #[test]
    fn unknown_transition_is_rejected() {
        assert!(parse(&["/a.png", "5", "wipe", "1"]).is_err());
    }

    #[test]
    fn non_numeric_delay_is_rejected() {
        assert!(parse(&["/a.png", "soon", "fade", "1"]).is_err());
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(parse(&["/a.png", "5"]).is_err());
    }

    #[test]
    fn negative_delay_fails_validation() {
        let args = parse(&["/a.png", "--", "-2", "fade", "1"]).unwrap();
        assert!(args.settings().is_err());
    }

    #[test]
    fn canvas_flags_must_come_together() {
        assert!(parse(&["/a.png", "5", "fade", "1", "--width", "640"]).is_err());
        let args = parse(&["/a.png", "5", "fade", "1", "--width", "640", "--height", "480"]).unwrap();
        assert_eq!(args.canvas_size(), Some((640, 480)));
    }
}

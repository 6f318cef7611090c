//! Slideshow transition catalog.
//!
//! The wire form (JSON settings, renderer CLI argument) is the kebab-case
//! name, e.g. `"slide-left"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Direction for the slide family of transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A named transition effect between two consecutive slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    /// Swap frames instantly.
    None,
    /// Cross-fade A into B.
    #[default]
    Fade,
    /// Fade A to black, then B in from black.
    FadeBlack,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    /// A grows past full size while B fades in.
    ZoomIn,
    /// A shrinks below full size while B fades in.
    ZoomOut,
    /// Both frames turn toward 180 degrees while cross-fading.
    Rotate,
}

impl Transition {
    /// Every transition, in the order offered to clients.
    pub const ALL: [Transition; 10] = [
        Transition::None,
        Transition::Fade,
        Transition::FadeBlack,
        Transition::SlideLeft,
        Transition::SlideRight,
        Transition::SlideUp,
        Transition::SlideDown,
        Transition::ZoomIn,
        Transition::ZoomOut,
        Transition::Rotate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Transition::None => "none",
            Transition::Fade => "fade",
            Transition::FadeBlack => "fade-black",
            Transition::SlideLeft => "slide-left",
            Transition::SlideRight => "slide-right",
            Transition::SlideUp => "slide-up",
            Transition::SlideDown => "slide-down",
            Transition::ZoomIn => "zoom-in",
            Transition::ZoomOut => "zoom-out",
            Transition::Rotate => "rotate",
        }
    }

    /// Whether the frame swap happens without any blended frames.
    pub fn is_instant(self) -> bool {
        self == Transition::None
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Transition::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| CoreError::Validation(format!("unknown transition '{s}'")))
    }
}

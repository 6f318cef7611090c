//! Global slideshow settings.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::transition::Transition;

/// Default seconds each slide stays on screen.
pub const DEFAULT_DELAY_SECS: f64 = 10.0;

/// Default transition length in seconds.
pub const DEFAULT_TRANSITION_DURATION_SECS: f64 = 3.0;

/// Persisted as `slideshow_settings.json` and broadcast on change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideshowSettings {
    /// Seconds a slide is shown before the next transition starts.
    pub delay: f64,
    pub transition: Transition,
    /// Seconds a transition takes. Zero means an instant swap.
    pub transition_duration: f64,
}

impl Default for SlideshowSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY_SECS,
            transition: Transition::default(),
            transition_duration: DEFAULT_TRANSITION_DURATION_SECS,
        }
    }
}

impl SlideshowSettings {
    /// Reject non-finite values, a non-positive delay, or a negative duration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.delay.is_finite() || self.delay <= 0.0 {
            return Err(CoreError::Validation(
                "delay must be a positive number of seconds".to_string(),
            ));
        }
        if !self.transition_duration.is_finite() || self.transition_duration < 0.0 {
            return Err(CoreError::Validation(
                "transition_duration must be zero or more seconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Overlay the fields present in `update` onto these settings.
    pub fn merged(self, update: &SettingsUpdate) -> Self {
        Self {
            delay: update.delay.unwrap_or(self.delay),
            transition: update.transition.unwrap_or(self.transition),
            transition_duration: update
                .transition_duration
                .unwrap_or(self.transition_duration),
        }
    }
}

/// Partial settings, as sent by clients that omit unchanged fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub delay: Option<f64>,
    pub transition: Option<Transition>,
    pub transition_duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_match_first_run_values() {
        let s = SlideshowSettings::default();
        assert_eq!(s.delay, 10.0);
        assert_eq!(s.transition, Transition::Fade);
        assert_eq!(s.transition_duration, 3.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_delay_is_rejected() {
        let s = SlideshowSettings {
            delay: 0.0,
            ..Default::default()
        };
        assert_matches!(s.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn negative_duration_is_rejected_but_zero_is_fine() {
        let mut s = SlideshowSettings {
            transition_duration: -1.0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
        s.transition_duration = 0.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn integer_delay_deserializes() {
        let s: SlideshowSettings = serde_json::from_str(
            r#"{"delay": 5, "transition": "rotate", "transition_duration": 1.5}"#,
        )
        .unwrap();
        assert_eq!(s.delay, 5.0);
        assert_eq!(s.transition, Transition::Rotate);
    }

    #[test]
    fn merge_only_overrides_present_fields() {
        let update = SettingsUpdate {
            transition: Some(Transition::SlideUp),
            ..Default::default()
        };
        let merged = SlideshowSettings::default().merged(&update);
        assert_eq!(merged.transition, Transition::SlideUp);
        assert_eq!(merged.delay, DEFAULT_DELAY_SECS);
        assert_eq!(merged.transition_duration, DEFAULT_TRANSITION_DURATION_SECS);
    }
}

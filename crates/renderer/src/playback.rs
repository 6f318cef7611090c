//! Slideshow playback state machine.
//!
//! ```text
//! Loading ──start──▶ SteadyDisplay ──delay elapsed──▶ Transitioning
//!                        ▲                                  │
//!                        └──────── progress ≥ 1 ────────────┘
//! any state ──terminate──▶ Terminated
//! ```
//!
//! Time is passed in explicitly so the machine can be driven by tests.

use std::time::{Duration, Instant};

use slidekiosk_core::{SlideshowSettings, Transition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// Frames are not ready yet.
    Loading,
    /// Showing `current` until the delay elapses.
    SteadyDisplay,
    /// Blending `current` into the next frame since `started`.
    Transitioning { started: Instant },
    /// Run is over; nothing more is shown.
    Terminated,
}

/// What the window should show for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation {
    /// Nothing (still loading, or terminated).
    Blank,
    /// A single frame, untouched.
    Frame(usize),
    /// `from` composited into `to` at `progress` in `[0, 1)`.
    Blend {
        from: usize,
        to: usize,
        progress: f32,
    },
}

/// Drives which frame is on screen.
#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    frame_count: usize,
    current: usize,
    delay: Duration,
    transition: Transition,
    transition_duration: Duration,
    last_switch: Instant,
}

impl Playback {
    /// A new machine in [`PlaybackState::Loading`].
    pub fn new(settings: &SlideshowSettings, now: Instant) -> Self {
        Self {
            state: PlaybackState::Loading,
            frame_count: 0,
            current: 0,
            delay: secs(settings.delay),
            transition: settings.transition,
            transition_duration: secs(settings.transition_duration),
            last_switch: now,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_terminated(&self) -> bool {
        self.state == PlaybackState::Terminated
    }

    /// Frames are ready. With zero frames the run terminates immediately.
    pub fn start(&mut self, frame_count: usize, now: Instant) {
        if self.state != PlaybackState::Loading {
            return;
        }
        self.frame_count = frame_count;
        self.current = 0;
        self.last_switch = now;
        self.state = if frame_count == 0 {
            PlaybackState::Terminated
        } else {
            PlaybackState::SteadyDisplay
        };
    }

    /// End the run. There is no way back.
    pub fn terminate(&mut self) {
        self.state = PlaybackState::Terminated;
    }

    fn next_index(&self) -> usize {
        (self.current + 1) % self.frame_count
    }

    fn advance(&mut self, now: Instant) {
        self.current = self.next_index();
        self.last_switch = now;
        self.state = PlaybackState::SteadyDisplay;
    }

    /// Advance the machine to `now` and report what to show.
    pub fn tick(&mut self, now: Instant) -> Presentation {
        match self.state {
            PlaybackState::Loading | PlaybackState::Terminated => Presentation::Blank,

            PlaybackState::SteadyDisplay => {
                // A lone frame has nothing to blend into.
                if self.frame_count < 2 {
                    return Presentation::Frame(self.current);
                }
                if now.saturating_duration_since(self.last_switch) < self.delay {
                    return Presentation::Frame(self.current);
                }
                if self.transition.is_instant() || self.transition_duration.is_zero() {
                    self.advance(now);
                    return Presentation::Frame(self.current);
                }
                self.state = PlaybackState::Transitioning { started: now };
                Presentation::Blend {
                    from: self.current,
                    to: self.next_index(),
                    progress: 0.0,
                }
            }

            PlaybackState::Transitioning { started } => {
                let elapsed = now.saturating_duration_since(started);
                let progress = elapsed.as_secs_f64() / self.transition_duration.as_secs_f64();
                if progress >= 1.0 {
                    self.advance(now);
                    Presentation::Frame(self.current)
                } else {
                    Presentation::Blend {
                        from: self.current,
                        to: self.next_index(),
                        progress: progress as f32,
                    }
                }
            }
        }
    }
}

/// Seconds as a `Duration`, saturating: too large means "forever", negative
/// or NaN means zero.
fn secs(value: f64) -> Duration {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) => duration,
        Err(_) if value > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

//! Start button handling
//!
//! [`Debouncer`] filters the raw input; [`ButtonClassifier`] turns debounced
//! holds into power requests by their duration.

use embassy_time::{Duration, Instant};

/// Debounced logical button state
///
/// After an accepted change, further changes are ignored until the debounce
/// window has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pressed: bool,
    changed_at: Option<Instant>,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pressed: false,
            changed_at: None,
        }
    }

    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Time of the last accepted edge
    pub const fn changed_at(&self) -> Option<Instant> {
        self.changed_at
    }

    /// Feed a raw sample, returns the new state on an accepted edge
    pub fn update(&mut self, raw_pressed: bool, now: Instant) -> Option<bool> {
        if self
            .changed_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.window)
        {
            return None;
        }
        if raw_pressed == self.pressed {
            return None;
        }
        self.pressed = raw_pressed;
        self.changed_at = Some(now);
        Some(raw_pressed)
    }
}

/// Action derived from how long the button was held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Released after a hold in the short-press range
    ShortPress,
    /// Held past the long-press threshold, emitted while still held
    LongPress,
}

/// Result of one classifier update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonUpdate {
    /// Debounced state after an edge
    pub edge: Option<bool>,
    pub event: Option<ButtonEvent>,
}

/// Classifies debounced holds into [`ButtonEvent`]s
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    debouncer: Debouncer,
    short_min: Duration,
    long_min: Duration,
    long_reported: bool,
}

impl ButtonClassifier {
    pub const fn new(debounce: Duration, short_min: Duration, long_min: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            short_min,
            long_min,
            long_reported: false,
        }
    }

    pub const fn is_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }

    /// Whether the button has been held for at least `duration`
    pub fn held_for(&self, duration: Duration, now: Instant) -> bool {
        self.hold_duration(now).is_some_and(|held| held >= duration)
    }

    fn hold_duration(&self, now: Instant) -> Option<Duration> {
        if !self.debouncer.is_pressed() {
            return None;
        }
        self.debouncer
            .changed_at()
            .map(|at| now.saturating_duration_since(at))
    }

    /// Sample the input once
    pub fn update(&mut self, raw_pressed: bool, now: Instant) -> ButtonUpdate {
        let pressed_at = self.debouncer.changed_at();
        let edge = self.debouncer.update(raw_pressed, now);

        let event = match edge {
            Some(true) => {
                self.long_reported = false;
                None
            }
            Some(false) => {
                let held = pressed_at.map(|at| now.saturating_duration_since(at));
                self.classify_release(held)
            }
            None => {
                if !self.long_reported && self.held_for(self.long_min, now) {
                    self.long_reported = true;
                    Some(ButtonEvent::LongPress)
                } else {
                    None
                }
            }
        };

        ButtonUpdate { edge, event }
    }

    fn classify_release(&mut self, held: Option<Duration>) -> Option<ButtonEvent> {
        let held = held?;
        if self.long_reported {
            self.long_reported = false;
            return None;
        }
        if held >= self.long_min {
            Some(ButtonEvent::LongPress)
        } else if held >= self.short_min {
            Some(ButtonEvent::ShortPress)
        } else {
            None
        }
    }
}

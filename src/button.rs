//! Debounced button with short- and long-press detection.
//!
//! Fed with the raw pin level once per poll. Levels shorter than the
//! debounce window are treated as contact bounce; a hold crossing the
//! long-press threshold fires once while still held.

use embassy_time::{Duration, Instant};

/// Default debounce window.
pub const DEBOUNCE: Duration = Duration::from_millis(50);
/// Default hold time for a long press.
pub const LONG_PRESS: Duration = Duration::from_millis(1000);

/// A recognized button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Released after a debounced press shorter than the long-press
    /// hold.
    ShortPress,
    /// Held past the long-press threshold. Fires once per hold.
    LongPress,
}

#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    debounce: Duration,
    long_press: Duration,
    pressed_at: Option<Instant>,
    long_fired: bool,
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE, LONG_PRESS)
    }
}

impl ButtonDebouncer {
    pub const fn new(debounce: Duration, long_press: Duration) -> Self {
        Self {
            debounce,
            long_press,
            pressed_at: None,
            long_fired: false,
        }
    }

    /// Feed the current raw level; returns a gesture when one completes.
    pub fn update(&mut self, now: Instant, level: bool) -> Option<ButtonEvent> {
        match (self.pressed_at, level) {
            (None, true) => {
                self.pressed_at = Some(now);
                self.long_fired = false;
                None
            }
            (Some(since), true) => {
                if !self.long_fired && now.duration_since(since) >= self.long_press {
                    self.long_fired = true;
                    return Some(ButtonEvent::LongPress);
                }
                None
            }
            (Some(since), false) => {
                self.pressed_at = None;
                if self.long_fired {
                    // Already handled while held.
                    return None;
                }
                let held = now.duration_since(since);
                if held >= self.long_press {
                    // Crossed the threshold between polls.
                    return Some(ButtonEvent::LongPress);
                }
                if held >= self.debounce {
                    return Some(ButtonEvent::ShortPress);
                }
                // Bounce.
                None
            }
            (None, false) => None,
        }
    }
}

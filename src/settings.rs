//! Persisted controller settings.

use crate::color::{Rgb, rgb_from_u32};

/// The subset of render state that survives reboots.
///
/// The active pattern is deliberately absent: boot always starts in
/// Wave regardless of what was running before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Global brightness, 1-255.
    pub brightness: u8,
    /// Whether the auto-cycle timer is running.
    pub auto_cycle: bool,
    /// Auto-cycle period in milliseconds.
    pub auto_cycle_interval_ms: u32,
    /// Color drawn by the Static and Spiral patterns.
    pub static_color: Rgb,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brightness: 128,
            auto_cycle: false,
            auto_cycle_interval_ms: 10_000,
            static_color: rgb_from_u32(0xFF_0000),
        }
    }
}

/// Persistence port, typically NVS/flash on the target.
///
/// Storage failures are the store's own concern: the core renders with
/// defaults when nothing loads and never retries a save.
pub trait SettingsStore {
    fn load(&mut self) -> Option<Settings>;
    fn save(&mut self, settings: &Settings);
}

//! Pattern engine: render state, frame buffers, validated setters.

use embassy_time::Duration;

use crate::color::{Rgb, rgb_from_u32};
use crate::grid::Grid;
use crate::math8::scale8;
use crate::pattern::{PatternId, PatternSlot, SpiralOrder, TickContext};
use crate::settings::Settings;

/// Errors from the validating state setters.
///
/// A failed setter leaves the state exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// Brightness must stay within 1..=255.
    BrightnessOutOfRange,
    /// Auto-cycle interval must be positive.
    ZeroInterval,
}

/// Read-only serialization of the current render state for remote
/// observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub pattern: PatternId,
    pub color: Rgb,
    pub brightness: u8,
    pub auto_cycle: bool,
    pub auto_cycle_interval: Duration,
}

/// Configuration for the pattern engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub grid: Grid,
    pub pattern: PatternId,
    pub color: Rgb,
    pub brightness: u8,
    pub auto_cycle: bool,
    pub auto_cycle_interval: Duration,
    /// Frame interval shared by every pattern except Pulse.
    pub frame_interval: Duration,
}

impl EngineConfig {
    /// Boot defaults: the pattern always starts at Wave (deliberately
    /// never persisted), red static color, half brightness.
    pub const fn new(grid: Grid) -> Self {
        Self {
            grid,
            pattern: PatternId::Wave,
            color: rgb_from_u32(0xFF_0000),
            brightness: 128,
            auto_cycle: false,
            auto_cycle_interval: Duration::from_millis(10_000),
            frame_interval: Duration::from_millis(50),
        }
    }
}

/// Mutable render state shared between ticks and command handling.
#[derive(Debug)]
struct RenderState {
    pattern: PatternSlot,
    color: Rgb,
    brightness: u8,
    auto_cycle: bool,
    auto_cycle_interval: Duration,
    frame_interval: Duration,
}

/// Owns the frame buffers and the active pattern state.
///
/// `MAX_PIXELS` is the compile-time buffer capacity; the configured
/// grid may be smaller.
pub struct Engine<const MAX_PIXELS: usize> {
    grid: Grid,
    state: RenderState,
    spiral: SpiralOrder<MAX_PIXELS>,
    /// Working frame. Persists between ticks; Matrix reads it back.
    frame: [Rgb; MAX_PIXELS],
    /// Brightness-scaled copy handed to the pixel sink, kept separate
    /// so output scaling never corrupts buffer-backed pattern state.
    output: [Rgb; MAX_PIXELS],
}

impl<const MAX_PIXELS: usize> Engine<MAX_PIXELS> {
    pub fn new(config: &EngineConfig) -> Self {
        assert!(
            config.grid.count() <= MAX_PIXELS,
            "grid does not fit the pixel buffer"
        );
        assert!(config.brightness >= 1, "brightness must be 1..=255");
        Self {
            grid: config.grid,
            state: RenderState {
                pattern: config.pattern.to_slot(),
                color: config.color,
                brightness: config.brightness,
                auto_cycle: config.auto_cycle,
                auto_cycle_interval: config.auto_cycle_interval,
                frame_interval: config.frame_interval,
            },
            spiral: SpiralOrder::new(),
            frame: [Rgb::default(); MAX_PIXELS],
            output: [Rgb::default(); MAX_PIXELS],
        }
    }

    /// Render one frame and return the brightness-scaled output, ready
    /// for the pixel sink.
    pub fn tick(&mut self) -> &[Rgb] {
        let count = self.grid.count();

        if matches!(self.state.pattern, PatternSlot::Spiral(_)) {
            self.spiral.ensure_computed(self.grid);
        }

        let mut ctx = TickContext {
            frame: &mut self.frame[..count],
            grid: self.grid,
            color: self.state.color,
            spiral: self.spiral.sequence(),
        };
        self.state.pattern.tick(&mut ctx);

        let brightness = self.state.brightness;
        for (out, src) in self.output[..count].iter_mut().zip(&self.frame[..count]) {
            *out = if brightness == 255 {
                *src
            } else {
                Rgb {
                    r: scale8(src.r, brightness),
                    g: scale8(src.g, brightness),
                    b: scale8(src.b, brightness),
                }
            };
        }
        &self.output[..count]
    }

    /// Switch to a new pattern. Always starts the pattern from a zeroed
    /// state and a dark frame; the spiral order cache is kept.
    pub fn set_pattern(&mut self, pattern: PatternId) {
        self.state.pattern = pattern.to_slot();
        for pixel in &mut self.frame {
            *pixel = Rgb::default();
        }
    }

    /// Advance to the next pattern in cycle order and return it.
    pub fn cycle_pattern(&mut self) -> PatternId {
        let next = self.pattern_id().next();
        self.set_pattern(next);
        next
    }

    pub fn set_static_color(&mut self, color: Rgb) {
        self.state.color = color;
    }

    /// Set global brightness. The value is carried wide so out-of-range
    /// remote input (0, 256, ...) is rejected instead of truncated.
    pub fn set_brightness(&mut self, brightness: u16) -> Result<(), StateError> {
        if !(1..=255).contains(&brightness) {
            return Err(StateError::BrightnessOutOfRange);
        }
        #[allow(clippy::cast_possible_truncation)]
        {
            self.state.brightness = brightness as u8;
        }
        Ok(())
    }

    pub fn set_auto_cycle(&mut self, enabled: bool) {
        self.state.auto_cycle = enabled;
    }

    pub fn set_auto_cycle_interval(
        &mut self,
        interval: Duration,
    ) -> Result<(), StateError> {
        if interval.as_millis() == 0 {
            return Err(StateError::ZeroInterval);
        }
        self.state.auto_cycle_interval = interval;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pattern: self.pattern_id(),
            color: self.state.color,
            brightness: self.state.brightness,
            auto_cycle: self.state.auto_cycle,
            auto_cycle_interval: self.state.auto_cycle_interval,
        }
    }

    /// The persisted subset of the current state.
    #[allow(clippy::cast_possible_truncation)]
    pub fn settings(&self) -> Settings {
        Settings {
            brightness: self.state.brightness,
            auto_cycle: self.state.auto_cycle,
            auto_cycle_interval_ms: self.state.auto_cycle_interval.as_millis() as u32,
            static_color: self.state.color,
        }
    }

    /// Apply loaded settings through the validating setters; corrupt
    /// values are dropped and the defaults stay.
    pub fn apply_settings(&mut self, settings: &Settings) {
        let _ = self.set_brightness(u16::from(settings.brightness));
        let _ = self.set_auto_cycle_interval(Duration::from_millis(u64::from(
            settings.auto_cycle_interval_ms,
        )));
        self.set_auto_cycle(settings.auto_cycle);
        self.set_static_color(settings.static_color);
    }

    pub fn pattern_id(&self) -> PatternId {
        self.state.pattern.id()
    }

    /// Direct access to the active pattern state.
    pub fn pattern(&self) -> &PatternSlot {
        &self.state.pattern
    }

    pub const fn grid(&self) -> Grid {
        self.grid
    }

    pub const fn brightness(&self) -> u8 {
        self.state.brightness
    }

    pub const fn color(&self) -> Rgb {
        self.state.color
    }

    pub const fn auto_cycle(&self) -> bool {
        self.state.auto_cycle
    }

    pub const fn auto_cycle_interval(&self) -> Duration {
        self.state.auto_cycle_interval
    }

    /// Frame interval of the active pattern (Pulse runs on its own
    /// fixed rate).
    pub fn tick_interval(&self) -> Duration {
        self.pattern_id().tick_interval(self.state.frame_interval)
    }
}

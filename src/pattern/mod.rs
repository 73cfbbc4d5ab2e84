//! Pattern system with compile-time known variants
//!
//! All patterns are stored in an enum to avoid heap allocations.
//! Each pattern implements the `Pattern` trait and keeps its own
//! counters; switching patterns constructs a fresh variant, which is
//! what resets the state.

mod fire;
mod matrix;
mod pulse;
mod rainbow;
mod spiral;
mod static_color;
mod wave;

use embassy_time::Duration;
pub use fire::FirePattern;
pub use matrix::MatrixPattern;
pub use pulse::PulsePattern;
pub use rainbow::RainbowPattern;
pub use spiral::{SpiralOrder, SpiralPattern};
pub use static_color::StaticPattern;
pub use wave::WavePattern;

use crate::color::Rgb;
use crate::grid::Grid;

const PATTERN_NAME_RAINBOW: &str = "rainbow";
const PATTERN_NAME_STATIC: &str = "static";
const PATTERN_NAME_WAVE: &str = "wave";
const PATTERN_NAME_FIRE: &str = "fire";
const PATTERN_NAME_MATRIX: &str = "matrix";
const PATTERN_NAME_SPIRAL: &str = "spiral";
const PATTERN_NAME_PULSE: &str = "pulse";

const PATTERN_ID_RAINBOW: u8 = 0;
const PATTERN_ID_STATIC: u8 = 1;
const PATTERN_ID_WAVE: u8 = 2;
const PATTERN_ID_FIRE: u8 = 3;
const PATTERN_ID_MATRIX: u8 = 4;
const PATTERN_ID_SPIRAL: u8 = 5;
const PATTERN_ID_PULSE: u8 = 6;

/// Pulse runs on its own fixed rate; everything else shares the
/// configurable frame interval.
const PULSE_TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Everything a pattern may touch during one tick.
pub struct TickContext<'a> {
    /// Working frame in strip order, exactly `grid.count()` pixels.
    /// Persists between ticks: Matrix reads its previous frame back.
    pub frame: &'a mut [Rgb],
    /// Grid geometry for coordinate translation.
    pub grid: Grid,
    /// Shared static color (Static and Spiral draw with it).
    pub color: Rgb,
    /// Center-out traversal order; populated before any Spiral tick.
    pub spiral: &'a [u16],
}

pub trait Pattern {
    /// Compute one frame into the working buffer.
    fn tick(&mut self, ctx: &mut TickContext<'_>);
}

/// Pattern slot - enum containing all possible patterns
#[derive(Debug, Clone)]
pub enum PatternSlot {
    /// Whole-grid hue walk
    Rainbow(RainbowPattern),
    /// Solid shared color
    Static(StaticPattern),
    /// Column gradient with a sine value ripple
    Wave(WavePattern),
    /// Flame bands rising from the bottom row
    Fire(FirePattern),
    /// Falling green drops
    Matrix(MatrixPattern),
    /// Expanding and contracting center-out sweep
    Spiral(SpiralPattern),
    /// Concentric hue rings
    Pulse(PulsePattern),
}

/// Known pattern ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    Rainbow = PATTERN_ID_RAINBOW,
    Static = PATTERN_ID_STATIC,
    Wave = PATTERN_ID_WAVE,
    Fire = PATTERN_ID_FIRE,
    Matrix = PATTERN_ID_MATRIX,
    Spiral = PATTERN_ID_SPIRAL,
    Pulse = PATTERN_ID_PULSE,
}

impl Default for PatternSlot {
    fn default() -> Self {
        Self::Wave(WavePattern::new())
    }
}

impl PatternId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_RAINBOW => Self::Rainbow,
            PATTERN_ID_STATIC => Self::Static,
            PATTERN_ID_WAVE => Self::Wave,
            PATTERN_ID_FIRE => Self::Fire,
            PATTERN_ID_MATRIX => Self::Matrix,
            PATTERN_ID_SPIRAL => Self::Spiral,
            PATTERN_ID_PULSE => Self::Pulse,
            _ => return None,
        })
    }

    /// Construct a fresh slot for this pattern, counters zeroed.
    pub fn to_slot(self) -> PatternSlot {
        match self {
            Self::Rainbow => PatternSlot::Rainbow(RainbowPattern::new()),
            Self::Static => PatternSlot::Static(StaticPattern::new()),
            Self::Wave => PatternSlot::Wave(WavePattern::new()),
            Self::Fire => PatternSlot::Fire(FirePattern::new()),
            Self::Matrix => PatternSlot::Matrix(MatrixPattern::new()),
            Self::Spiral => PatternSlot::Spiral(SpiralPattern::new()),
            Self::Pulse => PatternSlot::Pulse(PulsePattern::new()),
        }
    }

    /// Successor in auto-cycle order, wrapping after the last variant.
    pub const fn next(self) -> Self {
        match self {
            Self::Rainbow => Self::Static,
            Self::Static => Self::Wave,
            Self::Wave => Self::Fire,
            Self::Fire => Self::Matrix,
            Self::Matrix => Self::Spiral,
            Self::Spiral => Self::Pulse,
            Self::Pulse => Self::Rainbow,
        }
    }

    /// Frame interval for this pattern.
    pub const fn tick_interval(self, shared: Duration) -> Duration {
        match self {
            Self::Pulse => PULSE_TICK_INTERVAL,
            _ => shared,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rainbow => PATTERN_NAME_RAINBOW,
            Self::Static => PATTERN_NAME_STATIC,
            Self::Wave => PATTERN_NAME_WAVE,
            Self::Fire => PATTERN_NAME_FIRE,
            Self::Matrix => PATTERN_NAME_MATRIX,
            Self::Spiral => PATTERN_NAME_SPIRAL,
            Self::Pulse => PATTERN_NAME_PULSE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_RAINBOW => Some(Self::Rainbow),
            PATTERN_NAME_STATIC => Some(Self::Static),
            PATTERN_NAME_WAVE => Some(Self::Wave),
            PATTERN_NAME_FIRE => Some(Self::Fire),
            PATTERN_NAME_MATRIX => Some(Self::Matrix),
            PATTERN_NAME_SPIRAL => Some(Self::Spiral),
            PATTERN_NAME_PULSE => Some(Self::Pulse),
            _ => None,
        }
    }
}

impl PatternSlot {
    /// Render the current pattern
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            Self::Rainbow(pattern) => pattern.tick(ctx),
            Self::Static(pattern) => pattern.tick(ctx),
            Self::Wave(pattern) => pattern.tick(ctx),
            Self::Fire(pattern) => pattern.tick(ctx),
            Self::Matrix(pattern) => pattern.tick(ctx),
            Self::Spiral(pattern) => pattern.tick(ctx),
            Self::Pulse(pattern) => pattern.tick(ctx),
        }
    }

    /// Get the pattern ID for external observation
    pub fn id(&self) -> PatternId {
        match self {
            Self::Rainbow(_) => PatternId::Rainbow,
            Self::Static(_) => PatternId::Static,
            Self::Wave(_) => PatternId::Wave,
            Self::Fire(_) => PatternId::Fire,
            Self::Matrix(_) => PatternId::Matrix,
            Self::Spiral(_) => PatternId::Spiral,
            Self::Pulse(_) => PatternId::Pulse,
        }
    }
}

//! Reverse-traveling color wave
//!
//! Hue falls off across columns while the offset counter pushes the
//! gradient the other way; a slow sine ripple modulates value per row.

use core::f32::consts::PI;

use libm::sinf;

use super::{Pattern, TickContext};
use crate::color::hsv_to_rgb;

/// Hue gained by the whole gradient each tick.
const OFFSET_HUE_STEP: u32 = 300;
/// Hue dropped per column (one sixth of the wheel).
const COLUMN_HUE_SPREAD: u32 = 10922;

#[derive(Debug, Clone, Default)]
pub struct WavePattern {
    offset: u32,
    step: u32,
}

impl WavePattern {
    pub const fn new() -> Self {
        Self { offset: 0, step: 0 }
    }

    pub const fn offset(&self) -> u32 {
        self.offset
    }

    pub const fn step(&self) -> u32 {
        self.step
    }
}

impl Pattern for WavePattern {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let grid = ctx.grid;
        for col in 0..grid.cols() {
            // Wrapping u32 math, truncated to u16: the same thing as
            // (offset*300 - col*10922) mod 65536 without sign juggling.
            let hue = self
                .offset
                .wrapping_mul(OFFSET_HUE_STEP)
                .wrapping_sub(u32::from(col).wrapping_mul(COLUMN_HUE_SPREAD))
                as u16;
            for row in 0..grid.rows() {
                let phase_deg = f32::from(row) * 0.5 + self.offset as f32 * 0.1;
                let val = 200.0 + 55.0 * sinf(phase_deg * PI / 180.0);
                ctx.frame[grid.index(col, row)] = hsv_to_rgb(hue, 255, val as u8);
            }
        }
        self.offset = self.offset.wrapping_add(1);
        self.step = self.step.wrapping_add(1);
    }
}

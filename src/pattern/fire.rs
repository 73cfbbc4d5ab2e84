//! Flame simulation keyed off row depth
//!
//! Intensity falls with distance from the bottom row, a per-column
//! variation keeps the flames uneven, and hashed sparkles/white flashes
//! add the crackle. Everything is a pure function of (pixel, step), so
//! there is no working state beyond the step counter.

use super::{Pattern, TickContext};
use crate::color::hsv_to_rgb;
use crate::hash::mix32;
use crate::math8::clamp_u8;

const HUE_RED: u16 = 0;
const HUE_ORANGE: u16 = 5461;
const HUE_YELLOW: u16 = 10922;
const SPARKLE_HUES: [u16; 3] = [4000, 8000, 12000];

/// Percent of pixels that sparkle on any given tick.
const SPARKLE_PERCENT: u32 = 15;
/// White flashes per thousand pixels near the bottom rows.
const FLASH_PER_MILLE: u32 = 15;

#[derive(Debug, Clone, Default)]
pub struct FirePattern {
    step: u32,
}

impl FirePattern {
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    pub const fn step(&self) -> u32 {
        self.step
    }
}

impl Pattern for FirePattern {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let grid = ctx.grid;
        for index in 0..grid.count() {
            let (col, row) = grid.coord_of(index);
            let depth = grid.rows() - 1 - row;

            let column_variation =
                (u32::from(col) * 17).wrapping_add(self.step.wrapping_mul(3)) % 50;
            let mut val = clamp_u8(
                255 - i32::from(depth) * 40 + column_variation as i32 - 25,
            );
            let mut hue = if depth < 3 {
                HUE_RED
            } else if depth < 6 {
                HUE_ORANGE
            } else {
                HUE_YELLOW
            };
            let mut sat = (255 - i32::from(depth) * 10).max(200) as u8;

            let roll = mix32(index as u64 + u64::from(self.step));
            if roll % 100 < SPARKLE_PERCENT {
                hue = SPARKLE_HUES[(roll / 100 % 3) as usize];
                val = val.saturating_add(60);
            }

            // Occasional white pop right at the embers.
            if depth <= 2 {
                let flash = mix32(((index as u64) << 32) | u64::from(self.step));
                if flash % 1000 < FLASH_PER_MILLE {
                    sat = 0;
                    val = 255;
                }
            }

            ctx.frame[index] = hsv_to_rgb(hue, sat, val);
        }
        self.step = self.step.wrapping_add(1);
    }
}

//! Concentric hue rings
//!
//! Cells light up where their Euclidean distance from the grid center
//! lands on one of twenty fixed rings; ring index picks the hue offset
//! from a base hue that rotates every tick. Runs at its own fixed 20 ms
//! rate, independent of the shared frame interval.

use libm::{fabsf, sqrtf};

use super::{Pattern, TickContext};
use crate::color::{Rgb, hsv_to_rgb};

const RING_COUNT: u16 = 20;
const RING_SPACING: f32 = 1.5;
const RING_TOLERANCE: f32 = 0.2;
/// Base hue advance per tick.
const HUE_STEP: u16 = 300;
/// Hue spread between adjacent rings (1/20 of the wheel).
const RING_HUE_SPREAD: u16 = 3277;

#[derive(Debug, Clone, Default)]
pub struct PulsePattern {
    base_hue: u16,
}

impl PulsePattern {
    pub const fn new() -> Self {
        Self { base_hue: 0 }
    }

    pub const fn base_hue(&self) -> u16 {
        self.base_hue
    }
}

impl Pattern for PulsePattern {
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let grid = ctx.grid;
        let center_col = f32::from(grid.cols() / 2);
        let center_row = f32::from(grid.rows() / 2);

        for col in 0..grid.cols() {
            for row in 0..grid.rows() {
                let dc = f32::from(col) - center_col;
                let dr = f32::from(row) - center_row;
                let distance = sqrtf(dc * dc + dr * dr);

                let mut color = Rgb::default();
                // Innermost matching ring wins.
                for ring in 0..RING_COUNT {
                    let radius = f32::from(ring) * RING_SPACING;
                    if fabsf(distance - radius) < RING_TOLERANCE {
                        let hue = self
                            .base_hue
                            .wrapping_add((RING_COUNT - 1 - ring) * RING_HUE_SPREAD);
                        color = hsv_to_rgb(hue, 255, 255);
                        break;
                    }
                }
                ctx.frame[grid.index(col, row)] = color;
            }
        }

        self.base_hue = self.base_hue.wrapping_add(HUE_STEP);
    }
}

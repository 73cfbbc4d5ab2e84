//! Falling green drops
//!
//! The frame buffer itself is the drop state: spawning writes row 0,
//! the shift pass reads the previous frame back one row at a time, and
//! the bottom row decays in place. No side store.

use super::{Pattern, TickContext};
use crate::color::Rgb;
use crate::hash::Prng;

/// Spawn probability per column per tick.
const SPAWN_PERCENT: u32 = 15;
/// Green lost per tick once a drop rests on the bottom row.
const FADE_STEP: u8 = 20;
/// Remaining green at or below which the drop goes dark.
const FADE_FLOOR: u8 = 20;

const DROP_COLOR: Rgb = Rgb { r: 0, g: 255, b: 0 };
const DEFAULT_SEED: u64 = 0x6d61_7472_6978;

#[derive(Debug, Clone)]
pub struct MatrixPattern {
    rng: Prng,
}

impl Default for MatrixPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixPattern {
    pub const fn new() -> Self {
        Self {
            rng: Prng::new(DEFAULT_SEED),
        }
    }

    /// Override the spawn sequence, mainly for reproducible tests.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Prng::new(seed);
        self
    }
}

impl Pattern for MatrixPattern {
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let grid = ctx.grid;
        let rows = grid.rows();
        let off = Rgb::default();

        for col in 0..grid.cols() {
            if self.rng.percent_chance(SPAWN_PERCENT) {
                ctx.frame[grid.index(col, 0)] = DROP_COLOR;
            }

            // Shift the column down one row, bottom first, clearing each
            // source so a drop moves exactly one row per tick.
            for row in (1..rows).rev() {
                let above = ctx.frame[grid.index(col, row - 1)];
                if above != off {
                    ctx.frame[grid.index(col, row)] = above;
                    ctx.frame[grid.index(col, row - 1)] = off;
                }
            }

            // Decay whatever rests on the bottom row.
            let bottom = grid.index(col, rows - 1);
            let pixel = ctx.frame[bottom];
            if pixel != off {
                ctx.frame[bottom] = if pixel.g <= FADE_FLOOR {
                    off
                } else {
                    Rgb {
                        r: pixel.r,
                        g: pixel.g - FADE_STEP,
                        b: pixel.b,
                    }
                };
            }
        }
    }
}

//! Center-out spiral sweep
//!
//! The traversal order visits every pixel once, walking concentric
//! square rings outward from the grid center. Computing it is the
//! expensive part, so the order is built lazily on the first Spiral
//! activation and kept for the life of the process; only the step
//! counter resets when the pattern is re-entered.

use heapless::Vec;

use super::{Pattern, TickContext};
use crate::color::Rgb;
use crate::grid::Grid;

/// Once-computed center-out traversal order.
#[derive(Debug, Default)]
pub struct SpiralOrder<const MAX_PIXELS: usize> {
    sequence: Vec<u16, MAX_PIXELS>,
    computed: bool,
}

impl<const MAX_PIXELS: usize> SpiralOrder<MAX_PIXELS> {
    pub const fn new() -> Self {
        Self {
            sequence: Vec::new(),
            computed: false,
        }
    }

    /// The traversal order; empty until [`Self::ensure_computed`] ran.
    pub fn sequence(&self) -> &[u16] {
        &self.sequence
    }

    pub const fn is_computed(&self) -> bool {
        self.computed
    }

    /// Build the order on first use; later calls are no-ops.
    pub fn ensure_computed(&mut self, grid: Grid) {
        if self.computed {
            return;
        }
        self.compute(grid);
        self.computed = true;
    }

    fn compute(&mut self, grid: Grid) {
        let total = grid.count().min(MAX_PIXELS);
        let center_col = i32::from(grid.cols() / 2);
        let center_row = i32::from(grid.rows() / 2);
        let max_radius = i32::from(grid.cols()) + i32::from(grid.rows());

        self.push(grid, center_col, center_row);

        let mut radius = 1;
        while self.sequence.len() < total && radius <= max_radius {
            let top = center_row - radius;
            let bottom = center_row + radius;
            let left = center_col - radius;
            let right = center_col + radius;

            // Top edge, left to right.
            for col in left..=right {
                self.push(grid, col, top);
            }
            // Right edge, top to bottom, corner already visited.
            for row in (top + 1)..=bottom {
                self.push(grid, right, row);
            }
            // Bottom edge, right to left, corner already visited.
            for col in (left..right).rev() {
                self.push(grid, col, bottom);
            }
            // Left edge, bottom to top, both corners already visited.
            for row in ((top + 1)..bottom).rev() {
                self.push(grid, left, row);
            }

            radius += 1;
        }
    }

    /// Append a ring cell, clipping anything outside the grid.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn push(&mut self, grid: Grid, col: i32, row: i32) {
        if col < 0
            || row < 0
            || col >= i32::from(grid.cols())
            || row >= i32::from(grid.rows())
        {
            return;
        }
        let index = grid.index(col as u16, row as u16) as u16;
        let _ = self.sequence.push(index);
    }
}

/// Expanding and contracting sweep along the spiral order, drawn in the
/// shared static color.
#[derive(Debug, Clone, Default)]
pub struct SpiralPattern {
    step: u32,
}

impl SpiralPattern {
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Number of leading spiral pixels lit at a given step: one more
    /// per tick while expanding, one less while contracting.
    pub const fn lit_count(step: u32, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        let cycle = step % (2 * total);
        if cycle < total {
            cycle
        } else {
            total - 1 - (cycle - total)
        }
    }
}

impl Pattern for SpiralPattern {
    #[allow(clippy::cast_possible_truncation)]
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let total = ctx.frame.len() as u32;
        let lit = Self::lit_count(self.step, total);

        for pixel in ctx.frame.iter_mut() {
            *pixel = Rgb::default();
        }
        for &index in ctx.spiral.iter().take(lit as usize) {
            ctx.frame[usize::from(index)] = ctx.color;
        }

        self.step = self.step.wrapping_add(1);
    }
}

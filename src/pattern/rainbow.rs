//! Whole-grid rainbow cycle
//!
//! Every pixel shows the same hue; the hue walks the 16-bit color
//! wheel one step per tick.

use super::{Pattern, TickContext};
use crate::color::hsv_to_rgb;

/// Hue advance per tick. 256 steps close the wheel after 256 ticks.
const HUE_STEP: u16 = 256;

#[derive(Debug, Clone, Default)]
pub struct RainbowPattern {
    hue: u16,
}

impl RainbowPattern {
    pub const fn new() -> Self {
        Self { hue: 0 }
    }

    pub const fn hue(&self) -> u16 {
        self.hue
    }
}

impl Pattern for RainbowPattern {
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let color = hsv_to_rgb(self.hue, 255, 255);
        for pixel in ctx.frame.iter_mut() {
            *pixel = color;
        }
        self.hue = self.hue.wrapping_add(HUE_STEP);
    }
}

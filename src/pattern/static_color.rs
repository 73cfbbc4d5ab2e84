//! Solid fill with the shared static color. Idempotent.

use super::{Pattern, TickContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPattern;

impl StaticPattern {
    pub const fn new() -> Self {
        Self
    }
}

impl Pattern for StaticPattern {
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let color = ctx.color;
        for pixel in ctx.frame.iter_mut() {
            *pixel = color;
        }
    }
}

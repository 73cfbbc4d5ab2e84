//! Perceptual gamma correction for WS2812-class LEDs.

use crate::color::Rgb;

/// Exponent of the perceptual curve. 2.6 matches how the common 5050
/// packages actually dim, which is steeper than sRGB.
const GAMMA: f32 = 2.6;

/// Apply the perceptual gamma curve to a single channel.
///
/// Monotone, fixes 0 to 0 and 255 to 255.
pub fn gamma8(value: u8) -> u8 {
    if value == 0 || value == 255 {
        return value;
    }
    let normalized = f32::from(value) / 255.0;
    let corrected = libm::powf(normalized, GAMMA) * 255.0 + 0.5;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        corrected as u8
    }
}

/// Gamma-correct all three channels of a color.
pub fn correct(color: Rgb) -> Rgb {
    Rgb {
        r: gamma8(color.r),
        g: gamma8(color.g),
        b: gamma8(color.b),
    }
}

//! 16-bit hue HSV conversion.
//!
//! Integer port of the classic NeoPixel hue ramp: the 0-65535 hue
//! circle collapses to a 0-1529 position across six 255-step primary
//! ramps, then saturation and value are folded in with two fixed-point
//! multiplies per channel. A 16-bit hue keeps small per-tick steps
//! (+256, +300) smooth, which an 8-bit color wheel cannot express.

use crate::color::Rgb;
use crate::gamma;

/// Convert HSV to gamma-corrected RGB.
///
/// `hue` covers the full color wheel over 0-65535; `sat` and `val` are
/// 0-255. Deterministic and pure.
pub fn hsv_to_rgb(hue: u16, sat: u8, val: u8) -> Rgb {
    gamma::correct(hsv_to_rgb_raw(hue, sat, val))
}

#[allow(clippy::cast_possible_truncation)]
fn hsv_to_rgb_raw(hue: u16, sat: u8, val: u8) -> Rgb {
    // Remap 0-65535 onto 0-1529: six 255-wide ramps around the wheel.
    let pos = (u32::from(hue) * 1530 + 32768) >> 16;

    let (r, g, b) = if pos < 510 {
        // Red to green
        if pos < 255 {
            (255, pos, 0)
        } else {
            (510 - pos, 255, 0)
        }
    } else if pos < 1020 {
        // Green to blue
        if pos < 765 {
            (0, 255, pos - 510)
        } else {
            (0, 1020 - pos, 255)
        }
    } else if pos < 1530 {
        // Blue to red
        if pos < 1275 {
            (pos - 1020, 0, 255)
        } else {
            (255, 0, 1530 - pos)
        }
    } else {
        (255, 0, 0)
    };

    // Fold saturation and value in: 1 is added before the multiply so a
    // full-scale channel stays at full scale after the >>8.
    let v1 = 1 + u32::from(val);
    let s1 = 1 + u32::from(sat);
    let s2 = 255 - u32::from(sat);

    let apply = |channel: u32| (((((channel * s1) >> 8) + s2) * v1) >> 8) as u8;

    Rgb {
        r: apply(r),
        g: apply(g),
        b: apply(b),
    }
}

use smart_leds::hsv::hsv2rgb;

use crate::color::{Hsv, Rgb};

/// Reduce a 16-bit hue (full circle = 65536) to the 8-bit hue used by `Hsv`
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn hue8(hue: u16) -> u8 {
    (hue >> 8) as u8
}

/// Convert a 16-bit hue with 8-bit saturation and value to RGB
pub fn hsv_color(hue: u16, sat: u8, val: u8) -> Rgb {
    hsv2rgb(Hsv {
        hue: hue8(hue),
        sat,
        val,
    })
}

/// Hue of the pixel at `index` when one full hue circle spans `count` pixels
///
/// The sweep starts at `first_hue` on pixel 0.
#[allow(clippy::cast_possible_truncation)]
pub const fn rainbow_hue(first_hue: u16, index: usize, count: usize) -> u16 {
    if count == 0 {
        return first_hue;
    }
    let offset = (index * 65_536 / count) as u16;
    first_hue.wrapping_add(offset)
}

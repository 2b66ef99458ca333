/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Move `value` one unit toward `target`
#[inline]
pub const fn step_toward(value: u8, target: u8) -> u8 {
    if value < target {
        value + 1
    } else if value > target {
        value - 1
    } else {
        value
    }
}

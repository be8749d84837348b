//! 8-bit fixed-point helpers shared by the strip effects

use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16;
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    );
    partial = partial.wrapping_add(0x8000);

    (partial >> 16) as u8
}

/// Progress (0-255) of `elapsed` through `duration`
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: Duration, duration: Duration) -> u8 {
    if duration.as_millis() == 0 {
        return 255;
    }
    if elapsed.as_millis() >= duration.as_millis() {
        return 255;
    }

    ((elapsed.as_millis() * 255) / duration.as_millis()) as u8
}

/// Remaining share (255-0) of `duration` after `elapsed`, for fade-outs
#[inline]
pub const fn remaining8(elapsed: Duration, duration: Duration) -> u8 {
    255 - progress8(elapsed, duration)
}

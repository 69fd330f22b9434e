//! The intensity pipeline (§4.5.1): turns a band intensity and a step
//! multiplier into a per-channel scale factor, then applies it to a scene's
//! raw RGBW byte values.

/// `effective` scale factor for a band at intensity `i` with step multiplier
/// `m`. Below `0.2` there is no floor, so a fade can visibly dim to black;
/// at or above it a 25% floor keeps an "on" sequence perceptible.
pub fn effective_intensity(i: f32, m: f32) -> f32 {
    if i < 0.2 {
        i * m
    } else {
        (0.25 + 0.75 * i) * m
    }
}

/// Scale one channel byte by `effective`, rounding and clamping to `[0,255]`.
pub fn apply_channel(v: u8, effective: f32) -> u8 {
    (v as f32 * effective).round().clamp(0.0, 255.0) as u8
}

/// Scale all four RGBW channels by `effective`.
pub fn apply_channels(channels: [u8; 4], effective: f32) -> [u8; 4] {
    channels.map(|v| apply_channel(v, effective))
}

/// Clamp a requested intensity against a band's configured floor, per the
/// `start_sequence`/`update_intensity` rule: never below half the floor
/// unless the caller explicitly asked for a dimmer value (fade-to-black).
pub fn clamp_to_floor(intensity: f32, base_intensity: f32) -> f32 {
    if intensity < 0.5 * base_intensity {
        intensity
    } else {
        intensity.max(base_intensity)
    }
}

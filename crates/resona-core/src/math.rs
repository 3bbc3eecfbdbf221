//! Level-conversion math.

/// Convert decibels to linear gain.
///
/// 0 dB maps to 1.0, -6 dB to roughly 0.5, +6 dB to roughly 2.0.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    (db * FACTOR).exp()
}

/// Convert linear gain to decibels.
///
/// The input is floored at 1e-10 to keep the logarithm finite.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    linear.max(1e-10).ln() * FACTOR
}

//! Fixed six-band peaking equalizer.
//!
//! The band layout is a constant of the product: six peaking filters at
//! fixed centers, constant Q, connected in series in ascending-frequency
//! order. Only the per-band gain is adjustable.

use resona_core::{Biquad, peaking_coefficients};

use crate::EffectError;

/// Number of equalizer bands.
pub const BAND_COUNT: usize = 6;

/// Fixed band center frequencies in Hz, ascending.
pub const BAND_FREQUENCIES_HZ: [f32; BAND_COUNT] = [60.0, 150.0, 400.0, 1000.0, 2400.0, 15000.0];

/// Q factor shared by every band.
pub const BAND_Q: f32 = 1.0;

/// Minimum band gain in dB.
pub const BAND_GAIN_MIN_DB: f32 = -12.0;

/// Maximum band gain in dB.
pub const BAND_GAIN_MAX_DB: f32 = 12.0;

/// Six peaking filters in series, stereo.
///
/// Starts flat (0 dB everywhere). [`set_band_gain`](Self::set_band_gain)
/// clamps to [`BAND_GAIN_MIN_DB`]..=[`BAND_GAIN_MAX_DB`] and updates the
/// live filter coefficients immediately.
#[derive(Debug, Clone)]
pub struct EqualizerBank {
    /// `filters[band]` holds the left/right biquad pair for that band.
    filters: [[Biquad; 2]; BAND_COUNT],
    gains_db: [f32; BAND_COUNT],
    sample_rate: f32,
}

impl EqualizerBank {
    /// Create a flat equalizer for the given sample rate.
    ///
    /// Fails if the sample rate is non-positive or too low to represent
    /// the highest band center.
    pub fn new(sample_rate: f32) -> Result<Self, EffectError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EffectError::InvalidSampleRate(sample_rate));
        }
        let nyquist = sample_rate / 2.0;
        if let Some(&frequency) = BAND_FREQUENCIES_HZ.iter().find(|&&f| f >= nyquist) {
            return Err(EffectError::BandAboveNyquist {
                frequency,
                sample_rate,
            });
        }

        Ok(Self {
            filters: Default::default(),
            gains_db: [0.0; BAND_COUNT],
            sample_rate,
        })
    }

    /// Set one band's gain in dB, clamped to the band range.
    ///
    /// Out-of-range band indices are ignored.
    pub fn set_band_gain(&mut self, band: usize, gain_db: f32) {
        let Some(stored) = self.gains_db.get_mut(band) else {
            debug_assert!(false, "band index out of range: {band}");
            return;
        };
        *stored = gain_db.clamp(BAND_GAIN_MIN_DB, BAND_GAIN_MAX_DB);

        let (b0, b1, b2, a0, a1, a2) =
            peaking_coefficients(BAND_FREQUENCIES_HZ[band], BAND_Q, *stored, self.sample_rate);
        for filter in &mut self.filters[band] {
            filter.set_coefficients(b0, b1, b2, a0, a1, a2);
        }
    }

    /// Current gain of a band in dB (0.0 for out-of-range indices).
    pub fn band_gain(&self, band: usize) -> f32 {
        self.gains_db.get(band).copied().unwrap_or(0.0)
    }

    /// All band gains in ascending-frequency order.
    pub fn band_gains(&self) -> [f32; BAND_COUNT] {
        self.gains_db
    }

    /// Sample rate the bank was built for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Process a stereo block in place, bands in series.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        for band in &mut self.filters {
            for sample in left.iter_mut() {
                *sample = band[0].process(*sample);
            }
            for sample in right.iter_mut() {
                *sample = band[1].process(*sample);
            }
        }
    }

    /// Clear all filter state without touching gains.
    pub fn reset(&mut self) {
        for band in &mut self.filters {
            for filter in band {
                filter.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat() {
        let eq = EqualizerBank::new(48000.0).unwrap();
        assert_eq!(eq.band_gains(), [0.0; BAND_COUNT]);
    }

    #[test]
    fn flat_bank_is_passthrough() {
        let mut eq = EqualizerBank::new(48000.0).unwrap();
        let mut left: Vec<f32> = (0..256).map(|i| (i as f32 * 0.21).sin()).collect();
        let mut right = left.clone();
        let expected = left.clone();

        eq.process_block(&mut left, &mut right);

        for i in 0..256 {
            assert!((left[i] - expected[i]).abs() < 1e-4, "left diverged at {i}");
            assert!((right[i] - expected[i]).abs() < 1e-4, "right diverged at {i}");
        }
    }

    #[test]
    fn gain_clamps_to_band_range() {
        let mut eq = EqualizerBank::new(48000.0).unwrap();
        eq.set_band_gain(0, 40.0);
        assert_eq!(eq.band_gain(0), BAND_GAIN_MAX_DB);
        eq.set_band_gain(0, -40.0);
        assert_eq!(eq.band_gain(0), BAND_GAIN_MIN_DB);
        eq.set_band_gain(3, 4.5);
        assert_eq!(eq.band_gain(3), 4.5);
    }

    #[test]
    fn frequencies_are_ascending() {
        for pair in BAND_FREQUENCIES_HZ.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn low_sample_rate_rejected() {
        // 16 kHz cannot represent the 15 kHz band.
        let err = EqualizerBank::new(16000.0).unwrap_err();
        assert!(matches!(err, EffectError::BandAboveNyquist { .. }));

        let err = EqualizerBank::new(0.0).unwrap_err();
        assert!(matches!(err, EffectError::InvalidSampleRate(_)));
    }

    #[test]
    fn boost_changes_output_energy() {
        let mut flat = EqualizerBank::new(48000.0).unwrap();
        let mut boosted = EqualizerBank::new(48000.0).unwrap();
        boosted.set_band_gain(3, 12.0); // 1 kHz

        let make_input = || -> Vec<f32> {
            (0..4800)
                .map(|i| (2.0 * core::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
                .collect()
        };

        let mut l1 = make_input();
        let mut r1 = l1.clone();
        flat.process_block(&mut l1, &mut r1);

        let mut l2 = make_input();
        let mut r2 = l2.clone();
        boosted.process_block(&mut l2, &mut r2);

        let energy = |s: &[f32]| -> f64 { s.iter().map(|&x| f64::from(x * x)).sum() };
        assert!(
            energy(&l2) > energy(&l1) * 4.0,
            "12 dB boost at the test tone frequency should raise energy substantially"
        );
    }
}

//! Convolution reverb with a dry/wet split.
//!
//! The unit owns a [`Convolver`] whose kernel is the impulse response it
//! was built with, plus a dry gain and a wet gain. The two gains always
//! move together: `set_mix` writes `dry = 1 - m` and `wet = m` in one
//! call, so a half-applied update can never be heard.

use resona_core::{Convolver, SmoothedParam, StereoBuffer};

use crate::EffectError;

/// Smoothing time for the dry/wet gains, in milliseconds.
const MIX_SMOOTHING_MS: f32 = 10.0;

/// Wet/dry convolution reverb.
///
/// The wet path lags the dry path by one convolution partition
/// ([`Convolver::latency_samples`]), which reads as a short pre-delay.
#[derive(Debug)]
pub struct ReverbUnit {
    convolver: Convolver,
    dry_gain: SmoothedParam,
    wet_gain: SmoothedParam,
}

impl ReverbUnit {
    /// Build a reverb around the given impulse response.
    ///
    /// `initial_mix` is applied without smoothing so a rebuilt graph
    /// starts at its stored mix instead of fading in from dry.
    pub fn new(
        sample_rate: f32,
        impulse: &StereoBuffer,
        initial_mix: f32,
    ) -> Result<Self, EffectError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EffectError::InvalidSampleRate(sample_rate));
        }

        let mix = initial_mix.clamp(0.0, 1.0);
        Ok(Self {
            convolver: Convolver::new(impulse)?,
            dry_gain: SmoothedParam::new(1.0 - mix, sample_rate, MIX_SMOOTHING_MS),
            wet_gain: SmoothedParam::new(mix, sample_rate, MIX_SMOOTHING_MS),
        })
    }

    /// Set the wet/dry mix: `dry = 1 - mix`, `wet = mix`, as one update.
    ///
    /// `mix` is clamped to `[0, 1]`. Idempotent: repeated calls with the
    /// same value leave both gains unchanged. A mix of zero is an
    /// effective bypass (wet fully muted).
    pub fn set_mix(&mut self, mix: f32) {
        let mix = mix.clamp(0.0, 1.0);
        self.dry_gain.set_target(1.0 - mix);
        self.wet_gain.set_target(mix);
    }

    /// Current mix (the wet-gain target).
    pub fn mix(&self) -> f32 {
        self.wet_gain.target()
    }

    /// Dry-gain target.
    pub fn dry_gain(&self) -> f32 {
        self.dry_gain.target()
    }

    /// Wet-gain target.
    pub fn wet_gain(&self) -> f32 {
        self.wet_gain.target()
    }

    /// Process a stereo block in place.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        for i in 0..left.len() {
            let (wet_l, wet_r) = self.convolver.process(left[i], right[i]);
            let dry = self.dry_gain.advance();
            let wet = self.wet_gain.advance();
            left[i] = dry * left[i] + wet * wet_l;
            right[i] = dry * right[i] + wet * wet_r;
        }
    }

    /// Clear convolution state without touching the mix.
    pub fn reset(&mut self) {
        self.convolver.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_delta(len: usize) -> StereoBuffer {
        let mut ir = StereoBuffer::silence(len);
        ir.left[0] = 1.0;
        ir.right[0] = 1.0;
        ir
    }

    #[test]
    fn set_mix_is_idempotent() {
        let mut reverb = ReverbUnit::new(48000.0, &impulse_delta(64), 0.0).unwrap();

        for _ in 0..3 {
            reverb.set_mix(0.4);
            assert!((reverb.dry_gain() - 0.6).abs() < 1e-6);
            assert!((reverb.wet_gain() - 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn gains_always_sum_to_unity() {
        let mut reverb = ReverbUnit::new(48000.0, &impulse_delta(64), 0.0).unwrap();
        for mix in [0.0, 0.25, 0.5, 0.99, 1.0, 2.0, -1.0] {
            reverb.set_mix(mix);
            assert!((reverb.dry_gain() + reverb.wet_gain() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_mix_is_bypass() {
        let mut reverb = ReverbUnit::new(48000.0, &impulse_delta(64), 0.0).unwrap();
        reverb.set_mix(0.0);
        assert_eq!(reverb.wet_gain(), 0.0);
        assert_eq!(reverb.dry_gain(), 1.0);

        let mut left: Vec<f32> = (0..512).map(|i| (i as f32 * 0.13).sin()).collect();
        let mut right = left.clone();
        let expected = left.clone();
        reverb.process_block(&mut left, &mut right);

        for i in 0..512 {
            assert!(
                (left[i] - expected[i]).abs() < 1e-5,
                "bypass altered the signal at {i}"
            );
        }
    }

    #[test]
    fn full_wet_is_delayed_input_for_delta_kernel() {
        let mut reverb = ReverbUnit::new(48000.0, &impulse_delta(64), 1.0).unwrap();
        let latency = 256; // one convolution partition

        let input: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut left = input.clone();
        let mut right = input.clone();
        reverb.process_block(&mut left, &mut right);

        for i in 0..(1024 - latency) {
            assert!(
                (left[i + latency] - input[i]).abs() < 1e-3,
                "wet path mismatch at {i}"
            );
        }
    }

    #[test]
    fn initial_mix_applies_without_ramp() {
        let reverb = ReverbUnit::new(48000.0, &impulse_delta(64), 0.8).unwrap();
        assert!((reverb.wet_gain() - 0.8).abs() < 1e-6);
        assert!((reverb.dry_gain() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn invalid_construction_rejected() {
        assert!(matches!(
            ReverbUnit::new(-1.0, &impulse_delta(64), 0.0),
            Err(EffectError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ReverbUnit::new(48000.0, &StereoBuffer::silence(0), 0.0),
            Err(EffectError::EmptyImpulse)
        ));
    }
}

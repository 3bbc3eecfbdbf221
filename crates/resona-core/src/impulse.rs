//! Procedural impulse-response synthesis.
//!
//! A convolution reverb needs an impulse response. Rather than shipping
//! recorded room IRs, resona synthesizes one: uniform noise shaped by a
//! polynomial decay envelope. Each channel gets independent noise so the
//! tail decorrelates into a wide stereo image.
//!
//! The content is stochastic per call; only the envelope shape is
//! deterministic. Callers that need reproducible buffers (tests) pass a
//! seeded rng.

use rand::Rng;

use crate::stereo::StereoBuffer;

/// Impulse-response length used for the reverb kernel, in seconds.
pub const DEFAULT_DURATION_SECS: f32 = 5.0;

/// Decay-envelope exponent used for the reverb kernel.
pub const DEFAULT_DECAY_EXPONENT: f32 = 5.0;

/// Synthesize a stereo impulse response of decaying noise.
///
/// Length is `round(sample_rate * duration_seconds)` frames. Sample `i` of
/// each channel is `uniform(-1, 1) * (1 - i/length)^decay_exponent`, so
/// every value lies in `[-1, 1]` and the envelope decays monotonically
/// to zero at the end of the buffer.
pub fn synthesize(
    rng: &mut impl Rng,
    sample_rate: f32,
    duration_seconds: f32,
    decay_exponent: f32,
) -> StereoBuffer {
    let length = (sample_rate * duration_seconds).round() as usize;
    let mut buffer = StereoBuffer::silence(length);

    for channel in [&mut buffer.left, &mut buffer.right] {
        for (i, sample) in channel.iter_mut().enumerate() {
            let noise = rng.gen_range(-1.0f32..=1.0);
            let t = i as f32 / length as f32;
            *sample = noise * (1.0 - t).powf(decay_exponent);
        }
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn windowed_rms(samples: &[f32], windows: usize) -> Vec<f64> {
        let window_len = samples.len() / windows;
        (0..windows)
            .map(|w| {
                let chunk = &samples[w * window_len..(w + 1) * window_len];
                let sum: f64 = chunk.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
                (sum / chunk.len() as f64).sqrt()
            })
            .collect()
    }

    #[test]
    fn length_is_rounded_product() {
        let mut rng = StdRng::seed_from_u64(1);
        let ir = synthesize(&mut rng, 44100.0, 5.0, 5.0);
        assert_eq!(ir.len(), 220_500);

        // Fractional product rounds, not truncates.
        let ir = synthesize(&mut rng, 22050.0, 0.0001, 5.0);
        assert_eq!(ir.len(), 2); // 2.205 rounds to 2
    }

    #[test]
    fn values_bounded() {
        let mut rng = StdRng::seed_from_u64(2);
        let ir = synthesize(&mut rng, 8000.0, 1.0, 5.0);
        for s in ir.left.iter().chain(ir.right.iter()) {
            assert!((-1.0..=1.0).contains(s), "sample out of range: {s}");
        }
    }

    #[test]
    fn envelope_decays() {
        let mut rng = StdRng::seed_from_u64(3);
        let ir = synthesize(&mut rng, 48000.0, 2.0, 5.0);

        // Windowed RMS must trend downward; the noise makes individual
        // windows jitter, so compare with a small tolerance.
        for channel in [&ir.left, &ir.right] {
            let rms = windowed_rms(channel, 8);
            for pair in rms.windows(2) {
                assert!(
                    pair[1] <= pair[0] * 1.05,
                    "envelope not decaying: {} -> {}",
                    pair[0],
                    pair[1]
                );
            }
            assert!(rms[7] < rms[0] * 0.1, "tail did not decay: {rms:?}");
        }
    }

    #[test]
    fn channels_are_decorrelated() {
        let mut rng = StdRng::seed_from_u64(4);
        let ir = synthesize(&mut rng, 8000.0, 0.5, 5.0);
        assert_ne!(ir.left, ir.right);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn length_and_bounds_hold(
            sample_rate in 4000.0f32..48000.0,
            duration in 0.05f32..1.0,
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let ir = synthesize(&mut rng, sample_rate, duration, 5.0);
            prop_assert_eq!(ir.len(), (sample_rate * duration).round() as usize);
            for s in ir.left.iter().chain(ir.right.iter()) {
                prop_assert!((-1.0..=1.0).contains(s));
            }
        }
    }
}

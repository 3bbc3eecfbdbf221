//! Effect units for the resona effects graph.
//!
//! Each unit wraps resona-core primitives behind the parameter surface the
//! engine pushes values into:
//!
//! - [`EqualizerBank`] - six fixed peaking bands in series
//! - [`ReverbUnit`] - convolution reverb with an atomic dry/wet split
//! - [`GainStage`] - post-mix loudness boost
//!
//! Units are stereo and process blocks in place. They are constructed per
//! graph build and hold no state that outlives a topology.

pub mod boost;
pub mod equalizer;
pub mod reverb;

pub use boost::GainStage;
pub use equalizer::EqualizerBank;
pub use reverb::ReverbUnit;

use thiserror::Error;

/// Errors raised while constructing an effect unit.
///
/// Construction failures abort a graph rebuild; they never occur on the
/// per-block processing path.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The platform context reported a non-positive sample rate.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// An equalizer band center sits at or above the Nyquist frequency.
    #[error("band center {frequency} Hz is not representable at {sample_rate} Hz")]
    BandAboveNyquist {
        /// Center frequency of the offending band.
        frequency: f32,
        /// Sample rate the bank was built for.
        sample_rate: f32,
    },

    /// The reverb kernel has no samples.
    #[error("impulse response is empty")]
    EmptyImpulse,
}

impl From<resona_core::ConvolverError> for EffectError {
    fn from(err: resona_core::ConvolverError) -> Self {
        match err {
            resona_core::ConvolverError::EmptyImpulse => Self::EmptyImpulse,
        }
    }
}

//! Effect parameter storage.
//!
//! [`ParameterStore`] holds the current value of every effect parameter.
//! It is created once at engine construction and survives every graph
//! rebuild until the engine closes, so parameters persist across asset
//! changes. It is also the single source of truth for displayed values:
//! whatever a UI shows is read back from here, never from a node.
//!
//! All setters clamp silently to the documented domain; out-of-range
//! input is never an error.

use serde::{Deserialize, Serialize};

use resona_effects::boost::{BOOST_MAX_PERCENT, BOOST_MIN_PERCENT};
use resona_effects::equalizer::{BAND_COUNT, BAND_GAIN_MAX_DB, BAND_GAIN_MIN_DB};

/// Minimum playback-speed multiplier.
pub const SPEED_MIN: f32 = 0.5;

/// Maximum playback-speed multiplier.
pub const SPEED_MAX: f32 = 2.0;

/// A single parameter update routed through the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    /// Playback-speed multiplier, `[0.5, 2.0]`.
    Speed(f32),
    /// Reverb wet/dry mix, `[0.0, 1.0]`.
    ReverbMix(f32),
    /// Loudness boost in percent, `[0, 300]`.
    BoostPercent(f32),
    /// Gain of one equalizer band in dB, `[-12, 12]`.
    EqBandGain {
        /// Band index, `0..6` in ascending-frequency order.
        band: usize,
        /// Requested gain in dB.
        gain_db: f32,
    },
}

/// Current value of every effect parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterStore {
    /// Playback-speed multiplier.
    speed_multiplier: f32,
    /// Reverb wet/dry mix.
    reverb_mix: f32,
    /// Loudness boost in percent.
    boost_percent: f32,
    /// Per-band equalizer gains in dB, ascending-frequency order.
    eq_band_gains_db: [f32; BAND_COUNT],
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            reverb_mix: 0.0,
            boost_percent: 0.0,
            eq_band_gains_db: [0.0; BAND_COUNT],
        }
    }
}

impl ParameterStore {
    /// Clamp and store a parameter update.
    ///
    /// Returns the clamped update that was actually stored, or `None` if
    /// the update addressed a nonexistent equalizer band (in which case
    /// nothing changes).
    pub fn apply(&mut self, parameter: Parameter) -> Option<Parameter> {
        match parameter {
            Parameter::Speed(value) => {
                self.speed_multiplier = value.clamp(SPEED_MIN, SPEED_MAX);
                Some(Parameter::Speed(self.speed_multiplier))
            }
            Parameter::ReverbMix(value) => {
                self.reverb_mix = value.clamp(0.0, 1.0);
                Some(Parameter::ReverbMix(self.reverb_mix))
            }
            Parameter::BoostPercent(value) => {
                self.boost_percent = value.clamp(BOOST_MIN_PERCENT, BOOST_MAX_PERCENT);
                Some(Parameter::BoostPercent(self.boost_percent))
            }
            Parameter::EqBandGain { band, gain_db } => {
                let slot = self.eq_band_gains_db.get_mut(band)?;
                *slot = gain_db.clamp(BAND_GAIN_MIN_DB, BAND_GAIN_MAX_DB);
                Some(Parameter::EqBandGain {
                    band,
                    gain_db: *slot,
                })
            }
        }
    }

    /// Playback-speed multiplier.
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Reverb wet/dry mix.
    pub fn reverb_mix(&self) -> f32 {
        self.reverb_mix
    }

    /// Loudness boost in percent.
    pub fn boost_percent(&self) -> f32 {
        self.boost_percent
    }

    /// Gain of one equalizer band in dB (0.0 for out-of-range indices).
    pub fn eq_band_gain(&self, band: usize) -> f32 {
        self.eq_band_gains_db.get(band).copied().unwrap_or(0.0)
    }

    /// All equalizer band gains.
    pub fn eq_band_gains(&self) -> [f32; BAND_COUNT] {
        self.eq_band_gains_db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let store = ParameterStore::default();
        assert_eq!(store.speed_multiplier(), 1.0);
        assert_eq!(store.reverb_mix(), 0.0);
        assert_eq!(store.boost_percent(), 0.0);
        assert_eq!(store.eq_band_gains(), [0.0; BAND_COUNT]);
    }

    #[test]
    fn out_of_range_values_clamp_silently() {
        let mut store = ParameterStore::default();

        assert_eq!(
            store.apply(Parameter::Speed(10.0)),
            Some(Parameter::Speed(2.0))
        );
        assert_eq!(
            store.apply(Parameter::Speed(0.0)),
            Some(Parameter::Speed(0.5))
        );
        assert_eq!(
            store.apply(Parameter::ReverbMix(1.5)),
            Some(Parameter::ReverbMix(1.0))
        );
        assert_eq!(
            store.apply(Parameter::BoostPercent(-20.0)),
            Some(Parameter::BoostPercent(0.0))
        );
        assert_eq!(
            store.apply(Parameter::EqBandGain {
                band: 2,
                gain_db: 99.0
            }),
            Some(Parameter::EqBandGain {
                band: 2,
                gain_db: 12.0
            })
        );
    }

    #[test]
    fn unknown_band_is_ignored() {
        let mut store = ParameterStore::default();
        assert_eq!(
            store.apply(Parameter::EqBandGain {
                band: 6,
                gain_db: 3.0
            }),
            None
        );
        assert_eq!(store.eq_band_gains(), [0.0; BAND_COUNT]);
    }

    #[test]
    fn values_survive_round_trips() {
        let mut store = ParameterStore::default();
        store.apply(Parameter::ReverbMix(0.4));
        store.apply(Parameter::EqBandGain {
            band: 0,
            gain_db: 6.0,
        });

        assert_eq!(store.reverb_mix(), 0.4);
        assert_eq!(store.eq_band_gain(0), 6.0);
        assert_eq!(store.eq_band_gain(1), 0.0);
    }
}

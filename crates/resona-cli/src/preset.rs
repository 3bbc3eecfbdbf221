//! TOML preset files.
//!
//! A preset captures one full [`ParameterStore`]. The render command
//! applies presets through the session's parameter API, so out-of-range
//! values in a hand-edited file clamp exactly like slider input would.
//!
//! # Format
//!
//! ```toml
//! name = "Cathedral"
//!
//! [parameters]
//! speed_multiplier = 1.0
//! reverb_mix = 0.6
//! boost_percent = 50.0
//! eq_band_gains_db = [3.0, 1.0, 0.0, 0.0, -2.0, 4.0]
//! ```

use std::path::Path;

use anyhow::Context;
use resona_engine::ParameterStore;
use serde::{Deserialize, Serialize};

/// A named parameter set loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,

    /// The stored parameter values.
    pub parameters: ParameterStore,
}

/// Load a preset from a TOML file.
pub fn load_preset<P: AsRef<Path>>(path: P) -> anyhow::Result<Preset> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading preset {}", path.as_ref().display()))?;
    let preset: Preset = toml::from_str(&content)
        .with_context(|| format!("parsing preset {}", path.as_ref().display()))?;
    Ok(preset)
}

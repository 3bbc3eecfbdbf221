//! Audio session: one surface, one engine, one asset at a time.
//!
//! [`AudioSession`] ties the pieces together for a caller: it owns the
//! playback surface, the graph engine, and the transport controller, and
//! manages the transient-resource lifecycle of loaded assets. The caller
//! keeps ownership of asset *creation* (the session never performs file
//! I/O); the session guarantees that on every asset switch the previous
//! handle is released exactly once through the supplied
//! [`ResourceReclaimer`].
//!
//! Graph-dependent work is deferred until the surface reports readiness:
//! `load_asset` only marks a rebuild pending, and
//! [`pump_events`](AudioSession::pump_events) performs the build when
//! `MetadataLoaded` arrives.

use serde::Serialize;
use tracing::{debug, warn};

use crate::controller::PlaybackController;
use crate::error::EngineError;
use crate::graph::{AudioGraphEngine, EngineState};
use crate::params::Parameter;
use crate::platform::PlatformContext;
use crate::surface::{MediaSurface, SurfaceEvent};

/// Opaque handle to a transient media resource (a temporary URL or
/// equivalent), produced by the caller's allocator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle(String);

impl AssetHandle {
    /// Wrap an allocator-produced token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The underlying token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Release half of the caller's transient-resource allocator.
///
/// The session calls [`revoke`](Self::revoke) exactly once per handle it
/// has accepted: on the switch that replaces it, or on close.
pub trait ResourceReclaimer {
    /// Release one transient resource.
    fn revoke(&mut self, handle: AssetHandle);
}

/// Observable player state, assembled for a UI per tick.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerState {
    /// Last observed playback position in seconds.
    pub current_time: f64,
    /// Last observed asset duration in seconds.
    pub duration: f64,
    /// Whether the surface was last observed playing.
    pub is_playing: bool,
    /// Display name of the loaded asset, if any.
    pub display_name: Option<String>,
}

/// Binds one playback surface to one [`AudioGraphEngine`] for the
/// surface's whole lifetime.
pub struct AudioSession<C, S, R>
where
    C: PlatformContext,
    S: MediaSurface,
    R: ResourceReclaimer,
{
    engine: AudioGraphEngine<C>,
    surface: S,
    controller: PlaybackController,
    reclaimer: R,
    current_handle: Option<AssetHandle>,
    display_name: Option<String>,
    /// Set by `load_asset`, consumed by `pump_events` on `MetadataLoaded`.
    rebuild_pending: bool,
}

impl<C, S, R> AudioSession<C, S, R>
where
    C: PlatformContext,
    S: MediaSurface,
    R: ResourceReclaimer,
{
    /// Create a session around a not-yet-bound surface.
    pub fn new(context: C, surface: S, reclaimer: R) -> Self {
        Self {
            engine: AudioGraphEngine::new(context),
            surface,
            controller: PlaybackController::new(),
            reclaimer,
            current_handle: None,
            display_name: None,
            rebuild_pending: false,
        }
    }

    /// Load an asset onto the surface.
    ///
    /// On success the previous asset's handle (if any) is revoked exactly
    /// once, observable transport state resets, and a graph rebuild is
    /// scheduled for when the surface reports `MetadataLoaded`. On
    /// failure ([`EngineError::UnsupportedAsset`]) nothing changes: the
    /// previous asset, handle, and graph all stay live, and the rejected
    /// handle remains the caller's to release.
    pub fn load_asset(
        &mut self,
        handle: AssetHandle,
        display_name: impl Into<String>,
    ) -> Result<(), EngineError> {
        if self.engine.state() == EngineState::Closed {
            return Ok(());
        }
        self.surface.set_source(&handle)?;

        // The switch succeeded; from here no event of the old asset will
        // be applied (the surface dropped its queue in set_source).
        if let Some(previous) = self.current_handle.take() {
            debug!(handle = previous.as_str(), "revoking replaced asset");
            self.reclaimer.revoke(previous);
        }
        self.current_handle = Some(handle);
        self.display_name = Some(display_name.into());
        self.controller.reset();

        if !self.engine.is_bound() {
            self.engine.bind_source(self.surface.id())?;
        }

        // Building needs the asset's metadata; defer until the surface
        // reports readiness.
        self.rebuild_pending = true;
        Ok(())
    }

    /// Drain surface notifications into observable state and run any
    /// deferred graph build.
    pub fn pump_events(&mut self) {
        for event in self.surface.poll_events() {
            if matches!(event, SurfaceEvent::MetadataLoaded { .. }) && self.rebuild_pending {
                self.rebuild_pending = false;
                if self.engine.build_graph().is_ok() {
                    // Surface-side parameters are re-applied per asset.
                    self.surface
                        .set_playback_rate(self.engine.parameters().speed_multiplier());
                    self.surface.set_preserves_pitch(true);
                } else {
                    // Already logged by the engine; the previous graph
                    // (if any) keeps serving audio.
                    warn!("asset will play through the previous graph");
                }
            }
            self.controller.apply_event(&event);
        }
    }

    /// Set the playback-speed multiplier (clamped to `[0.5, 2.0]`).
    pub fn set_speed(&mut self, multiplier: f32) {
        self.engine.resume_if_suspended();
        self.engine.set_parameter(Parameter::Speed(multiplier));
        self.surface
            .set_playback_rate(self.engine.parameters().speed_multiplier());
    }

    /// Seek to `seconds`. The session does not reclamp; callers decide
    /// what range is meaningful for their UI.
    pub fn seek(&mut self, seconds: f64) {
        self.engine.resume_if_suspended();
        self.controller.seek(&mut self.surface, seconds);
    }

    /// Set the reverb mix from a percentage in `[0, 100]`.
    pub fn set_reverb_mix_percent(&mut self, percent: f32) {
        self.engine.resume_if_suspended();
        self.engine
            .set_parameter(Parameter::ReverbMix(percent / 100.0));
    }

    /// Set the loudness boost from a percentage in `[0, 300]`.
    pub fn set_boost_percent(&mut self, percent: f32) {
        self.engine.resume_if_suspended();
        self.engine.set_parameter(Parameter::BoostPercent(percent));
    }

    /// Set one equalizer band's gain in dB, clamped to `[-12, 12]`.
    pub fn set_eq_band_gain(&mut self, band: usize, gain_db: f32) {
        self.engine.resume_if_suspended();
        self.engine
            .set_parameter(Parameter::EqBandGain { band, gain_db });
    }

    /// Toggle between playing and paused.
    pub fn toggle_playback(&mut self) -> Result<(), EngineError> {
        self.engine.resume_if_suspended();
        self.controller.toggle(&mut self.surface)
    }

    /// Pull one block of processed audio.
    ///
    /// Frames the surface does not fill (paused, ended, or starved) are
    /// zeroed before processing, so effect tails keep decaying. Returns
    /// the number of frames the surface supplied.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) -> usize {
        let supplied = self.surface.read_samples(left, right);
        left[supplied..].fill(0.0);
        right[supplied..].fill(0.0);
        self.engine.process_block(left, right);
        supplied
    }

    /// Observable player state for a UI.
    pub fn player_state(&self) -> PlayerState {
        PlayerState {
            current_time: self.controller.current_time(),
            duration: self.controller.duration(),
            is_playing: self.controller.is_playing(),
            display_name: self.display_name.clone(),
        }
    }

    /// The engine (parameter store, lifecycle state, live topology).
    pub fn engine(&self) -> &AudioGraphEngine<C> {
        &self.engine
    }

    /// The playback surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Revoke the current asset's handle and close the engine.
    /// Idempotent.
    pub fn close(&mut self) {
        if let Some(handle) = self.current_handle.take() {
            debug!(handle = handle.as_str(), "revoking asset on close");
            self.reclaimer.revoke(handle);
        }
        self.engine.close();
    }
}

//! Media playback surface abstraction.
//!
//! A [`MediaSurface`] is the external playback element: it owns the
//! decoded media, exposes transport state and control, supplies decoded
//! sample frames to the graph, and queues notifications. The engine and
//! session only ever reference a surface; they never own its media.
//!
//! Notifications are a drained queue rather than registered callbacks:
//! [`MediaSurface::poll_events`] hands over everything pending, and the
//! session applies them. Implementations must drop any queued events when
//! a new asset is bound via [`MediaSurface::set_source`], so events from
//! a replaced asset can never leak into the new one's observable state.

use crate::error::EngineError;
use crate::session::AssetHandle;

/// Opaque identity of a playback surface.
///
/// Used to enforce the one-binding-ever rule without the engine taking
/// ownership of the surface.
pub type SurfaceId = u64;

/// A notification queued by a playback surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Playback position advanced.
    TimeUpdate {
        /// Current position in seconds.
        seconds: f64,
    },
    /// The surface finished decoding enough of the asset to know its
    /// duration. Graph-dependent work deferred until readiness runs now.
    MetadataLoaded {
        /// Total asset duration in seconds.
        duration: f64,
    },
    /// Playback reached the end of the asset.
    Ended,
}

/// Capabilities the engine consumes from a playback surface.
pub trait MediaSurface {
    /// Stable identity of this surface.
    fn id(&self) -> SurfaceId;

    /// Bind an asset to the surface.
    ///
    /// Fails with [`EngineError::UnsupportedAsset`] if the surface cannot
    /// decode it; the surface keeps its previous asset in that case.
    /// On success, any events queued for the previous asset are dropped.
    fn set_source(&mut self, asset: &AssetHandle) -> Result<(), EngineError>;

    /// Start playback. May be asynchronous on real platforms and may be
    /// rejected ([`EngineError::TransportRejected`]).
    fn play(&mut self) -> Result<(), EngineError>;

    /// Pause playback.
    fn pause(&mut self);

    /// Whether the surface is currently paused.
    fn paused(&self) -> bool;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Set the playback position in seconds. The caller is responsible
    /// for clamping; the surface applies the value as given.
    fn set_current_time(&mut self, seconds: f64);

    /// Total duration in seconds, once metadata is loaded.
    fn duration(&self) -> Option<f64>;

    /// Set the playback-rate multiplier.
    fn set_playback_rate(&mut self, rate: f32);

    /// Control whether pitch is preserved under rate changes.
    fn set_preserves_pitch(&mut self, preserves: bool);

    /// Pull the next decoded stereo frames into `left`/`right`.
    ///
    /// Returns the number of frames written; the remainder of the slices
    /// is left untouched. A paused or ended surface returns 0.
    fn read_samples(&mut self, left: &mut [f32], right: &mut [f32]) -> usize;

    /// Drain all pending notifications, oldest first.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
}

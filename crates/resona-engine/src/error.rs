//! Error types for engine and session operations.

use thiserror::Error;

/// Errors surfaced by the engine, session, and playback controller.
///
/// Out-of-range parameter values are never errors: they are clamped
/// silently at the [`ParameterStore`](crate::ParameterStore) boundary.
/// Operations on a closed engine are silent no-ops, not errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A second source binding was attempted on an already-bound engine.
    ///
    /// The existing binding and graph are untouched.
    #[error("surface is already bound to this engine")]
    BindingConflict,

    /// A graph operation was requested before any surface was bound.
    #[error("no surface bound")]
    NotBound,

    /// The surface cannot decode the supplied asset.
    ///
    /// The engine stays in its pre-load state; a prior graph remains
    /// usable.
    #[error("surface cannot decode asset: {0}")]
    UnsupportedAsset(String),

    /// The platform context refused to resume (e.g. no user gesture yet).
    ///
    /// Non-fatal; retried on the next user-triggered operation.
    #[error("audio context resume was rejected")]
    ResumeRejected,

    /// An effect unit could not be constructed during a rebuild.
    ///
    /// Fatal to that rebuild only; the prior graph is preserved.
    #[error("node creation failed: {0}")]
    NodeCreation(#[from] resona_effects::EffectError),

    /// The surface refused a transport start (e.g. autoplay policy).
    ///
    /// Observable playback state reflects the surface, not the intent.
    #[error("transport start was rejected by the surface")]
    TransportRejected,
}

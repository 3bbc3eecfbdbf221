//! Platform audio-context abstraction.
//!
//! The engine never talks to an audio device directly. It consumes a
//! [`PlatformContext`]: the sample rate its units are built for, a
//! running/suspended state (platform autoplay policies may suspend a
//! context until a user gesture), and resume/close controls. Node
//! primitives themselves are library types from resona-core; their
//! construction failures surface as
//! [`EngineError::NodeCreation`](crate::EngineError::NodeCreation).

use crate::error::EngineError;

/// Running state of a platform audio context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// The context is processing audio.
    Running,
    /// The context exists but is not processing (e.g. awaiting a user
    /// gesture under an autoplay policy).
    Suspended,
}

/// Capabilities the engine consumes from the host audio platform.
pub trait PlatformContext {
    /// Sample rate of the context in Hz.
    fn sample_rate(&self) -> f32;

    /// Current running state.
    fn state(&self) -> ContextState;

    /// Ask the platform to resume a suspended context.
    ///
    /// May be rejected (`EngineError::ResumeRejected`); the engine treats
    /// rejection as non-fatal and retries on the next user-triggered
    /// operation.
    fn resume(&mut self) -> Result<(), EngineError>;

    /// Release the platform context.
    fn close(&mut self);
}

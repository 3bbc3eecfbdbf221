//! Offline platform context.

use resona_engine::{ContextState, EngineError, PlatformContext};
use tracing::debug;

/// Always-running platform context for offline rendering.
///
/// Desktop file rendering has no autoplay policy, so the context starts
/// in [`ContextState::Running`] and resume is trivially successful.
#[derive(Debug, Clone)]
pub struct NativeContext {
    sample_rate: f32,
    state: ContextState,
}

impl NativeContext {
    /// Create a running context at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            state: ContextState::Running,
        }
    }
}

impl PlatformContext for NativeContext {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.state = ContextState::Running;
        Ok(())
    }

    fn close(&mut self) {
        debug!("native context closed");
    }
}

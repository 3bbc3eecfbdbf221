//! Playback transport mirroring.
//!
//! [`PlaybackController`] mirrors a surface's notifications into
//! observable `{current_time, duration, is_playing}` state and translates
//! user transport intents into surface operations. It never assumes a
//! transport command succeeded: after a toggle, `is_playing` is derived
//! from the surface's observed paused flag, because platform policy can
//! reject a start asynchronously.

use crate::error::EngineError;
use crate::surface::{MediaSurface, SurfaceEvent};

/// Observable transport state mirrored from the bound surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackController {
    current_time: f64,
    duration: f64,
    is_playing: bool,
}

impl PlaybackController {
    /// Create a controller with zeroed observable state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one surface notification into the observable state.
    pub fn apply_event(&mut self, event: &SurfaceEvent) {
        match *event {
            SurfaceEvent::TimeUpdate { seconds } => self.current_time = seconds,
            SurfaceEvent::MetadataLoaded { duration } => self.duration = duration,
            SurfaceEvent::Ended => self.is_playing = false,
        }
    }

    /// Seek the surface to `seconds`.
    ///
    /// The caller is responsible for clamping to `[0, duration]`; the
    /// position is applied as given.
    pub fn seek<S: MediaSurface>(&mut self, surface: &mut S, seconds: f64) {
        surface.set_current_time(seconds);
        self.current_time = seconds;
    }

    /// Toggle between playing and paused.
    ///
    /// Issues the opposite of the surface's current paused state, then
    /// reads the state back: `is_playing` reflects what the surface
    /// reports, not what was requested. A rejected start is returned as
    /// [`EngineError::TransportRejected`].
    pub fn toggle<S: MediaSurface>(&mut self, surface: &mut S) -> Result<(), EngineError> {
        let result = if surface.paused() {
            surface.play()
        } else {
            surface.pause();
            Ok(())
        };

        self.is_playing = !surface.paused();
        result
    }

    /// Drop all observable state, e.g. when the asset is replaced.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Last observed playback position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Last observed asset duration in seconds (0 before metadata).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the surface was last observed playing.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AssetHandle;
    use crate::surface::SurfaceId;

    struct FakeSurface {
        paused: bool,
        allow_play: bool,
        position: f64,
    }

    impl FakeSurface {
        fn new() -> Self {
            Self {
                paused: true,
                allow_play: true,
                position: 0.0,
            }
        }
    }

    impl MediaSurface for FakeSurface {
        fn id(&self) -> SurfaceId {
            1
        }
        fn set_source(&mut self, _asset: &AssetHandle) -> Result<(), EngineError> {
            Ok(())
        }
        fn play(&mut self) -> Result<(), EngineError> {
            if self.allow_play {
                self.paused = false;
                Ok(())
            } else {
                Err(EngineError::TransportRejected)
            }
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn paused(&self) -> bool {
            self.paused
        }
        fn current_time(&self) -> f64 {
            self.position
        }
        fn set_current_time(&mut self, seconds: f64) {
            self.position = seconds;
        }
        fn duration(&self) -> Option<f64> {
            Some(10.0)
        }
        fn set_playback_rate(&mut self, _rate: f32) {}
        fn set_preserves_pitch(&mut self, _preserves: bool) {}
        fn read_samples(&mut self, _left: &mut [f32], _right: &mut [f32]) -> usize {
            0
        }
        fn poll_events(&mut self) -> Vec<SurfaceEvent> {
            Vec::new()
        }
    }

    #[test]
    fn events_mirror_into_state() {
        let mut controller = PlaybackController::new();
        controller.apply_event(&SurfaceEvent::MetadataLoaded { duration: 42.5 });
        controller.apply_event(&SurfaceEvent::TimeUpdate { seconds: 3.25 });

        assert_eq!(controller.duration(), 42.5);
        assert_eq!(controller.current_time(), 3.25);
    }

    #[test]
    fn ended_clears_playing() {
        let mut controller = PlaybackController::new();
        let mut surface = FakeSurface::new();
        controller.toggle(&mut surface).unwrap();
        assert!(controller.is_playing());

        controller.apply_event(&SurfaceEvent::Ended);
        assert!(!controller.is_playing());
    }

    #[test]
    fn toggle_flips_both_ways() {
        let mut controller = PlaybackController::new();
        let mut surface = FakeSurface::new();

        controller.toggle(&mut surface).unwrap();
        assert!(controller.is_playing());
        assert!(!surface.paused());

        controller.toggle(&mut surface).unwrap();
        assert!(!controller.is_playing());
        assert!(surface.paused());
    }

    #[test]
    fn rejected_play_leaves_state_truthful() {
        let mut controller = PlaybackController::new();
        let mut surface = FakeSurface::new();
        surface.allow_play = false;

        let result = controller.toggle(&mut surface);
        assert!(matches!(result, Err(EngineError::TransportRejected)));
        // The surface never started, and the observable state says so.
        assert!(!controller.is_playing());
    }

    #[test]
    fn seek_applies_position_unclamped() {
        let mut controller = PlaybackController::new();
        let mut surface = FakeSurface::new();

        controller.seek(&mut surface, 7.5);
        assert_eq!(surface.current_time(), 7.5);
        assert_eq!(controller.current_time(), 7.5);
    }
}

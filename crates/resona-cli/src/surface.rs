//! File-backed playback surface.
//!
//! [`WavSurface`] implements [`MediaSurface`] over a decoded WAV file:
//! transport flags, a fractional read position for varispeed, and the
//! notification queue the session drains. Decoding happens in
//! `set_source`, but readiness is still delivered through the event
//! queue, so the session's deferred-build flow is identical to a
//! platform that decodes asynchronously.
//!
//! Rate changes are plain varispeed (linear-interpolated reads); the
//! `preserves_pitch` flag is recorded but this surface has no
//! pitch-corrected mode.

use std::collections::VecDeque;

use resona_engine::{AssetHandle, EngineError, MediaSurface, SurfaceEvent, SurfaceId};

use crate::assets::FileLibrary;
use crate::wav::read_wav_stereo;

/// Media seconds between queued `TimeUpdate` notifications.
const TIME_UPDATE_INTERVAL_SECS: f64 = 0.25;

struct Decoded {
    samples: resona_core::StereoBuffer,
    sample_rate: u32,
}

/// A [`MediaSurface`] over decoded WAV data.
pub struct WavSurface {
    id: SurfaceId,
    library: FileLibrary,
    media: Option<Decoded>,
    events: VecDeque<SurfaceEvent>,
    paused: bool,
    ended: bool,
    /// Fractional frame index into the decoded buffer.
    position: f64,
    rate: f32,
    preserves_pitch: bool,
    last_reported_time: f64,
}

impl WavSurface {
    /// Create an unbound surface resolving handles through `library`.
    pub fn new(id: SurfaceId, library: FileLibrary) -> Self {
        Self {
            id,
            library,
            media: None,
            events: VecDeque::new(),
            paused: true,
            ended: false,
            position: 0.0,
            rate: 1.0,
            preserves_pitch: true,
            last_reported_time: 0.0,
        }
    }

    /// Whether pitch preservation was requested (informational only).
    pub fn preserves_pitch(&self) -> bool {
        self.preserves_pitch
    }

    fn media_duration(&self) -> Option<f64> {
        self.media
            .as_ref()
            .map(|m| m.samples.len() as f64 / f64::from(m.sample_rate))
    }
}

impl MediaSurface for WavSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn set_source(&mut self, asset: &AssetHandle) -> Result<(), EngineError> {
        let path = self
            .library
            .resolve(asset)
            .ok_or_else(|| EngineError::UnsupportedAsset(format!("unknown handle {}", asset.as_str())))?;
        let (samples, sample_rate) = read_wav_stereo(&path)
            .map_err(|err| EngineError::UnsupportedAsset(err.to_string()))?;

        // Events of the replaced asset must never reach the new one.
        self.events.clear();
        self.media = Some(Decoded {
            samples,
            sample_rate,
        });
        self.paused = true;
        self.ended = false;
        self.position = 0.0;
        self.last_reported_time = 0.0;

        let duration = self.media_duration().unwrap_or(0.0);
        self.events
            .push_back(SurfaceEvent::MetadataLoaded { duration });
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.media.is_none() {
            return Err(EngineError::TransportRejected);
        }
        if self.ended {
            // Restarting after the end rewinds, like a media element.
            self.position = 0.0;
            self.last_reported_time = 0.0;
            self.ended = false;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.media
            .as_ref()
            .map_or(0.0, |m| self.position / f64::from(m.sample_rate))
    }

    fn set_current_time(&mut self, seconds: f64) {
        let Some(media) = &self.media else { return };
        let frames = media.samples.len() as f64;
        self.position = (seconds * f64::from(media.sample_rate)).clamp(0.0, frames);
        self.last_reported_time = self.position / f64::from(media.sample_rate);
        if self.position < frames {
            self.ended = false;
        }
    }

    fn duration(&self) -> Option<f64> {
        self.media_duration()
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn set_preserves_pitch(&mut self, preserves: bool) {
        self.preserves_pitch = preserves;
    }

    fn read_samples(&mut self, left: &mut [f32], right: &mut [f32]) -> usize {
        let Some(media) = &self.media else { return 0 };
        if self.paused || self.ended {
            return 0;
        }

        let frames = media.samples.len();
        let sample_rate = f64::from(media.sample_rate);
        let mut written = 0;

        for i in 0..left.len() {
            if self.position >= frames as f64 {
                break;
            }
            let idx = self.position as usize;
            let frac = (self.position - idx as f64) as f32;
            let next = (idx + 1).min(frames - 1);

            left[i] = media.samples.left[idx] * (1.0 - frac) + media.samples.left[next] * frac;
            right[i] = media.samples.right[idx] * (1.0 - frac) + media.samples.right[next] * frac;

            self.position += f64::from(self.rate);
            written += 1;

            let media_time = self.position / sample_rate;
            if media_time - self.last_reported_time >= TIME_UPDATE_INTERVAL_SECS {
                self.events.push_back(SurfaceEvent::TimeUpdate {
                    seconds: media_time,
                });
                self.last_reported_time = media_time;
            }
        }

        if self.position >= frames as f64 {
            self.ended = true;
            self.paused = true;
            self.events.push_back(SurfaceEvent::Ended);
        }

        written
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.events.drain(..).collect()
    }
}

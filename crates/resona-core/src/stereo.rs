//! Stereo audio buffer.
//!
//! [`StereoBuffer`] holds a pair of `Vec<f32>` channels and provides the
//! interleave conversions used at the I/O boundary. It is the interchange
//! type for impulse responses and rendered audio throughout resona.

/// A pair of stereo audio buffers (left and right channels).
///
/// Each channel is a `Vec<f32>` of equal length.
#[derive(Debug, Clone, Default)]
pub struct StereoBuffer {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Create a buffer from left and right channels.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len(), "channels must have same length");
        Self { left, right }
    }

    /// Create a silent buffer of `len` frames.
    pub fn silence(len: usize) -> Self {
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
        }
    }

    /// Create a stereo buffer from mono by duplicating the channel.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Convert to interleaved format (L, R, L, R, ...).
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.left.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            interleaved.push(*l);
            interleaved.push(*r);
        }
        interleaved
    }

    /// Create from interleaved format (L, R, L, R, ...).
    ///
    /// A trailing unpaired sample is dropped.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        let len = interleaved.len() / 2;
        let mut left = Vec::with_capacity(len);
        let mut right = Vec::with_capacity(len);

        for chunk in interleaved.chunks_exact(2) {
            left.push(chunk[0]);
            right.push(chunk[1]);
        }

        Self { left, right }
    }
}

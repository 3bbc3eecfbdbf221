//! Uniform partitioned FFT convolution.
//!
//! Convolving audio with a multi-second impulse response (hundreds of
//! thousands of taps) is intractable in the time domain. [`Convolver`]
//! uses uniform partitioned convolution: the impulse response is split
//! into fixed-size partitions, each transformed once up front, and every
//! input block's spectrum is kept in a frequency-domain delay line. Per
//! block the output spectrum is the sum over partitions of
//! `history[now - p] * ir[p]`, inverted with overlap-add.
//!
//! Input is staged sample-by-sample, so callers can process blocks of any
//! length. The staging makes the output lag the input by exactly one
//! partition ([`Convolver::latency_samples`]); on a reverb wet path this
//! reads as a few milliseconds of pre-delay.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::stereo::StereoBuffer;

/// Partition length in samples. FFT blocks are twice this.
const PARTITION_SIZE: usize = 256;

/// Errors from convolver construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvolverError {
    /// The impulse response has no samples.
    EmptyImpulse,
}

impl std::fmt::Display for ConvolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImpulse => write!(f, "impulse response is empty"),
        }
    }
}

impl std::error::Error for ConvolverError {}

/// Per-channel convolution state.
struct ChannelState {
    /// Impulse-response partition spectra, in order.
    ir_spectra: Vec<Vec<Complex<f32>>>,
    /// Ring of past input-block spectra, one slot per partition.
    history: Vec<Vec<Complex<f32>>>,
    /// Slot of the most recently written input spectrum.
    history_pos: usize,
    /// Input samples staged for the current block.
    input_stage: Vec<f32>,
    /// Output samples of the last completed block.
    output_stage: Vec<f32>,
    /// Second half of the last inverse transform, carried into the next block.
    overlap: Vec<f32>,
}

impl ChannelState {
    fn new(partitions: usize) -> Self {
        let fft_size = PARTITION_SIZE * 2;
        Self {
            ir_spectra: Vec::new(),
            history: vec![vec![Complex::new(0.0, 0.0); fft_size]; partitions],
            history_pos: 0,
            input_stage: vec![0.0; PARTITION_SIZE],
            output_stage: vec![0.0; PARTITION_SIZE],
            overlap: vec![0.0; PARTITION_SIZE],
        }
    }

    fn reset(&mut self) {
        for spectrum in &mut self.history {
            spectrum.fill(Complex::new(0.0, 0.0));
        }
        self.history_pos = 0;
        self.input_stage.fill(0.0);
        self.output_stage.fill(0.0);
        self.overlap.fill(0.0);
    }
}

/// Stereo convolution engine with a fixed kernel.
///
/// The kernel is set at construction; resona regenerates the whole
/// convolver when the impulse response changes.
pub struct Convolver {
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    /// Scratch for rustfft's in-place transforms.
    scratch: Vec<Complex<f32>>,
    /// Work buffer for the forward transform of an input block.
    freq: Vec<Complex<f32>>,
    /// Accumulator for the summed output spectrum.
    accum: Vec<Complex<f32>>,
    left: ChannelState,
    right: ChannelState,
    /// Position within the current staging block, shared by both channels.
    stage_pos: usize,
}

impl Convolver {
    /// Build a convolver for the given stereo impulse response.
    pub fn new(impulse: &StereoBuffer) -> Result<Self, ConvolverError> {
        if impulse.is_empty() {
            return Err(ConvolverError::EmptyImpulse);
        }

        let fft_size = PARTITION_SIZE * 2;
        let partitions = impulse.len().div_ceil(PARTITION_SIZE);

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());

        let mut convolver = Self {
            fft,
            ifft,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            freq: vec![Complex::new(0.0, 0.0); fft_size],
            accum: vec![Complex::new(0.0, 0.0); fft_size],
            left: ChannelState::new(partitions),
            right: ChannelState::new(partitions),
            stage_pos: 0,
        };

        convolver.left.ir_spectra = convolver.partition_ir(&impulse.left, partitions);
        convolver.right.ir_spectra = convolver.partition_ir(&impulse.right, partitions);

        Ok(convolver)
    }

    /// Transform one channel of the impulse response into partition spectra.
    fn partition_ir(&mut self, ir: &[f32], partitions: usize) -> Vec<Vec<Complex<f32>>> {
        let fft_size = PARTITION_SIZE * 2;
        let mut spectra = Vec::with_capacity(partitions);

        for p in 0..partitions {
            let start = p * PARTITION_SIZE;
            let end = (start + PARTITION_SIZE).min(ir.len());

            let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];
            for (slot, &sample) in buffer.iter_mut().zip(&ir[start..end]) {
                *slot = Complex::new(sample, 0.0);
            }
            self.fft.process_with_scratch(&mut buffer, &mut self.scratch);
            spectra.push(buffer);
        }

        spectra
    }

    /// Number of samples the output lags the input.
    pub fn latency_samples(&self) -> usize {
        PARTITION_SIZE
    }

    /// Clear all streaming state, keeping the kernel.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.stage_pos = 0;
    }

    /// Process one stereo frame, returning the convolved frame.
    ///
    /// The returned frame corresponds to the input one partition earlier.
    #[inline]
    pub fn process(&mut self, left_in: f32, right_in: f32) -> (f32, f32) {
        let out = (
            self.left.output_stage[self.stage_pos],
            self.right.output_stage[self.stage_pos],
        );

        self.left.input_stage[self.stage_pos] = left_in;
        self.right.input_stage[self.stage_pos] = right_in;
        self.stage_pos += 1;

        if self.stage_pos == PARTITION_SIZE {
            self.process_partition(true);
            self.process_partition(false);
            self.stage_pos = 0;
        }

        out
    }

    /// Process a block of stereo frames into the output slices.
    pub fn process_block(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        debug_assert_eq!(left_in.len(), right_in.len());
        debug_assert!(left_out.len() >= left_in.len());

        for i in 0..left_in.len() {
            let (l, r) = self.process(left_in[i], right_in[i]);
            left_out[i] = l;
            right_out[i] = r;
        }
    }

    /// Run the staged block of one channel through the partition sum.
    fn process_partition(&mut self, is_left: bool) {
        let fft_size = PARTITION_SIZE * 2;
        let Self {
            fft,
            ifft,
            scratch,
            freq,
            accum,
            left,
            right,
            ..
        } = self;
        let channel = if is_left { left } else { right };

        // Forward-transform the staged input block (zero-padded to 2P).
        freq.fill(Complex::new(0.0, 0.0));
        for (slot, &sample) in freq.iter_mut().zip(&channel.input_stage) {
            *slot = Complex::new(sample, 0.0);
        }
        fft.process_with_scratch(freq, scratch);

        // Push into the frequency-domain delay line.
        let partitions = channel.history.len();
        channel.history_pos = (channel.history_pos + 1) % partitions;
        channel.history[channel.history_pos].copy_from_slice(freq);

        // Output spectrum: sum of history[now - p] * ir[p].
        accum.fill(Complex::new(0.0, 0.0));
        for (p, ir_spectrum) in channel.ir_spectra.iter().enumerate() {
            let slot = (channel.history_pos + partitions - p) % partitions;
            let input_spectrum = &channel.history[slot];
            for i in 0..fft_size {
                accum[i] += input_spectrum[i] * ir_spectrum[i];
            }
        }

        ifft.process_with_scratch(accum, scratch);

        // Overlap-add: first half becomes output, second half carries over.
        let scale = 1.0 / fft_size as f32;
        for i in 0..PARTITION_SIZE {
            channel.output_stage[i] = accum[i].re * scale + channel.overlap[i];
            channel.overlap[i] = accum[PARTITION_SIZE + i].re * scale;
        }
    }
}

impl std::fmt::Debug for Convolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Convolver")
            .field("partition_size", &PARTITION_SIZE)
            .field("partitions", &self.left.ir_spectra.len())
            .finish()
    }
}

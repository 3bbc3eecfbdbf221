//! Resona Core - DSP primitives for the resona effects player
//!
//! This crate provides the low-level building blocks the effects graph is
//! assembled from:
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ peaking-EQ coefficients
//! - [`Convolver`] - Uniform partitioned FFT convolution for long impulse
//!   responses
//! - [`impulse`] - Procedural impulse-response synthesis (decaying noise)
//! - [`SmoothedParam`] - Exponential parameter smoothing for zipper-free
//!   gain changes
//! - [`StereoBuffer`] - Paired left/right sample buffers
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//!
//! # Example
//!
//! ```rust,ignore
//! use resona_core::{Convolver, StereoBuffer, impulse};
//!
//! let ir = impulse::synthesize(&mut rand::thread_rng(), 48_000.0, 5.0, 5.0);
//! let mut convolver = Convolver::new(&ir)?;
//! let (wet_l, wet_r) = convolver.process(dry_l, dry_r);
//! ```

pub mod biquad;
pub mod convolver;
pub mod impulse;
pub mod math;
pub mod param;
pub mod stereo;

pub use biquad::{Biquad, peaking_coefficients};
pub use convolver::{Convolver, ConvolverError};
pub use math::{db_to_linear, linear_to_db};
pub use param::SmoothedParam;
pub use stereo::StereoBuffer;

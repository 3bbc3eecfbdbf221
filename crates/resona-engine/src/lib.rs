//! Resona Engine - the audio effects graph engine
//!
//! This crate is the core of resona: it builds and rewires the
//! per-asset signal-processing topology, keeps effect parameters
//! consistent across rebuilds and asynchronous platform events, and
//! mirrors transport state into observable values.
//!
//! # Pieces
//!
//! - [`AudioGraphEngine`] - topology lifecycle and parameter routing
//! - [`ParameterStore`] / [`Parameter`] - clamped parameter state that
//!   survives every rebuild
//! - [`PlaybackController`] - transport mirroring and intents
//! - [`AudioSession`] - one surface + one engine + asset lifecycle
//! - [`PlatformContext`] / [`MediaSurface`] - the seams to the host
//!   platform; implement them to run the engine anywhere
//!
//! # Example
//!
//! ```rust,ignore
//! use resona_engine::{AudioSession, AssetHandle};
//!
//! let mut session = AudioSession::new(context, surface, reclaimer);
//! session.load_asset(AssetHandle::new("asset-1"), "my song")?;
//! session.pump_events(); // builds the graph once metadata arrives
//! session.set_reverb_mix_percent(40.0);
//! session.toggle_playback()?;
//! session.render(&mut left, &mut right);
//! ```

pub mod controller;
pub mod error;
pub mod graph;
pub mod params;
pub mod platform;
pub mod session;
pub mod surface;

pub use controller::PlaybackController;
pub use error::EngineError;
pub use graph::{AudioGraphEngine, EngineState, GraphTopology};
pub use params::{Parameter, ParameterStore, SPEED_MAX, SPEED_MIN};
pub use platform::{ContextState, PlatformContext};
pub use session::{AssetHandle, AudioSession, PlayerState, ResourceReclaimer};
pub use surface::{MediaSurface, SurfaceEvent, SurfaceId};

//! The audio effects graph engine.
//!
//! [`AudioGraphEngine`] owns the live processing topology and its
//! lifecycle: bind a playback surface (once, ever), build the topology per
//! loaded asset, route parameter updates to the live units, and tear
//! everything down on close.
//!
//! # Topology
//!
//! Every build produces the same fixed wiring:
//!
//! ```text
//! source → band0 → … → band5 ─┬─ dry ──────────┬→ boost → output
//!                             └─ convolver → wet ┘
//! ```
//!
//! The dry/wet split and both gains live inside [`ReverbUnit`]; the
//! engine wires units in series and pulls blocks through them.
//!
//! # Rebuild discipline
//!
//! A rebuild constructs every unit into locals, applies the parameter
//! store to them, and only then swaps them in as the live topology. A
//! construction failure therefore aborts the rebuild with the previous
//! topology untouched; a failed rebuild can never leave a half-wired
//! graph producing silence or doubled audio. Because every operation
//! takes `&mut self`, a parameter update lands strictly before or
//! strictly after a rebuild, never inside one.

use rand::thread_rng;
use tracing::{debug, error, warn};

use resona_core::impulse;
use resona_effects::{EqualizerBank, GainStage, ReverbUnit};

use crate::error::EngineError;
use crate::params::{Parameter, ParameterStore};
use crate::platform::{ContextState, PlatformContext};
use crate::surface::SurfaceId;

/// Lifecycle state of an [`AudioGraphEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No surface bound yet.
    Uninitialized,
    /// Surface bound, no topology built yet.
    Bound,
    /// A live topology exists.
    GraphBuilt,
    /// Terminal: every node released, context closed.
    Closed,
}

/// The live processing units of one built graph.
///
/// Owned exclusively by the engine; rebuilt wholesale on asset change and
/// never partially mutated except for parameter pushes.
#[derive(Debug)]
pub struct GraphTopology {
    equalizer: EqualizerBank,
    reverb: ReverbUnit,
    boost: GainStage,
}

impl GraphTopology {
    /// Construct all units for `sample_rate`, pre-loaded with `params`.
    fn build(sample_rate: f32, params: &ParameterStore) -> Result<Self, EngineError> {
        // The reverb kernel is regenerated on every build, never cached.
        let kernel = impulse::synthesize(
            &mut thread_rng(),
            sample_rate,
            impulse::DEFAULT_DURATION_SECS,
            impulse::DEFAULT_DECAY_EXPONENT,
        );

        let mut equalizer = EqualizerBank::new(sample_rate)?;
        for (band, gain_db) in params.eq_band_gains().into_iter().enumerate() {
            if gain_db != 0.0 {
                equalizer.set_band_gain(band, gain_db);
            }
        }

        let reverb = ReverbUnit::new(sample_rate, &kernel, params.reverb_mix())?;
        let boost = GainStage::new(sample_rate, params.boost_percent());

        Ok(Self {
            equalizer,
            reverb,
            boost,
        })
    }

    /// Pull one stereo block through the chain in place.
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.equalizer.process_block(left, right);
        self.reverb.process_block(left, right);
        self.boost.process_block(left, right);
    }

    /// The equalizer unit.
    pub fn equalizer(&self) -> &EqualizerBank {
        &self.equalizer
    }

    /// The reverb unit.
    pub fn reverb(&self) -> &ReverbUnit {
        &self.reverb
    }

    /// The boost unit.
    pub fn boost(&self) -> &GainStage {
        &self.boost
    }
}

/// Owns the platform context, the parameter store, and the live topology.
///
/// See the [module documentation](self) for lifecycle and rebuild rules.
pub struct AudioGraphEngine<C: PlatformContext> {
    context: C,
    params: ParameterStore,
    state: EngineState,
    bound_surface: Option<SurfaceId>,
    topology: Option<GraphTopology>,
}

impl<C: PlatformContext> AudioGraphEngine<C> {
    /// Create an engine around a platform context.
    ///
    /// The parameter store starts at its defaults and lives until
    /// [`close`](Self::close).
    pub fn new(context: C) -> Self {
        Self {
            context,
            params: ParameterStore::default(),
            state: EngineState::Uninitialized,
            bound_surface: None,
            topology: None,
        }
    }

    /// Record the one-and-only source binding for this engine.
    ///
    /// A second call is rejected with [`EngineError::BindingConflict`];
    /// the existing binding and any live topology are untouched.
    pub fn bind_source(&mut self, surface: SurfaceId) -> Result<(), EngineError> {
        if self.state == EngineState::Closed {
            return Ok(());
        }
        if self.bound_surface.is_some() {
            return Err(EngineError::BindingConflict);
        }

        self.bound_surface = Some(surface);
        self.state = EngineState::Bound;
        debug!(surface, "source bound");
        Ok(())
    }

    /// Tear down the previous topology and build a fresh one.
    ///
    /// Re-applies every value in the parameter store, so parameters
    /// persist across asset changes. On failure the previous topology
    /// (if any) stays live and the error is logged and returned.
    pub fn build_graph(&mut self) -> Result<(), EngineError> {
        if self.state == EngineState::Closed {
            return Ok(());
        }
        if self.bound_surface.is_none() {
            return Err(EngineError::NotBound);
        }

        // Platform contexts may start suspended under an autoplay policy;
        // a build is user-triggered, so this is a resume point.
        self.resume_if_suspended();

        let sample_rate = self.context.sample_rate();
        match GraphTopology::build(sample_rate, &self.params) {
            Ok(topology) => {
                self.topology = Some(topology);
                self.state = EngineState::GraphBuilt;
                debug!(sample_rate, "graph built");
                Ok(())
            }
            Err(err) => {
                error!(sample_rate, error = %err, "graph rebuild failed; keeping previous graph");
                Err(err)
            }
        }
    }

    /// Clamp, store, and (if a graph is live) push a parameter update.
    ///
    /// With no graph built yet the value is only cached; the next build
    /// applies it. After close this is a silent no-op.
    pub fn set_parameter(&mut self, parameter: Parameter) {
        if self.state == EngineState::Closed {
            return;
        }
        let Some(applied) = self.params.apply(parameter) else {
            return;
        };

        if let Some(topology) = &mut self.topology {
            match applied {
                Parameter::ReverbMix(mix) => topology.reverb.set_mix(mix),
                Parameter::BoostPercent(percent) => topology.boost.set_boost_percent(percent),
                Parameter::EqBandGain { band, gain_db } => {
                    topology.equalizer.set_band_gain(band, gain_db);
                }
                // Speed is a surface property; the session pushes it to
                // the playback surface, not to a graph unit.
                Parameter::Speed(_) => {}
            }
        }
    }

    /// Resume the platform context if it reports suspended.
    ///
    /// Rejection is non-fatal: it is logged and retried the next time a
    /// user-triggered operation calls this.
    pub fn resume_if_suspended(&mut self) {
        if self.state == EngineState::Closed {
            return;
        }
        if self.context.state() == ContextState::Suspended
            && let Err(err) = self.context.resume()
        {
            warn!(error = %err, "context resume rejected; will retry on next user operation");
        }
    }

    /// Release the topology and the platform context. Idempotent; every
    /// operation after this is a no-op.
    pub fn close(&mut self) {
        if self.state == EngineState::Closed {
            return;
        }
        self.topology = None;
        self.context.close();
        self.state = EngineState::Closed;
        debug!("engine closed");
    }

    /// Pull a stereo block through the live topology in place.
    ///
    /// With no topology the block passes through untouched (the surface
    /// plays unprocessed, as an unwrapped media element would). After
    /// close the block is silenced.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        match self.state {
            EngineState::Closed => {
                left.fill(0.0);
                right.fill(0.0);
            }
            _ => {
                if let Some(topology) = &mut self.topology {
                    topology.process_block(left, right);
                }
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The parameter store (also the source of displayed values).
    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    /// The live topology, if one is built.
    pub fn topology(&self) -> Option<&GraphTopology> {
        self.topology.as_ref()
    }

    /// Whether a surface has been bound.
    pub fn is_bound(&self) -> bool {
        self.bound_surface.is_some()
    }

    /// Whether a live topology exists.
    pub fn has_graph(&self) -> bool {
        self.topology.is_some()
    }
}

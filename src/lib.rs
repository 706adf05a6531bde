//! Melee arena core library.
//!
//! This crate implements the combat simulation environment used to train
//! and evaluate a melee NPC policy: a controlled monster versus a
//! scripted target bot in a square 2D arena. The binary (`src/main.rs`)
//! is just a thin evaluation harness around these components; the
//! policy-optimization side (PPO or similar) lives outside the crate and
//! only ever sees observation vectors and discrete action indices.
//!
//! # Components
//!
//! - **MeleeEnv** (`env`): Gym-style environment with `reset(seed)` and
//!   `step(action)`; owns all simulation state and a per-instance RNG.
//! - **VecEnv** (`env`): N independent environments for batched rollouts.
//! - **Observation** (`observation`): fixed 16-float policy-input vector
//!   with stable index assignments.
//! - **RewardComponents** (`reward`): attributable per-step reward
//!   breakdown; the scalar reward is always the sum of the parts.
//! - **Policy** (`policy`): trait plus scripted baselines (FSM, random).
//! - **run_episode** (`runner`): single-episode rollout driver with
//!   pluggable step sinks (`logging`).
//!
//! All transitions are deterministic given the reset seed; parallel
//! instances share nothing.

pub mod config;
pub mod env;
pub mod logging;
pub mod observation;
pub mod policy;
pub mod reward;
pub mod runner;
pub mod state;
pub mod types;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{CombatTuning, EnvConfig};
pub use env::{MeleeEnv, StepInfo, StepResult, VecEnv};
pub use logging::{EventSink, JsonlSink, NoopSink};
pub use observation::{Observation, OBS_DIM};
pub use policy::{FsmPolicy, Policy, RandomPolicy};
pub use reward::RewardComponents;
pub use runner::{run_episode, EpisodeConfig, EpisodeSummary, TerminationReason};
pub use state::{MonsterState, TargetState};
pub use types::{Action, InvalidAction, Vec2, ACTION_COUNT};

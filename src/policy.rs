// src/policy.rs
//
// Policy trait and scripted implementations.
//
// A learned policy lives outside this crate; it consumes the observation
// vector and produces a discrete action index. The scripted policies here
// exist for evaluation baselines and as the behavior the environment's
// reward schedule was shaped around.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::observation::Observation;
use crate::types::Action;

/// Maps observations to discrete actions.
pub trait Policy {
    /// Stable version string for logs and run summaries.
    fn version(&self) -> &str;

    /// Choose the next action for the given observation.
    fn act(&mut self, obs: &Observation) -> Action;
}

/// Deterministic finite-state baseline.
///
/// Decision ladder, first match wins:
/// 1. Low health -> Return
/// 2. Target in attack range -> Attack
/// 3. Target present -> Chase
/// 4. Otherwise -> Patrol
#[derive(Debug, Default, Clone, Copy)]
pub struct FsmPolicy;

impl FsmPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for FsmPolicy {
    fn version(&self) -> &str {
        "fsm-v1"
    }

    fn act(&mut self, obs: &Observation) -> Action {
        if obs.low_hp() {
            Action::Return
        } else if obs.has_target() && obs.in_attack_range() {
            Action::Attack
        } else if obs.has_target() {
            Action::Chase
        } else {
            Action::Patrol
        }
    }
}

/// Uniform random policy with its own seeded RNG.
///
/// Owns its generator so parallel rollouts stay isolated, same as the
/// environment itself.
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn version(&self) -> &str {
        "random-v1"
    }

    fn act(&mut self, _obs: &Observation) -> Action {
        let i = self.rng.gen_range(0..Action::ALL.len());
        Action::ALL[i]
    }
}

// src/config.rs
//
// Central configuration for the melee arena environment.
//
// EnvConfig carries the per-episode knobs (time step, length, seeding,
// forced combat for evaluation). CombatTuning is the fixed set of combat
// constants; it is baked into the environment at construction and the
// defaults are the canonical values the trained policies depend on.

use serde::{Deserialize, Serialize};

/// Environment-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Simulated seconds per step.
    pub dt: f64,
    /// Steps before the episode is truncated.
    pub max_steps: u32,
    /// Seed for the environment's own RNG. `None` means seed 0; `reset`
    /// can reseed per episode.
    pub seed: Option<u64>,
    /// Spawn a target every episode (evaluation mode). When false the
    /// target is present with `CombatTuning::target_presence_prob`.
    pub force_combat: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            dt: 0.3,
            max_steps: 240,
            seed: None,
            force_combat: false,
        }
    }
}

impl EnvConfig {
    /// Config for deterministic evaluation: a target is always present.
    pub fn evaluation() -> Self {
        Self {
            force_combat: true,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}

/// Fixed combat tuning constants.
///
/// These values shape the whole training signal; change them and every
/// previously trained policy is invalidated. They are not overridable
/// from the CLI for that reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatTuning {
    /// Arena half-width; positions are clamped to `[-world_half, world_half]`
    /// on both axes.
    pub world_half: f64,
    /// Sight radius used to normalise the observed target distance.
    pub sight: f64,
    /// Max health for both entities.
    pub max_hp: f64,

    // ----- Monster (controlled agent) -----
    /// Base movement speed (units/second).
    pub monster_speed: f64,
    /// Patrol speed as a fraction of base speed.
    pub patrol_mul: f64,
    /// Chase speed as a fraction of base speed.
    pub chase_mul: f64,
    /// Flee (Return) speed as a fraction of base speed.
    pub flee_mul: f64,
    /// Melee reach for a successful attack.
    pub attack_range: f64,
    /// Soft positioning band: attacking inside this range earns a small
    /// bonus even when the swing itself misses.
    pub keep_attack_range: f64,
    /// Damage per successful attack.
    pub attack_damage: f64,
    /// Seconds between attacks.
    pub attack_cd_base: f64,
    /// Health ratio at or below which the monster counts as low-health.
    pub low_hp_ratio: f64,

    // ----- Target bot (scripted opponent) -----
    /// Target movement speed (units/second).
    pub target_speed: f64,
    /// Target melee reach.
    pub target_attack_range: f64,
    /// Damage per target attack.
    pub target_damage: f64,
    /// Seconds between target attacks.
    pub target_attack_cd_base: f64,
    /// Below this separation the target presses in on the monster.
    pub target_flee_dist: f64,
    /// Beyond this separation the target breaks away.
    pub target_chase_dist: f64,

    // ----- Spawning -----
    /// Spawn positions are drawn uniformly from `[-spawn_half, spawn_half]^2`.
    pub spawn_half: f64,
    /// Minimum spawn separation; closer target spawns are pushed by
    /// `spawn_push_x` on the x axis (best effort, not re-validated).
    pub spawn_separation: f64,
    pub spawn_push_x: f64,
    /// Probability a target is present when combat is not forced.
    pub target_presence_prob: f64,
    /// Patrol leg duration range (seconds).
    pub patrol_duration_min: f64,
    pub patrol_duration_max: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            world_half: 14.0,
            sight: 11.0,
            max_hp: 100.0,

            monster_speed: 5.0,
            patrol_mul: 0.50,
            chase_mul: 1.10,
            flee_mul: 0.70,
            attack_range: 1.3,
            keep_attack_range: 1.8,
            attack_damage: 10.0,
            attack_cd_base: 0.9,
            low_hp_ratio: 0.25,

            target_speed: 5.0,
            target_attack_range: 1.2,
            target_damage: 6.0,
            target_attack_cd_base: 1.0,
            target_flee_dist: 1.4,
            target_chase_dist: 7.0,

            spawn_half: 4.0,
            spawn_separation: 2.0,
            spawn_push_x: 2.5,
            target_presence_prob: 0.65,
            patrol_duration_min: 1.5,
            patrol_duration_max: 3.5,
        }
    }
}

impl CombatTuning {
    /// Effective patrol speed (units/second).
    pub fn patrol_speed(&self) -> f64 {
        self.monster_speed * self.patrol_mul
    }

    /// Effective chase speed (units/second).
    pub fn chase_speed(&self) -> f64 {
        self.monster_speed * self.chase_mul
    }

    /// Effective flee speed (units/second).
    pub fn flee_speed(&self) -> f64 {
        self.monster_speed * self.flee_mul
    }
}

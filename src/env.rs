// src/env.rs
//
// Gym-style melee combat environment.
//
// - MeleeEnv: single environment with reset(seed) and step(action)
// - VecEnv: N independent instances stepped in lockstep
//
// All state transitions are deterministic given the seed. The environment
// owns its RNG; nothing here touches a process-wide generator, so parallel
// instances stay fully isolated.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{CombatTuning, EnvConfig};
use crate::observation::Observation;
use crate::reward::{weights, RewardComponents};
use crate::state::{MonsterState, TargetState};
use crate::types::{Action, Vec2};

/// Result of a single environment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Observation after the transition.
    pub observation: Observation,
    /// Scalar reward (sum of `reward_components`).
    pub reward: f64,
    /// Episode ended by a win/loss condition.
    pub terminated: bool,
    /// Episode ended by the step limit. Independent of `terminated`.
    pub truncated: bool,
    /// Attributable reward breakdown for this step.
    pub reward_components: RewardComponents,
    /// Step diagnostics.
    pub info: StepInfo,
}

/// Diagnostic information returned from a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Whether a target is present this episode.
    pub has_target: bool,
    /// Damage dealt to the target this step.
    pub dealt: f64,
    /// Damage taken from the target this step.
    pub taken: f64,
    /// Monster health after the step.
    pub monster_hp: f64,
    /// Target health after the step (0 for the whole episode when absent).
    pub target_hp: f64,
    /// Low-health flag as sampled at the start of the step, matching the
    /// snapshot the reward schedule used.
    pub low_hp: bool,
}

/// Gym-style melee combat environment.
///
/// One controlled monster versus one scripted target bot in a square
/// arena. The driver calls `reset`, then `step` with one of the five
/// discrete actions until `terminated` or `truncated`.
pub struct MeleeEnv {
    cfg: EnvConfig,
    tuning: CombatTuning,
    rng: ChaCha8Rng,
    monster: MonsterState,
    target: TargetState,
    step_count: u32,
    seed: u64,
    done: bool,
}

impl MeleeEnv {
    /// Create a new environment. Call `reset` before the first `step`.
    pub fn new(cfg: EnvConfig) -> Self {
        let seed = cfg.seed.unwrap_or(0);
        let tuning = CombatTuning::default();
        let monster = MonsterState::spawned(Vec2::ZERO, Vec2::new(1.0, 0.0), &tuning);
        Self {
            cfg,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            monster,
            target: TargetState::absent(),
            step_count: 0,
            seed,
            done: false,
        }
    }

    /// Reset the environment with an optional seed.
    ///
    /// The RNG is always reseeded: from the given seed, or from a seed
    /// drawn off the current stream, so `seed()` always reports the value
    /// that reproduces the episode. Returns the initial observation.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        let seed = seed.unwrap_or_else(|| self.rng.gen());
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        self.step_count = 0;
        self.done = false;

        let monster_pos = self.sample_spawn();
        let active = self.cfg.force_combat
            || self.rng.gen_bool(self.tuning.target_presence_prob);

        self.target = if active {
            let mut pos = self.sample_spawn();
            // Best-effort separation only; the push is not re-validated.
            if pos.distance(monster_pos) < self.tuning.spawn_separation {
                pos = pos + Vec2::new(self.tuning.spawn_push_x, 0.0);
            }
            TargetState::spawned(pos, &self.tuning)
        } else {
            TargetState::absent()
        };

        let patrol_dir = self.random_unit_dir();
        self.monster = MonsterState::spawned(monster_pos, patrol_dir, &self.tuning);

        Observation::from_state(&self.monster, &self.target, &self.tuning)
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self, action: Action) -> StepResult {
        let dt = self.cfg.dt;

        // 1) Book-keeping: step counter, last action, cooldowns.
        self.step_count += 1;
        self.monster.last_action = action;
        self.monster.attack_cd = (self.monster.attack_cd - dt).max(0.0);
        self.target.attack_cd = (self.target.attack_cd - dt).max(0.0);

        // 2) Pre-move snapshots used by the reward schedule.
        let has_target = self.target.active;
        let low_hp = self.monster.low_hp(&self.tuning);
        let prev_dist = if has_target { self.distance() } else { 0.0 };

        // 3) Monster movement.
        match action {
            Action::Idle | Action::Attack => {}
            Action::Patrol => {
                if self.monster.patrol_timer <= 0.0 {
                    self.monster.patrol_timer = self.rng.gen_range(
                        self.tuning.patrol_duration_min..self.tuning.patrol_duration_max,
                    );
                    self.monster.patrol_dir = self.random_unit_dir();
                } else {
                    self.monster.patrol_timer = (self.monster.patrol_timer - dt).max(0.0);
                }
                self.monster.pos =
                    self.monster.pos + self.monster.patrol_dir * (self.tuning.patrol_speed() * dt);
            }
            Action::Chase => {
                if has_target {
                    let (dir, _) = self.monster.pos.direction_to(self.target.pos);
                    self.monster.pos =
                        self.monster.pos + dir * (self.tuning.chase_speed() * dt);
                }
            }
            Action::Return => {
                if has_target {
                    let (dir, _) = self.monster.pos.direction_to(self.target.pos);
                    self.monster.pos =
                        self.monster.pos - dir * (self.tuning.flee_speed() * dt);
                }
            }
        }
        self.monster.pos = self.monster.pos.clamp_abs(self.tuning.world_half);

        // 4) Target move and attack resolution. Nothing runs for an
        //    absent target; its health stays pinned at zero.
        let mut dealt = 0.0;
        let mut taken = 0.0;
        if has_target {
            self.move_target_bot();
            dealt = self.resolve_monster_attack(action);
            taken = self.resolve_target_attack();
        }

        // 5) Reward schedule, in fixed order.
        let mut c = RewardComponents {
            damage_dealt: weights::DEALT * dealt,
            damage_taken: -weights::TAKEN * taken,
            time_penalty: -weights::STEP,
            ..RewardComponents::default()
        };
        if has_target && action == Action::Idle {
            c.idle_with_target = -weights::IDLE_WITH_TARGET;
        }
        if !has_target {
            c.no_target_conduct = match action {
                Action::Patrol | Action::Idle => weights::NO_TARGET_GOOD,
                _ => -weights::NO_TARGET_BAD,
            };
        }
        if low_hp {
            c.low_hp_conduct = if action == Action::Return {
                weights::LOW_HP_RETREAT
            } else {
                -weights::LOW_HP_OTHER
            };
        }
        if has_target && low_hp && action == Action::Return {
            c.retreat_progress = weights::RETREAT_PROGRESS * (self.distance() - prev_dist);
        }
        if has_target && action == Action::Attack {
            c.attack_positioning = if self.distance() <= self.tuning.keep_attack_range {
                weights::KEEP_RANGE_BONUS
            } else {
                -weights::KEEP_RANGE_MISS
            };
        }

        // 6) Termination and truncation. Monster death wins the tie when
        //    both health values hit zero on the same step.
        let mut terminated = false;
        if self.monster.hp <= 0.0 {
            terminated = true;
            c.terminal = -weights::LOSS;
        } else if has_target && self.target.hp <= 0.0 {
            terminated = true;
            c.terminal = weights::WIN;
        }
        let truncated = self.step_count >= self.cfg.max_steps;
        // Latches until the next reset; stepping past a finished episode
        // keeps simulating but the episode stays finished.
        self.done = self.done || terminated || truncated;

        let observation = Observation::from_state(&self.monster, &self.target, &self.tuning);
        StepResult {
            observation,
            reward: c.total(),
            terminated,
            truncated,
            reward_components: c,
            info: StepInfo {
                has_target,
                dealt,
                taken,
                monster_hp: self.monster.hp,
                target_hp: self.target.hp,
                low_hp,
            },
        }
    }

    // ----- Accessors -----

    pub fn config(&self) -> &EnvConfig {
        &self.cfg
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn monster(&self) -> &MonsterState {
        &self.monster
    }

    pub fn target(&self) -> &TargetState {
        &self.target
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Seed that reproduces the current episode.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the current episode has finished (terminated or truncated
    /// on any step since the last reset).
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Monster-to-target distance (meaningless while the target is absent).
    pub fn distance(&self) -> f64 {
        self.monster.pos.distance(self.target.pos)
    }

    // ----- Internals -----

    fn sample_spawn(&mut self) -> Vec2 {
        let half = self.tuning.spawn_half;
        Vec2::new(
            self.rng.gen_range(-half..half),
            self.rng.gen_range(-half..half),
        )
    }

    fn random_unit_dir(&mut self) -> Vec2 {
        let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
        Vec2::from_angle(angle)
    }

    /// Scripted target behavior: press in on the monster at point-blank
    /// range, break away beyond the chase distance, hold position in
    /// between. The point-blank branch closing distance is what forces
    /// melee exchanges to actually resolve.
    fn move_target_bot(&mut self) {
        let (dir, dist) = self.monster.pos.direction_to(self.target.pos);
        let step = self.tuning.target_speed * self.cfg.dt;
        if dist < self.tuning.target_flee_dist {
            self.target.pos = self.target.pos - dir * step;
        } else if dist > self.tuning.target_chase_dist {
            self.target.pos = self.target.pos + dir * step;
        }
        self.target.pos = self.target.pos.clamp_abs(self.tuning.world_half);
    }

    /// Resolve the monster's attack. Damage lands only when the action is
    /// Attack, the cooldown has elapsed, and the target is in reach; the
    /// cooldown resets only on a successful swing.
    fn resolve_monster_attack(&mut self, action: Action) -> f64 {
        let mut dealt = 0.0;
        if action == Action::Attack
            && self.monster.attack_cd <= 0.0
            && self.distance() <= self.tuning.attack_range
        {
            self.monster.attack_cd = self.tuning.attack_cd_base;
            self.target.hp -= self.tuning.attack_damage;
            dealt = self.tuning.attack_damage;
        }
        self.target.hp = self.target.hp.max(0.0);
        dealt
    }

    /// Resolve the target bot's attack; it swings whenever ready and in reach.
    fn resolve_target_attack(&mut self) -> f64 {
        let mut taken = 0.0;
        if self.target.attack_cd <= 0.0 && self.distance() <= self.tuning.target_attack_range {
            self.target.attack_cd = self.tuning.target_attack_cd_base;
            self.monster.hp -= self.tuning.target_damage;
            taken = self.tuning.target_damage;
        }
        self.monster.hp = self.monster.hp.max(0.0);
        taken
    }
}

/// Vectorised environment: N independent `MeleeEnv` instances.
///
/// Purely sequential orchestration for rollout drivers; each instance
/// keeps its own RNG and state.
pub struct VecEnv {
    envs: Vec<MeleeEnv>,
}

impl VecEnv {
    /// Create `n` environments sharing the same configuration.
    pub fn new(n: usize, cfg: EnvConfig) -> Self {
        let envs = (0..n).map(|_| MeleeEnv::new(cfg.clone())).collect();
        Self { envs }
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Reset all environments with optional per-environment seeds.
    ///
    /// Environments without a corresponding seed entry draw their own.
    pub fn reset_all(&mut self, seeds: Option<&[u64]>) -> Vec<Observation> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, env)| env.reset(seeds.and_then(|s| s.get(i).copied())))
            .collect()
    }

    /// Step all environments with the given actions.
    ///
    /// Panics if `actions.len()` differs from the number of environments.
    pub fn step(&mut self, actions: &[Action]) -> Vec<StepResult> {
        assert_eq!(
            actions.len(),
            self.envs.len(),
            "actions length must match number of environments"
        );
        self.envs
            .iter_mut()
            .zip(actions.iter())
            .map(|(env, &action)| env.step(action))
            .collect()
    }

    pub fn envs(&self) -> &[MeleeEnv] {
        &self.envs
    }

    pub fn seeds(&self) -> Vec<u64> {
        self.envs.iter().map(|e| e.seed()).collect()
    }

    /// Per-environment finished flags, in environment order.
    pub fn dones(&self) -> Vec<bool> {
        self.envs.iter().map(|e| e.is_done()).collect()
    }
}

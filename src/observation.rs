// src/observation.rs
//
// Fixed-size observation vector for policy input.
//
// Design requirements (mirrors the rest of the RL surface):
// - Fixed 16-float layout with stable index assignments
// - Serializable for logging and replay
// - Deterministic given the state it is built from
// - Degenerate geometry (absent target, zero separation) encoded by
//   explicit branching, never NaN

use serde::{Deserialize, Serialize};

use crate::config::CombatTuning;
use crate::state::{MonsterState, TargetState};
use crate::types::{Action, ACTION_COUNT};

/// Observation vector length.
pub const OBS_DIM: usize = 16;

/// Stable index assignments within the observation vector.
pub mod idx {
    /// 1.0 when a target is present this episode.
    pub const HAS_TARGET: usize = 0;
    /// Distance to target / sight radius, clamped to [0, 2].
    pub const TARGET_DIST: usize = 1;
    /// Unit direction to target, x component.
    pub const TARGET_DIR_X: usize = 2;
    /// Unit direction to target, y component.
    pub const TARGET_DIR_Y: usize = 3;
    /// Monster health ratio, clamped to [0, 1].
    pub const HP_RATIO: usize = 4;
    /// 1.0 when the monster is at or below the low-health threshold.
    pub const LOW_HP: usize = 5;
    /// 1.0 when the attack cooldown is elapsed AND the target is in reach.
    pub const ATTACK_READY: usize = 6;
    /// 1.0 when the target is within attack range.
    pub const IN_ATTACK_RANGE: usize = 7;
    /// 1.0 when the target is within the soft keep range.
    pub const IN_KEEP_RANGE: usize = 8;
    /// Start of the 5-wide one-hot block for the last action taken.
    pub const LAST_ACTION_BASE: usize = 9;
}

/// Policy-input snapshot of the environment state.
///
/// Indices 14 and 15 are reserved and always zero in this schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub values: [f32; OBS_DIM],
}

impl Observation {
    /// Encode the current state.
    ///
    /// All slots start at zero; target-relative features are only written
    /// when a target is present, so an absent target leaves indices 1-3
    /// and 6-8 at zero rather than encoding the sentinel position.
    pub fn from_state(
        monster: &MonsterState,
        target: &TargetState,
        tuning: &CombatTuning,
    ) -> Self {
        let mut o = [0.0f32; OBS_DIM];

        if target.active {
            let (dir, dist) = monster.pos.direction_to(target.pos);
            o[idx::HAS_TARGET] = 1.0;
            o[idx::TARGET_DIST] = (dist / tuning.sight).clamp(0.0, 2.0) as f32;
            o[idx::TARGET_DIR_X] = dir.x as f32;
            o[idx::TARGET_DIR_Y] = dir.y as f32;
            o[idx::IN_ATTACK_RANGE] = if dist <= tuning.attack_range { 1.0 } else { 0.0 };
            o[idx::IN_KEEP_RANGE] = if dist <= tuning.keep_attack_range {
                1.0
            } else {
                0.0
            };
            o[idx::ATTACK_READY] =
                if monster.attack_cd <= 0.0 && o[idx::IN_ATTACK_RANGE] > 0.5 {
                    1.0
                } else {
                    0.0
                };
        }

        o[idx::HP_RATIO] = monster.hp_ratio(tuning).clamp(0.0, 1.0) as f32;
        o[idx::LOW_HP] = if monster.low_hp(tuning) { 1.0 } else { 0.0 };

        o[idx::LAST_ACTION_BASE + monster.last_action.index()] = 1.0;

        Self { values: o }
    }

    // ----- Typed accessors (used by scripted policies and tests) -----

    pub fn has_target(&self) -> bool {
        self.values[idx::HAS_TARGET] > 0.5
    }

    pub fn low_hp(&self) -> bool {
        self.values[idx::LOW_HP] > 0.5
    }

    pub fn attack_ready(&self) -> bool {
        self.values[idx::ATTACK_READY] > 0.5
    }

    pub fn in_attack_range(&self) -> bool {
        self.values[idx::IN_ATTACK_RANGE] > 0.5
    }

    pub fn in_keep_range(&self) -> bool {
        self.values[idx::IN_KEEP_RANGE] > 0.5
    }

    /// Action decoded from the one-hot block.
    pub fn last_action(&self) -> Action {
        for action in Action::ALL {
            if self.values[idx::LAST_ACTION_BASE + action.index()] > 0.5 {
                return action;
            }
        }
        Action::Idle
    }

    /// Exactly one slot of the one-hot block is set.
    pub fn one_hot_is_valid(&self) -> bool {
        let ones = self.values[idx::LAST_ACTION_BASE..idx::LAST_ACTION_BASE + ACTION_COUNT]
            .iter()
            .filter(|&&v| v == 1.0)
            .count();
        let zeros = self.values[idx::LAST_ACTION_BASE..idx::LAST_ACTION_BASE + ACTION_COUNT]
            .iter()
            .filter(|&&v| v == 0.0)
            .count();
        ones == 1 && zeros == ACTION_COUNT - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec2;

    fn tuning() -> CombatTuning {
        CombatTuning::default()
    }

    #[test]
    fn test_absent_target_leaves_relative_slots_zero() {
        let t = tuning();
        let monster = MonsterState::spawned(Vec2::ZERO, Vec2::new(1.0, 0.0), &t);
        let target = TargetState::absent();

        let obs = Observation::from_state(&monster, &target, &t);
        assert!(!obs.has_target());
        for i in [
            idx::TARGET_DIST,
            idx::TARGET_DIR_X,
            idx::TARGET_DIR_Y,
            idx::ATTACK_READY,
            idx::IN_ATTACK_RANGE,
            idx::IN_KEEP_RANGE,
        ] {
            assert_eq!(obs.values[i], 0.0, "slot {} must stay zero", i);
        }
        assert_eq!(obs.values[idx::HP_RATIO], 1.0);
        assert!(obs.one_hot_is_valid());
        assert_eq!(obs.last_action(), Action::Idle);
    }

    #[test]
    fn test_in_range_flags() {
        let t = tuning();
        let monster = MonsterState::spawned(Vec2::ZERO, Vec2::new(1.0, 0.0), &t);
        let target = TargetState::spawned(Vec2::new(1.0, 0.0), &t);

        let obs = Observation::from_state(&monster, &target, &t);
        assert!(obs.has_target());
        assert!(obs.in_attack_range());
        assert!(obs.in_keep_range());
        assert!(obs.attack_ready());
        assert!((obs.values[idx::TARGET_DIST] - (1.0 / t.sight) as f32).abs() < 1e-6);
        assert_eq!(obs.values[idx::TARGET_DIR_X], 1.0);
        assert_eq!(obs.values[idx::TARGET_DIR_Y], 0.0);
    }

    #[test]
    fn test_attack_ready_requires_elapsed_cooldown() {
        let t = tuning();
        let mut monster = MonsterState::spawned(Vec2::ZERO, Vec2::new(1.0, 0.0), &t);
        monster.attack_cd = 0.3;
        let target = TargetState::spawned(Vec2::new(1.0, 0.0), &t);

        let obs = Observation::from_state(&monster, &target, &t);
        assert!(obs.in_attack_range());
        assert!(!obs.attack_ready());
    }

    #[test]
    fn test_zero_separation_direction_is_zero() {
        let t = tuning();
        let monster = MonsterState::spawned(Vec2::new(2.0, 2.0), Vec2::new(1.0, 0.0), &t);
        let target = TargetState::spawned(Vec2::new(2.0, 2.0), &t);

        let obs = Observation::from_state(&monster, &target, &t);
        assert_eq!(obs.values[idx::TARGET_DIR_X], 0.0);
        assert_eq!(obs.values[idx::TARGET_DIR_Y], 0.0);
        assert_eq!(obs.values[idx::TARGET_DIST], 0.0);
        assert!(obs.in_attack_range());
    }

    #[test]
    fn test_one_hot_tracks_last_action() {
        let t = tuning();
        let mut monster = MonsterState::spawned(Vec2::ZERO, Vec2::new(1.0, 0.0), &t);
        let target = TargetState::absent();

        for action in Action::ALL {
            monster.last_action = action;
            let obs = Observation::from_state(&monster, &target, &t);
            assert!(obs.one_hot_is_valid());
            assert_eq!(obs.last_action(), action);
        }
    }
}

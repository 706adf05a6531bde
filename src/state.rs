// src/state.rs
//
// Mutable per-episode state for the two entities. Both structs are owned
// exclusively by the environment instance; every field is rebuilt on
// reset and mutated only inside step.

use serde::{Deserialize, Serialize};

use crate::config::CombatTuning;
use crate::types::{Action, Vec2};

/// Sentinel position for an absent target, far outside the arena.
pub const ABSENT_TARGET_POS: Vec2 = Vec2 { x: 999.0, y: 999.0 };

/// State of the controlled monster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterState {
    pub pos: Vec2,
    /// Health in `[0, max_hp]`; clamped to 0 on damage.
    pub hp: f64,
    /// Seconds until the next attack is allowed; never negative.
    pub attack_cd: f64,
    /// Current patrol heading (unit vector).
    pub patrol_dir: Vec2,
    /// Seconds left on the current patrol leg.
    pub patrol_timer: f64,
    /// Action taken on the previous step (Idle right after reset);
    /// feeds the one-hot block of the observation.
    pub last_action: Action,
}

impl MonsterState {
    /// Fresh monster at the given spawn point.
    pub fn spawned(pos: Vec2, patrol_dir: Vec2, tuning: &CombatTuning) -> Self {
        Self {
            pos,
            hp: tuning.max_hp,
            attack_cd: 0.0,
            patrol_dir,
            patrol_timer: 0.0,
            last_action: Action::Idle,
        }
    }

    /// Health as a fraction of max health.
    pub fn hp_ratio(&self, tuning: &CombatTuning) -> f64 {
        self.hp / tuning.max_hp
    }

    /// Whether the monster counts as low-health.
    pub fn low_hp(&self, tuning: &CombatTuning) -> bool {
        self.hp_ratio(tuning) <= tuning.low_hp_ratio
    }
}

/// State of the scripted target bot.
///
/// The target may be absent for a whole episode; an absent target sits at
/// a sentinel position with zero health and no combat logic runs for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetState {
    pub pos: Vec2,
    pub hp: f64,
    pub attack_cd: f64,
    pub active: bool,
}

impl TargetState {
    /// Fresh target at the given spawn point.
    pub fn spawned(pos: Vec2, tuning: &CombatTuning) -> Self {
        Self {
            pos,
            hp: tuning.max_hp,
            attack_cd: 0.0,
            active: true,
        }
    }

    /// Placeholder for an episode with no target.
    pub fn absent() -> Self {
        Self {
            pos: ABSENT_TARGET_POS,
            hp: 0.0,
            attack_cd: 0.0,
            active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_target_is_pinned() {
        let t = TargetState::absent();
        assert!(!t.active);
        assert_eq!(t.hp, 0.0);
        assert_eq!(t.pos, ABSENT_TARGET_POS);
    }

    #[test]
    fn test_low_hp_threshold_is_inclusive() {
        let tuning = CombatTuning::default();
        let mut m = MonsterState::spawned(Vec2::ZERO, Vec2::new(1.0, 0.0), &tuning);
        m.hp = tuning.max_hp * tuning.low_hp_ratio;
        assert!(m.low_hp(&tuning));
        m.hp += 0.01;
        assert!(!m.low_hp(&tuning));
    }
}

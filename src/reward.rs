// src/reward.rs
//
// Additive per-step reward with an attributable breakdown.
//
// The environment fills one RewardComponents per step and the scalar
// reward is always the sum of the parts, so logs and tests can see
// which term produced a given reward instead of an opaque float.

use serde::{Deserialize, Serialize};

/// Reward schedule weights.
///
/// These pair with `CombatTuning`: fixed, and load-bearing for any
/// previously trained policy.
pub mod weights {
    /// Per point of damage dealt.
    pub const DEALT: f64 = 0.15;
    /// Per point of damage taken.
    pub const TAKEN: f64 = 0.08;
    /// Idling while a target is present.
    pub const IDLE_WITH_TARGET: f64 = 0.01;
    /// Patrol/Idle with no target on the field.
    pub const NO_TARGET_GOOD: f64 = 0.002;
    /// Any other action with no target on the field.
    pub const NO_TARGET_BAD: f64 = 0.01;
    /// Returning while at low health.
    pub const LOW_HP_RETREAT: f64 = 0.02;
    /// Anything but Return while at low health.
    pub const LOW_HP_OTHER: f64 = 0.02;
    /// Per unit of distance opened while fleeing at low health.
    pub const RETREAT_PROGRESS: f64 = 0.03;
    /// Attacking inside the soft keep range.
    pub const KEEP_RANGE_BONUS: f64 = 0.01;
    /// Attacking from outside the soft keep range.
    pub const KEEP_RANGE_MISS: f64 = 0.01;
    /// Flat per-step cost.
    pub const STEP: f64 = 0.001;
    /// Terminal bonus for killing the target.
    pub const WIN: f64 = 1.0;
    /// Terminal penalty for dying.
    pub const LOSS: f64 = 1.0;
}

/// Signed reward contributions for one step.
///
/// Every field already carries its weight and sign; `total()` is a plain
/// sum in schedule order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    /// `+DEALT * damage_dealt`.
    pub damage_dealt: f64,
    /// `-TAKEN * damage_taken`.
    pub damage_taken: f64,
    /// Penalty for idling in front of a live target.
    pub idle_with_target: f64,
    /// Conduct term for the no-target case.
    pub no_target_conduct: f64,
    /// Conduct term for the low-health case.
    pub low_hp_conduct: f64,
    /// Distance-opened shaping while fleeing at low health.
    pub retreat_progress: f64,
    /// Soft positioning term for Attack.
    pub attack_positioning: f64,
    /// Flat step cost.
    pub time_penalty: f64,
    /// Terminal win bonus / death penalty.
    pub terminal: f64,
}

impl RewardComponents {
    /// Scalar reward for the step.
    pub fn total(&self) -> f64 {
        self.damage_dealt
            + self.damage_taken
            + self.idle_with_target
            + self.no_target_conduct
            + self.low_hp_conduct
            + self.retreat_progress
            + self.attack_positioning
            + self.time_penalty
            + self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_parts() {
        let c = RewardComponents {
            damage_dealt: 1.5,
            damage_taken: -0.48,
            idle_with_target: -0.01,
            no_target_conduct: 0.002,
            low_hp_conduct: -0.02,
            retreat_progress: 0.009,
            attack_positioning: 0.01,
            time_penalty: -0.001,
            terminal: 1.0,
        };
        let expected = 1.5 - 0.48 - 0.01 + 0.002 - 0.02 + 0.009 + 0.01 - 0.001 + 1.0;
        assert!((c.total() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(RewardComponents::default().total(), 0.0);
    }
}

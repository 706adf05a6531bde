// src/types.rs
//
// Common shared types for the melee arena simulation.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Plain 2D vector used for positions and directions.
///
/// The simulation only ever needs a handful of operations (norms,
/// unit directions, per-axis clamping), so this stays a small value
/// type instead of pulling in a linear-algebra crate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at the given angle (radians).
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Unit direction from `self` to `other`, with the separation distance.
    ///
    /// Below 1e-6 separation the direction degenerates to the zero vector
    /// and the distance is reported as 0.0, so callers never divide by zero.
    pub fn direction_to(self, other: Vec2) -> (Vec2, f64) {
        let v = other - self;
        let d = v.length();
        if d < 1e-6 {
            (Vec2::ZERO, 0.0)
        } else {
            (
                Vec2 {
                    x: v.x / d,
                    y: v.y / d,
                },
                d,
            )
        }
    }

    /// Clamp both axes to `[-half, half]`.
    pub fn clamp_abs(self, half: f64) -> Vec2 {
        Vec2 {
            x: self.x.clamp(-half, half),
            y: self.y.clamp(-half, half),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Number of discrete actions.
pub const ACTION_COUNT: usize = 5;

/// Discrete action set for the controlled monster.
///
/// The set is fixed; the one-hot block of the observation vector and
/// any learned policy head are sized against `ACTION_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Stand still.
    Idle,
    /// Wander along the current patrol direction.
    Patrol,
    /// Move straight toward the target.
    Chase,
    /// Stand still and attempt a melee attack.
    Attack,
    /// Move straight away from the target.
    Return,
}

impl Action {
    /// All actions in index order (the order used by the one-hot encoding).
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Idle,
        Action::Patrol,
        Action::Chase,
        Action::Attack,
        Action::Return,
    ];

    /// Stable index of this action within the discrete action space.
    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Patrol => 1,
            Action::Chase => 2,
            Action::Attack => 3,
            Action::Return => 4,
        }
    }

    /// Stable name for logs and run summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "Idle",
            Action::Patrol => "Patrol",
            Action::Chase => "Chase",
            Action::Attack => "Attack",
            Action::Return => "Return",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when decoding an out-of-range discrete action.
///
/// A silently misinterpreted action would corrupt the one-hot block of
/// the observation, so raw integers from an external policy must pass
/// through `Action::try_from` before reaching `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAction(pub u32);

impl fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid discrete action {} (expected 0..{})",
            self.0, ACTION_COUNT
        )
    }
}

impl std::error::Error for InvalidAction {}

impl TryFrom<u32> for Action {
    type Error = InvalidAction;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Action::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidAction(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::try_from(action.index() as u32), Ok(action));
        }
    }

    #[test]
    fn test_action_rejects_out_of_range() {
        assert_eq!(Action::try_from(5), Err(InvalidAction(5)));
        assert_eq!(Action::try_from(u32::MAX), Err(InvalidAction(u32::MAX)));
    }

    #[test]
    fn test_direction_to_degenerate() {
        let p = Vec2::new(1.0, -2.0);
        let (dir, dist) = p.direction_to(p);
        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_clamp_abs() {
        let p = Vec2::new(20.0, -20.0).clamp_abs(14.0);
        assert_eq!(p, Vec2::new(14.0, -14.0));
    }
}

//! Soft limit configuration and types.

use serde::Deserialize;

/// Policy for handling limit violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Reject moves that would exceed limits.
    #[default]
    Reject,
    /// Clamp target to nearest limit.
    Clamp,
}

/// Position bounds in steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StepLimits {
    /// Minimum position in steps.
    pub min_steps: i64,
    /// Maximum position in steps.
    pub max_steps: i64,
    /// What to do when limit is exceeded.
    #[serde(default)]
    pub policy: LimitPolicy,
}

impl StepLimits {
    /// Create new step limits.
    pub const fn new(min_steps: i64, max_steps: i64, policy: LimitPolicy) -> Self {
        Self {
            min_steps,
            max_steps,
            policy,
        }
    }

    /// Check if limits are valid (min < max).
    pub fn is_valid(&self) -> bool {
        self.min_steps < self.max_steps
    }

    /// Check if a position is within limits.
    pub fn contains(&self, steps: i64) -> bool {
        steps >= self.min_steps && steps <= self.max_steps
    }

    /// The limit a target outside the bounds runs into.
    pub fn nearest(&self, target: i64) -> i64 {
        if target < self.min_steps {
            self.min_steps
        } else {
            self.max_steps
        }
    }

    /// Apply limit policy to a target position.
    ///
    /// Returns `Some(steps)` if valid or clamped, `None` if rejected.
    pub fn apply(&self, target: i64) -> Option<i64> {
        if self.contains(target) {
            Some(target)
        } else {
            match self.policy {
                LimitPolicy::Reject => None,
                LimitPolicy::Clamp => Some(self.nearest(target)),
            }
        }
    }
}

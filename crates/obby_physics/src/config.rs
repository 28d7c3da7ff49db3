//! Validator thresholds.

use obby_core::movement::{MAX_JUMP_HEIGHT, SAFE_GAP_SPRINT};
use serde::{Deserialize, Serialize};

/// Configuration for feasibility checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Level-ground gap a sprinting player clears.
    pub base_safe_gap: f64,
    /// Highest rise a jump clears.
    pub max_rise: f64,
    /// Minimum height of the lowest platform above an open floor.
    pub shortcut_clearance: f64,
    /// How close to the floor top a hazard must be to seal it.
    pub hazard_proximity: f64,
    /// Boundary walls every section needs.
    pub walls_required: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            base_safe_gap: SAFE_GAP_SPRINT,
            max_rise: MAX_JUMP_HEIGHT,
            shortcut_clearance: 8.0,
            hazard_proximity: 2.0,
            walls_required: 4,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::classify::Transition;
use crate::config::DistanceConfig;
use crate::point::MovementType;

/// Thresholds for flagging movements that barely miss the next tier.
///
/// Pixel tolerances are given at `reference_bpm` and scale inversely with
/// the BPM in effect, so faster sections get tighter tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRules {
    pub reference_bpm: f64,
    pub edge_dash_pixels: f64,
    pub edge_walk_pixels: f64,
}

impl Default for EdgeRules {
    fn default() -> Self {
        Self::from_config(&DistanceConfig::default())
    }
}

impl EdgeRules {
    pub fn from_config(config: &DistanceConfig) -> Self {
        Self {
            reference_bpm: config.reference_bpm,
            edge_dash_pixels: config.edge_dash_pixels,
            edge_walk_pixels: config.edge_walk_pixels,
        }
    }

    fn bpm_scale(&self, bpm: Option<f64>) -> f64 {
        match bpm {
            Some(bpm) if bpm.is_finite() && bpm > 0.0 => self.reference_bpm / bpm,
            _ => 1.0,
        }
    }

    /// Whether `transition` sits within tolerance of the next movement tier.
    pub fn is_edge_movement(&self, transition: &Transition, bpm: Option<f64>) -> bool {
        let Some(margins) = transition.margins else {
            return false;
        };
        let scale = self.bpm_scale(bpm);
        match transition.movement_type {
            MovementType::Walk => margins.distance_to_dash < self.edge_walk_pixels * scale,
            MovementType::Dash => margins.distance_to_hyper < self.edge_dash_pixels * scale,
            MovementType::Hyperdash => false,
        }
    }
}

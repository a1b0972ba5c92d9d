// Catcher dimensions and movement constants

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Size of the catcher at 1x scale.
const AREA_CATCHER_SIZE: f32 = 106.75;

/// Fraction of the catcher plate that can receive fruit.
pub const ALLOWED_CATCH_RANGE: f32 = 0.8;

/// Catcher speed while dashing, in pixels per millisecond.
pub const DASH_SPEED: f64 = 1.0;

/// Catcher speed while walking, in pixels per millisecond.
pub const WALK_SPEED: f64 = 0.5;

/// Walk allowance multiplier after a hyperdash; players commonly overshoot.
pub const HYPERDASH_LENIENCY: f64 = 0.95;

/// Share of the half-width a walk may cover without dashing.
pub const BASE_WALK_FRACTION: f64 = 0.95;

/// A quarter of a 60 fps frame of extra reaction time.
pub const FRAME_GRACE_MS: f64 = 1000.0 / 60.0 / 4.0;

pub const MIN_CIRCLE_SIZE: f32 = 0.0;
pub const MAX_CIRCLE_SIZE: f32 = 10.0;

fn calculate_scale(cs: f32) -> f32 {
    ((1.0 - 0.7 * ((f64::from(cs) - 5.0) / 5.0)) as f32 / 2.0) * 2.0
}

/// Width of the catcher area that catches fruit.
pub fn calculate_catch_width(cs: f32) -> f32 {
    AREA_CATCHER_SIZE * calculate_scale(cs).abs() * ALLOWED_CATCH_RANGE
}

/// Catcher ranges derived from circle size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatcherGeometry {
    half_width: f64,
    base_walk_range: f64,
}

impl CatcherGeometry {
    pub fn from_circle_size(circle_size: f32) -> Result<Self> {
        ensure!(
            circle_size.is_finite() && (MIN_CIRCLE_SIZE..=MAX_CIRCLE_SIZE).contains(&circle_size),
            "circle size {circle_size} outside [{MIN_CIRCLE_SIZE}, {MAX_CIRCLE_SIZE}]"
        );
        let half_width = calculate_catch_width(circle_size) * 0.5 / ALLOWED_CATCH_RANGE;
        Ok(Self::with_half_width(f64::from(half_width)))
    }

    /// Geometry with an explicit half-width in pixels.
    ///
    /// # Panics
    ///
    /// If `half_width` is not finite and strictly positive.
    pub fn with_half_width(half_width: f64) -> Self {
        assert!(
            half_width.is_finite() && half_width > 0.0,
            "catcher half-width must be finite and positive, got {half_width}"
        );
        Self {
            half_width,
            base_walk_range: half_width * BASE_WALK_FRACTION,
        }
    }

    /// Distance the catcher covers for free before a hyperdash is forced.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Distance the catcher covers for free before a dash is forced.
    pub fn base_walk_range(&self) -> f64 {
        self.base_walk_range
    }
}

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// A sampled point along one pass of a slider path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Fraction of the pass (0.0 = head, 1.0 = end of path)
    pub progress: f64,
    /// Horizontal position in playfield pixels
    pub x: f64,
}

/// Horizontal projection of a slider curve over a single pass.
///
/// The decoder flattens the curve (bezier, perfect circle, linear) into
/// samples; positions in between are interpolated linearly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliderPath {
    points: Vec<PathPoint>,
}

impl SliderPath {
    /// Build a path from `(progress, x)` samples sorted by progress within `[0, 1]`.
    pub fn new(points: Vec<PathPoint>) -> Result<Self> {
        ensure!(!points.is_empty(), "slider path needs at least one point");
        for p in &points {
            ensure!(
                p.progress.is_finite() && p.x.is_finite(),
                "non-finite slider path point {p:?}"
            );
            ensure!(
                (0.0..=1.0).contains(&p.progress),
                "slider path progress {} outside [0, 1]",
                p.progress
            );
        }
        ensure!(
            points.windows(2).all(|w| w[0].progress <= w[1].progress),
            "slider path points must be sorted by progress"
        );
        Ok(Self { points })
    }

    /// Straight path from `start_x` to `end_x`.
    pub fn linear(start_x: f64, end_x: f64) -> Self {
        Self {
            points: vec![
                PathPoint {
                    progress: 0.0,
                    x: start_x,
                },
                PathPoint {
                    progress: 1.0,
                    x: end_x,
                },
            ],
        }
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// X position at a fraction of one pass. `None` for an empty path.
    pub fn x_at_progress(&self, progress: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        let progress = progress.clamp(0.0, 1.0);

        if progress <= first.progress {
            return Some(first.x);
        }
        if progress >= last.progress {
            return Some(last.x);
        }

        // First sample strictly past `progress`; the one before it is at or below
        let upper = self.points.partition_point(|p| p.progress <= progress);
        let a = self.points[upper - 1];
        let b = self.points[upper];
        let span = b.progress - a.progress;
        if span <= 0.0 {
            return Some(b.x);
        }
        Some(a.x + (b.x - a.x) * (progress - a.progress) / span)
    }
}

/// Slider-specific data carried by a decoded hit object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderData {
    /// Duration of a single pass over the path in milliseconds
    pub span_duration: f64,
    /// Number of passes (1 + repeat count)
    pub span_count: u32,
    /// Absolute times of the slider ticks, as produced by the decoder
    pub tick_times: Vec<f64>,
    pub path: SliderPath,
}

impl SliderData {
    pub fn new(span_duration: f64, span_count: u32, tick_times: Vec<f64>, path: SliderPath) -> Self {
        Self {
            span_duration,
            span_count,
            tick_times,
            path,
        }
    }

    /// Times of every repeat and the tail, excluding the head.
    pub fn edge_times(&self, start_time: f64) -> Vec<f64> {
        (0..self.span_count)
            .map(|i| start_time + self.span_duration * f64::from(i + 1))
            .collect()
    }

    /// Horizontal position of the slider ball at `time`.
    ///
    /// Odd passes travel the path backwards. Times outside the slider are
    /// clamped to its head or tail.
    pub fn x_at(&self, start_time: f64, time: f64) -> Option<f64> {
        if self.span_count == 0 || self.span_duration <= 0.0 {
            return self.path.x_at_progress(0.0);
        }

        let total = ((time - start_time) / self.span_duration).clamp(0.0, f64::from(self.span_count));
        let span = total.floor();
        let mut progress = total - span;
        if span as u32 % 2 == 1 {
            progress = 1.0 - progress;
        }
        self.path.x_at_progress(progress)
    }
}

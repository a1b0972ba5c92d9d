use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

pub const TOLERANCE_MAX_MS: f64 = 50.0;
pub const EPSILON_MAX_MS: f64 = 1.0;
pub const REFERENCE_BPM_MIN: f64 = 1.0;
pub const REFERENCE_BPM_MAX: f64 = 1000.0;
pub const EDGE_PIXELS_MAX: f64 = 512.0;

/// Tunables for flattening and edge-movement detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct DistanceConfig {
    /// Ticks this close to a repeat or tail are dropped (ms)
    pub tick_edge_tolerance_ms: f64,
    /// Points this close to the previous point are treated as the same instant (ms)
    pub duplicate_epsilon_ms: f64,
    /// BPM at which the edge pixel tolerances apply unscaled
    pub reference_bpm: f64,
    /// Dashes within this many pixels of a hyperdash are edge dashes
    pub edge_dash_pixels: f64,
    /// Walks within this many pixels of a dash are edge walks
    pub edge_walk_pixels: f64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            tick_edge_tolerance_ms: 4.0,
            duplicate_epsilon_ms: 0.001,
            reference_bpm: 180.0,
            edge_dash_pixels: 10.0,
            edge_walk_pixels: 10.0,
        }
    }
}

fn clamp_logged(name: &str, value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    let clamped = if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    };
    if clamped != value {
        warn!("{name} {value} out of range, using {clamped}");
    }
    clamped
}

impl DistanceConfig {
    pub fn validate(&mut self) {
        let defaults = Self::default();
        self.tick_edge_tolerance_ms = clamp_logged(
            "tickEdgeToleranceMs",
            self.tick_edge_tolerance_ms,
            0.0,
            TOLERANCE_MAX_MS,
            defaults.tick_edge_tolerance_ms,
        );
        self.duplicate_epsilon_ms = clamp_logged(
            "duplicateEpsilonMs",
            self.duplicate_epsilon_ms,
            0.0,
            EPSILON_MAX_MS,
            defaults.duplicate_epsilon_ms,
        );
        self.reference_bpm = clamp_logged(
            "referenceBpm",
            self.reference_bpm,
            REFERENCE_BPM_MIN,
            REFERENCE_BPM_MAX,
            defaults.reference_bpm,
        );
        self.edge_dash_pixels = clamp_logged(
            "edgeDashPixels",
            self.edge_dash_pixels,
            0.0,
            EDGE_PIXELS_MAX,
            defaults.edge_dash_pixels,
        );
        self.edge_walk_pixels = clamp_logged(
            "edgeWalkPixels",
            self.edge_walk_pixels,
            0.0,
            EDGE_PIXELS_MAX,
            defaults.edge_walk_pixels,
        );
    }

    /// Read config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: DistanceConfig =
            serde_json::from_str(&data).context("failed to parse distance config")?;
        config.validate();
        Ok(config)
    }

    /// Write config to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }
}

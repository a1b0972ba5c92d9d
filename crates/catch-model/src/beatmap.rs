use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultySettings;
use crate::hit_object::HitObject;
use crate::key::BeatmapKey;
use crate::timing::TimingPoint;

/// Metadata fields that identify a difficulty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatmapMetadata {
    pub title: String,
    pub artist: String,
    pub creator: String,
    /// Difficulty name
    pub version: String,
}

/// A decoded catch beatmap difficulty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Beatmap {
    pub metadata: BeatmapMetadata,
    pub difficulty: DifficultySettings,
    pub timing_points: Vec<TimingPoint>,
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    pub fn key(&self) -> BeatmapKey {
        BeatmapKey::from_metadata(&self.metadata)
    }

    pub fn circle_size(&self) -> f32 {
        self.difficulty.circle_size
    }

    /// BPM in effect at `time`.
    ///
    /// Uses the last uninherited timing point at or before `time`; objects
    /// placed before the first red line use that first line. `None` when the
    /// beatmap has no uninherited timing point.
    pub fn bpm_at(&self, time: f64) -> Option<f64> {
        let mut red_lines = self.timing_points.iter().filter(|tp| tp.uninherited);
        let first = red_lines.next()?;
        let active = red_lines
            .filter(|tp| tp.time <= time)
            .last()
            .unwrap_or(first);
        Some(active.bpm())
    }

    pub fn circle_count(&self) -> usize {
        self.hit_objects.iter().filter(|o| o.is_circle()).count()
    }

    pub fn slider_count(&self) -> usize {
        self.hit_objects
            .iter()
            .filter(|o| o.slider_data().is_some())
            .count()
    }

    pub fn spinner_count(&self) -> usize {
        self.hit_objects.iter().filter(|o| o.is_spinner()).count()
    }

    /// Decode a beatmap serialized as JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let beatmap: Beatmap =
            serde_json::from_str(json).context("failed to parse beatmap JSON")?;
        Ok(beatmap)
    }

    /// Read a beatmap from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read beatmap {}", path.display()))?;
        let beatmap = Self::from_json_str(&data)?;
        debug!(
            "loaded {}: {} circles, {} sliders, {} spinners",
            beatmap.key(),
            beatmap.circle_count(),
            beatmap.slider_count(),
            beatmap.spinner_count()
        );
        Ok(beatmap)
    }

    /// Write the beatmap to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write beatmap {}", path.display()))?;
        Ok(())
    }
}

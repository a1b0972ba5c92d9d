use std::fmt;

use serde::{Deserialize, Serialize};

use crate::beatmap::BeatmapMetadata;

/// Stable identity of a beatmap difficulty.
///
/// Built only from metadata that does not change while the difficulty is
/// being edited, so results computed for it can be reused by every check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeatmapKey(String);

impl BeatmapKey {
    pub fn from_metadata(metadata: &BeatmapMetadata) -> Self {
        Self(format!(
            "difficulty={}creator={}artist={}title={}",
            metadata.version, metadata.creator, metadata.artist, metadata.title
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeatmapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

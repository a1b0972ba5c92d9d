// Catch beatmap input model: hit objects, slider paths, timing points, identity

mod beatmap;
mod difficulty;
mod hit_object;
mod key;
mod slider;
mod timing;

pub use beatmap::{Beatmap, BeatmapMetadata};
pub use difficulty::{Difficulty, DifficultySettings};
pub use hit_object::{HitObject, HitObjectKind};
pub use key::BeatmapKey;
pub use slider::{PathPoint, SliderData, SliderPath};
pub use timing::TimingPoint;

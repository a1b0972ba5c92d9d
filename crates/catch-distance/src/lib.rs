// Catcher movement classification: flatten hit objects into catch points,
// then measure how far each move is from needing a dash or hyperdash

pub mod cache;
pub mod calculator;
pub mod catcher;
pub mod classify;
pub mod config;
pub mod edge;
pub mod flatten;
pub mod point;
pub mod snap;

pub use cache::{DistanceCache, MemoryDistanceCache};
pub use calculator::{ClassifiedBeatmap, calculate, calculate_cached, calculate_set};
pub use catcher::{CatcherGeometry, calculate_catch_width};
pub use classify::{CatcherState, Margins, Transition, classify, direction_between, transitions};
pub use config::DistanceConfig;
pub use edge::EdgeRules;
pub use flatten::flatten;
pub use point::{CatchPoint, Direction, MovementType, NoteKind};
pub use snap::is_higher_snapped;

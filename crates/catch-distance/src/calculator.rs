use std::sync::Arc;

use anyhow::{Context, Result};
use catch_model::{Beatmap, BeatmapKey};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::DistanceCache;
use crate::catcher::CatcherGeometry;
use crate::classify::classify;
use crate::config::DistanceConfig;
use crate::edge::EdgeRules;
use crate::flatten::flatten;
use crate::point::{CatchPoint, NoteKind};

/// Classified catch points of one beatmap difficulty.
///
/// Read-only once built; share it behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedBeatmap {
    key: BeatmapKey,
    points: Vec<CatchPoint>,
}

impl ClassifiedBeatmap {
    pub fn new(key: BeatmapKey, points: Vec<CatchPoint>) -> Self {
        Self { key, points }
    }

    pub fn key(&self) -> &BeatmapKey {
        &self.key
    }

    pub fn points(&self) -> &[CatchPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point `index` moves towards.
    pub fn target(&self, index: usize) -> Option<&CatchPoint> {
        let target = self.points.get(index)?.target?;
        self.points.get(target)
    }

    /// Head of the slider `index` belongs to.
    pub fn slider_head(&self, index: usize) -> Option<&CatchPoint> {
        let head = self.points.get(index)?.slider_head?;
        self.points.get(head)
    }

    pub fn hyperdash_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_hyperdash()).count()
    }

    pub fn dash_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_dash()).count()
    }

    /// Indices of the objects a timestamp for `indices` should reference.
    ///
    /// Slider parts resolve to their head, spinners are skipped and repeated
    /// objects are listed once, in first-seen order.
    pub fn timestamp_anchors(&self, indices: &[usize]) -> Vec<usize> {
        let mut anchors = Vec::with_capacity(indices.len());
        for &index in indices {
            let Some(point) = self.points.get(index) else {
                continue;
            };
            let anchor = match point.kind {
                NoteKind::Spinner => continue,
                NoteKind::Circle => index,
                _ => point.slider_head.unwrap_or(index),
            };
            if self.points.get(anchor).is_none_or(|p| p.is_spinner()) {
                continue;
            }
            if !anchors.contains(&anchor) {
                anchors.push(anchor);
            }
        }
        anchors
    }
}

/// Flatten and classify every hit object of `beatmap`.
pub fn calculate(beatmap: &Beatmap, config: &DistanceConfig) -> Result<ClassifiedBeatmap> {
    let key = beatmap.key();
    let geometry = CatcherGeometry::from_circle_size(beatmap.circle_size())
        .with_context(|| format!("invalid catcher for {key}"))?;

    let points = flatten(&beatmap.hit_objects, config);
    let points = classify(
        points,
        &geometry,
        &EdgeRules::from_config(config),
        |time| beatmap.bpm_at(time),
    );
    let classified = ClassifiedBeatmap::new(key, points);

    debug!(
        "classified {}: {} points, {} hyperdashes, {} dashes",
        classified.key(),
        classified.len(),
        classified.hyperdash_count(),
        classified.dash_count()
    );
    Ok(classified)
}

/// `calculate`, reusing the cached result for the beatmap's key.
pub fn calculate_cached(
    cache: &dyn DistanceCache,
    beatmap: &Beatmap,
    config: &DistanceConfig,
) -> Result<Arc<ClassifiedBeatmap>> {
    cache.get_or_compute(&beatmap.key(), &|| calculate(beatmap, config))
}

/// Classify every difficulty of a beatmap set in parallel and store each
/// result in `cache`, replacing whatever was there.
///
/// Results are returned in the order of `beatmaps`. The first failure is
/// returned; difficulties that succeeded are still cached.
pub fn calculate_set(
    cache: &dyn DistanceCache,
    beatmaps: &[Beatmap],
    config: &DistanceConfig,
) -> Result<Vec<Arc<ClassifiedBeatmap>>> {
    beatmaps
        .par_iter()
        .map(|beatmap| calculate(beatmap, config).map(|classified| cache.insert(classified)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryDistanceCache;
    use crate::point::MovementType;
    use catch_model::{BeatmapMetadata, HitObject, SliderData, SliderPath, TimingPoint};

    fn beatmap(version: &str, hit_objects: Vec<HitObject>) -> Beatmap {
        Beatmap {
            metadata: BeatmapMetadata {
                title: "Song".to_string(),
                artist: "Artist".to_string(),
                creator: "Mapper".to_string(),
                version: version.to_string(),
            },
            timing_points: vec![TimingPoint::uninherited(0.0, 500.0)],
            hit_objects,
            ..Default::default()
        }
    }

    fn jumps(version: &str) -> Beatmap {
        beatmap(
            version,
            vec![
                HitObject::circle(0.0, 0.0),
                HitObject::circle(100.0, 300.0),
                HitObject::circle(600.0, 310.0),
            ],
        )
    }

    #[test]
    fn calculate_keys_and_classifies() {
        let classified = calculate(&jumps("Rain"), &DistanceConfig::default()).unwrap();
        assert_eq!(classified.key(), &jumps("Rain").key());
        assert_eq!(classified.len(), 3);
        assert_eq!(classified.points()[0].movement_type, MovementType::Hyperdash);
        assert_eq!(classified.hyperdash_count(), 1);
        assert_eq!(classified.dash_count(), 0);
        assert_eq!(classified.target(0).map(|p| p.time), Some(100.0));
        assert!(classified.target(2).is_none());
    }

    #[test]
    fn invalid_circle_size_is_an_error() {
        let mut map = jumps("Rain");
        map.difficulty.circle_size = 12.0;
        let err = calculate(&map, &DistanceConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("circle size"));
    }

    #[test]
    fn empty_beatmap_is_empty() {
        let classified = calculate(&beatmap("Cup", vec![]), &DistanceConfig::default()).unwrap();
        assert!(classified.is_empty());
    }

    #[test]
    fn anchors_resolve_to_heads() {
        let data = SliderData::new(400.0, 1, vec![1200.0], SliderPath::linear(0.0, 100.0));
        let map = beatmap(
            "Platter",
            vec![
                HitObject::circle(500.0, 10.0),
                HitObject::slider(1000.0, 0.0, data),
                HitObject::spinner(2000.0, 2500.0),
            ],
        );
        let classified = calculate(&map, &DistanceConfig::default()).unwrap();
        // circle, head, droplet, tail, spinner
        assert_eq!(classified.len(), 5);
        assert_eq!(classified.slider_head(3).map(|p| p.time), Some(1000.0));
        assert_eq!(classified.timestamp_anchors(&[0, 2, 3, 1, 4]), vec![0, 1]);
        assert!(classified.timestamp_anchors(&[4, 99]).is_empty());
    }

    #[test]
    fn anchors_never_land_on_spinners() {
        let data = SliderData::new(200.0, 1, vec![], SliderPath::linear(0.0, 100.0));
        let map = beatmap(
            "Platter",
            vec![
                HitObject::circle(0.0, 0.0),
                HitObject::spinner(100.0, 150.0),
                HitObject::slider(100.0, 50.0, data),
            ],
        );
        let classified = calculate(&map, &DistanceConfig::default()).unwrap();
        let kinds: Vec<NoteKind> = classified.points().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![NoteKind::Circle, NoteKind::Spinner, NoteKind::SliderTail]);

        let anchors = classified.timestamp_anchors(&[2]);
        assert_eq!(anchors, vec![2]);
        assert!(anchors.iter().all(|&i| !classified.points()[i].is_spinner()));
    }

    #[test]
    fn anchors_skip_spinner_head_links() {
        let mut tail = CatchPoint::new(300.0, 100.0, NoteKind::SliderTail);
        tail.slider_head = Some(0);
        let classified = ClassifiedBeatmap::new(
            jumps("Rain").key(),
            vec![CatchPoint::new(100.0, 256.0, NoteKind::Spinner), tail],
        );
        assert!(classified.timestamp_anchors(&[1]).is_empty());
    }

    #[test]
    fn cached_calculation_is_shared() {
        let cache = MemoryDistanceCache::new();
        let config = DistanceConfig::default();
        let first = calculate_cached(&cache, &jumps("Rain"), &config).unwrap();
        let second = calculate_cached(&cache, &jumps("Rain"), &config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn set_repopulates_cache() {
        let cache = MemoryDistanceCache::new();
        let config = DistanceConfig::default();
        let stale = cache.insert(ClassifiedBeatmap::new(jumps("Rain").key(), Vec::new()));

        let set = [jumps("Platter"), jumps("Rain")];
        let results = calculate_set(&cache, &set, &config).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].key(), &set[0].key());
        assert_eq!(results[1].key(), &set[1].key());
        assert_eq!(cache.len(), 2);

        let fresh = cache.get(&set[1].key()).unwrap();
        assert!(!Arc::ptr_eq(&stale, &fresh));
        assert_eq!(fresh.len(), 3);
    }

    #[test]
    fn set_reports_failure() {
        let cache = MemoryDistanceCache::new();
        let mut broken = jumps("Overdose");
        broken.difficulty.circle_size = f32::NAN;
        let set = [jumps("Rain"), broken];
        assert!(calculate_set(&cache, &set, &DistanceConfig::default()).is_err());
    }
}

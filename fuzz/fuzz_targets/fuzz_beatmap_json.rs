#![no_main]

use catch_distance::{DistanceConfig, calculate};
use catch_model::Beatmap;
use libfuzzer_sys::fuzz_target;

/// Repeat counts beyond this only measure allocation speed
const MAX_SPANS: u32 = 1024;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(beatmap) = Beatmap::from_json_str(text) {
        let reasonable = beatmap
            .hit_objects
            .iter()
            .filter_map(|object| object.slider_data())
            .all(|slider| slider.span_count <= MAX_SPANS);
        if reasonable {
            // Out-of-range circle sizes must come back as errors, not panics
            let _ = calculate(&beatmap, &DistanceConfig::default());
        }
    }

    if let Ok(mut config) = serde_json::from_str::<DistanceConfig>(text) {
        config.validate();
        assert!(config.tick_edge_tolerance_ms.is_finite());
        assert!(config.reference_bpm >= 1.0);
    }
});

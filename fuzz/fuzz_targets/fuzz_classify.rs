#![no_main]

use arbitrary::Arbitrary;
use catch_distance::{CatcherGeometry, DistanceConfig, EdgeRules, MovementType, classify, flatten};
use catch_model::{HitObject, SliderData, SliderPath};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzObject {
    Circle {
        time: u32,
        x: u16,
    },
    Slider {
        time: u32,
        x: u16,
        end_x: u16,
        span_duration: u16,
        span_count: u8,
        tick_offsets: Vec<u16>,
    },
    Spinner {
        time: u32,
        length: u16,
    },
}

#[derive(Debug, Arbitrary)]
struct Input {
    circle_size: u8,
    objects: Vec<FuzzObject>,
}

impl FuzzObject {
    fn into_hit_object(self) -> HitObject {
        match self {
            Self::Circle { time, x } => HitObject::circle(f64::from(time), f64::from(x % 513)),
            Self::Slider {
                time,
                x,
                end_x,
                span_duration,
                span_count,
                tick_offsets,
            } => {
                let start = f64::from(time);
                let start_x = f64::from(x % 513);
                let ticks = tick_offsets
                    .into_iter()
                    .map(|offset| start + f64::from(offset))
                    .collect();
                let data = SliderData::new(
                    f64::from(span_duration),
                    u32::from(span_count % 8),
                    ticks,
                    SliderPath::linear(start_x, f64::from(end_x % 513)),
                );
                HitObject::slider(start, start_x, data)
            }
            Self::Spinner { time, length } => {
                HitObject::spinner(f64::from(time), f64::from(time) + f64::from(length))
            }
        }
    }
}

fuzz_target!(|input: Input| {
    let circle_size = f32::from(input.circle_size % 101) / 10.0;
    let Ok(geometry) = CatcherGeometry::from_circle_size(circle_size) else {
        return;
    };
    let objects: Vec<HitObject> = input
        .objects
        .into_iter()
        .map(FuzzObject::into_hit_object)
        .collect();

    let config = DistanceConfig::default();
    let points = classify(
        flatten(&objects, &config),
        &geometry,
        &EdgeRules::from_config(&config),
        |_| None,
    );

    for (index, pair) in points.windows(2).enumerate() {
        assert!(pair[0].time < pair[1].time);
        assert_eq!(pair[0].target, Some(index + 1));
    }
    for point in &points {
        if point.distance_to_hyper.is_some_and(|hyper| hyper <= 0.0) {
            assert_eq!(point.movement_type, MovementType::Hyperdash);
        }
        if let Some(head) = point.slider_head {
            assert!(head < points.len());
        }
    }
});

// Hit objects -> time-ordered catch points

use catch_model::{HitObject, HitObjectKind, SliderData};
use log::debug;

use crate::config::DistanceConfig;
use crate::point::{CatchPoint, NoteKind};

/// A point waiting for sorting, with the index of the slider it came from
struct PendingPoint {
    point: CatchPoint,
    slider: Option<usize>,
}

impl PendingPoint {
    fn standalone(time: f64, x: f64, kind: NoteKind) -> Self {
        Self {
            point: CatchPoint::new(time, x, kind),
            slider: None,
        }
    }

    fn slider_part(time: f64, x: f64, kind: NoteKind, slider: usize) -> Self {
        Self {
            point: CatchPoint::new(time, x, kind),
            slider: Some(slider),
        }
    }
}

fn push_slider_points(
    pending: &mut Vec<PendingPoint>,
    slider_index: usize,
    object: &HitObject,
    data: &SliderData,
    tick_edge_tolerance_ms: f64,
) {
    pending.push(PendingPoint::slider_part(
        object.time,
        object.x,
        NoteKind::SliderHead,
        slider_index,
    ));

    let edge_times = data.edge_times(object.time);
    let x_at = |time: f64| data.x_at(object.time, time).unwrap_or(object.x);

    for (i, &time) in edge_times.iter().enumerate() {
        let kind = if i + 1 == edge_times.len() {
            NoteKind::SliderTail
        } else {
            NoteKind::SliderRepeat
        };
        pending.push(PendingPoint::slider_part(time, x_at(time), kind, slider_index));
    }

    // Ticks landing on a repeat or the tail are already covered by that edge
    for &time in &data.tick_times {
        let on_edge = edge_times
            .iter()
            .any(|&edge| (time - edge).abs() <= tick_edge_tolerance_ms);
        if !on_edge {
            pending.push(PendingPoint::slider_part(
                time,
                x_at(time),
                NoteKind::SliderDroplet,
                slider_index,
            ));
        }
    }
}

/// Flatten hit objects into a time-ordered sequence of catch points.
///
/// Sliders expand into head, repeats, droplets and tail. Points sharing an
/// instant (within `duplicate_epsilon_ms`) collapse into one representative,
/// chosen by `NoteKind` priority. Only `kind`, `time`, `x` and `slider_head`
/// are filled in; the rest is left to the classifier.
pub fn flatten(hit_objects: &[HitObject], config: &DistanceConfig) -> Vec<CatchPoint> {
    let mut pending: Vec<PendingPoint> = Vec::with_capacity(hit_objects.len());

    for (index, object) in hit_objects.iter().enumerate() {
        match &object.kind {
            HitObjectKind::Circle => {
                pending.push(PendingPoint::standalone(object.time, object.x, NoteKind::Circle));
            }
            HitObjectKind::Spinner { .. } => {
                pending.push(PendingPoint::standalone(
                    object.time,
                    object.x,
                    NoteKind::Spinner,
                ));
            }
            HitObjectKind::Slider(data) => {
                push_slider_points(
                    &mut pending,
                    index,
                    object,
                    data,
                    config.tick_edge_tolerance_ms,
                );
            }
        }
    }

    // Stable, so equal (time, priority) pairs keep their source order
    pending.sort_by(|a, b| {
        a.point
            .time
            .total_cmp(&b.point.time)
            .then(
                a.point
                    .kind
                    .collision_priority()
                    .cmp(&b.point.kind.collision_priority()),
            )
    });

    let generated = pending.len();
    let mut kept: Vec<PendingPoint> = Vec::with_capacity(generated);
    // slider index -> position of the group its head collapsed into
    let mut head_groups: Vec<Option<usize>> = vec![None; hit_objects.len()];
    let mut last_time: Option<f64> = None;

    // A run of points each within epsilon of the one before is one instant;
    // its lowest-priority member stands for the whole run
    for entry in pending {
        let joins_group =
            last_time.is_some_and(|last| entry.point.time - last <= config.duplicate_epsilon_ms);
        last_time = Some(entry.point.time);

        let position = if joins_group {
            kept.len() - 1
        } else {
            kept.len()
        };
        if let (NoteKind::SliderHead, Some(slider)) = (entry.point.kind, entry.slider) {
            head_groups[slider] = Some(position);
        }

        if !joins_group {
            kept.push(entry);
        } else if entry.point.kind.collision_priority()
            < kept[position].point.kind.collision_priority()
        {
            kept[position] = entry;
        }
    }

    if kept.len() < generated {
        debug!(
            "dropped {} same-instant points out of {generated}",
            generated - kept.len()
        );
    }

    // A spinner never stands in for a head; the slider's earliest surviving
    // point does instead
    let mut first_positions: Vec<Option<usize>> = vec![None; hit_objects.len()];
    for (position, entry) in kept.iter().enumerate() {
        if let Some(slider) = entry.slider {
            first_positions[slider].get_or_insert(position);
        }
    }
    let head_positions: Vec<Option<usize>> = head_groups
        .iter()
        .zip(&first_positions)
        .map(|(&group, &first)| match group {
            Some(position) if !kept[position].point.is_spinner() => Some(position),
            _ => first,
        })
        .collect();

    kept.into_iter()
        .map(|entry| {
            let mut point = entry.point;
            point.slider_head = entry.slider.and_then(|slider| head_positions[slider]);
            point
        })
        .collect()
}

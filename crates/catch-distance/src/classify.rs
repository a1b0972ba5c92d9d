// Stateful left-to-right movement classification
//
// Each transition depends on the ranges left over by the previous one, so the
// scan is a fold over consecutive point pairs with `CatcherState` as the
// accumulator. Spinners reset the accumulator.

use serde::{Deserialize, Serialize};

use crate::catcher::{CatcherGeometry, DASH_SPEED, FRAME_GRACE_MS, HYPERDASH_LENIENCY, WALK_SPEED};
use crate::edge::EdgeRules;
use crate::point::{CatchPoint, Direction, MovementType};

/// Position deltas smaller than this count as standing still.
const STILL_EPSILON: f64 = 1e-6;

/// Signed pixel margins of a measured transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub distance_to_hyper: f64,
    pub distance_to_dash: f64,
}

/// Classification of the movement between two consecutive points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub movement_type: MovementType,
    pub direction: Direction,
    pub time_to_target: f64,
    /// `None` when an endpoint is a spinner
    pub margins: Option<Margins>,
    /// Free travel distance granted before a hyperdash is forced
    pub dash_allowance: f64,
    /// Free travel distance granted before a dash is forced
    pub walk_allowance: f64,
}

/// Ranges carried from one transition to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatcherState {
    pub last_direction: Direction,
    pub dash_range: f64,
    pub walk_range: f64,
    pub last_was_hyperdash: bool,
}

/// Direction of travel from `from_x` to `to_x`.
pub fn direction_between(from_x: f64, to_x: f64) -> Direction {
    let delta = to_x - from_x;
    if delta.abs() < STILL_EPSILON {
        Direction::None
    } else if delta > 0.0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

impl CatcherState {
    pub fn initial(geometry: &CatcherGeometry) -> Self {
        Self {
            last_direction: Direction::None,
            dash_range: geometry.half_width(),
            walk_range: geometry.base_walk_range(),
            last_was_hyperdash: false,
        }
    }

    /// Classify the move from `from` to `to` and return the state for the next move.
    pub fn step(
        self,
        geometry: &CatcherGeometry,
        from: &CatchPoint,
        to: &CatchPoint,
    ) -> (Self, Transition) {
        let time_to_target = to.time - from.time - FRAME_GRACE_MS;

        if from.is_spinner() || to.is_spinner() {
            let reset = Self::initial(geometry);
            let transition = Transition {
                movement_type: MovementType::Walk,
                direction: Direction::None,
                time_to_target,
                margins: None,
                dash_allowance: reset.dash_range,
                walk_allowance: reset.walk_range,
            };
            return (reset, transition);
        }

        let direction = direction_between(from.x, to.x);
        let distance = (to.x - from.x).abs();
        let same_direction = direction == self.last_direction;

        let dash_allowance = if same_direction {
            self.dash_range
        } else {
            geometry.half_width()
        };

        let mut walk_allowance = if same_direction {
            self.walk_range
        } else {
            geometry.base_walk_range()
        };
        if self.last_was_hyperdash {
            walk_allowance *= HYPERDASH_LENIENCY;
        }

        let distance_to_hyper = time_to_target * DASH_SPEED - (distance - dash_allowance);
        let distance_to_dash = time_to_target * WALK_SPEED - (distance - walk_allowance);
        let movement_type = MovementType::from_margins(distance_to_hyper, distance_to_dash);

        let dash_range = if movement_type == MovementType::Hyperdash {
            geometry.half_width()
        } else {
            distance_to_hyper.clamp(0.0, geometry.half_width())
        };
        let walk_range = if movement_type == MovementType::Dash {
            geometry.base_walk_range()
        } else {
            distance_to_dash.clamp(0.0, geometry.base_walk_range())
        };

        let next = Self {
            last_direction: direction,
            dash_range,
            walk_range,
            last_was_hyperdash: movement_type == MovementType::Hyperdash,
        };
        let transition = Transition {
            movement_type,
            direction,
            time_to_target,
            margins: Some(Margins {
                distance_to_hyper,
                distance_to_dash,
            }),
            dash_allowance,
            walk_allowance,
        };
        (next, transition)
    }
}

/// Classify every consecutive pair of `points`, in order.
///
/// Returns one transition per point except the last.
pub fn transitions(points: &[CatchPoint], geometry: &CatcherGeometry) -> Vec<Transition> {
    points
        .windows(2)
        .scan(CatcherState::initial(geometry), |state, pair| {
            let (next, transition) = state.step(geometry, &pair[0], &pair[1]);
            *state = next;
            Some(transition)
        })
        .collect()
}

/// Fill in targets, movement types, margins and edge flags.
///
/// `bpm_at` supplies the BPM in effect at a point's time for edge scaling.
pub fn classify<F>(
    mut points: Vec<CatchPoint>,
    geometry: &CatcherGeometry,
    edge_rules: &EdgeRules,
    bpm_at: F,
) -> Vec<CatchPoint>
where
    F: Fn(f64) -> Option<f64>,
{
    let transitions = transitions(&points, geometry);

    for (index, transition) in transitions.into_iter().enumerate() {
        let point = &mut points[index];
        point.target = Some(index + 1);
        point.movement_type = transition.movement_type;
        point.direction = transition.direction;
        point.time_to_target = Some(transition.time_to_target);
        point.distance_to_hyper = transition.margins.map(|m| m.distance_to_hyper);
        point.distance_to_dash = transition.margins.map(|m| m.distance_to_dash);
        point.is_edge_movement = edge_rules.is_edge_movement(&transition, bpm_at(point.time));
    }

    points
}

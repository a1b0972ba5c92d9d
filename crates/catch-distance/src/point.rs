use serde::{Deserialize, Serialize};

/// Which part of a hit object a catch point came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteKind {
    Circle,
    SliderHead,
    SliderRepeat,
    SliderTail,
    SliderDroplet,
    Spinner,
}

impl NoteKind {
    /// Name used when reporting the object in an issue message.
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::SliderHead => "Slider head",
            Self::SliderRepeat => "Slider repeat",
            Self::SliderTail => "Slider tail",
            Self::SliderDroplet => "Droplet",
            Self::Spinner => "Spinner",
        }
    }

    /// Whether this kind belongs to a slider (head included).
    pub fn is_slider_part(self) -> bool {
        matches!(
            self,
            Self::SliderHead | Self::SliderRepeat | Self::SliderTail | Self::SliderDroplet
        )
    }

    /// Tie-break order for points sharing an instant; lower wins.
    pub(crate) fn collision_priority(self) -> u8 {
        match self {
            Self::Spinner => 0,
            Self::SliderHead => 1,
            Self::Circle => 2,
            Self::SliderTail => 3,
            Self::SliderRepeat => 4,
            Self::SliderDroplet => 5,
        }
    }
}

/// Catcher movement needed to reach the next point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementType {
    #[default]
    Walk,
    Dash,
    Hyperdash,
}

impl MovementType {
    /// Classify a transition from its margins. Zero counts as the stronger movement.
    pub fn from_margins(distance_to_hyper: f64, distance_to_dash: f64) -> Self {
        if distance_to_hyper <= 0.0 {
            Self::Hyperdash
        } else if distance_to_dash <= 0.0 {
            Self::Dash
        } else {
            Self::Walk
        }
    }
}

/// Horizontal direction of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// A single catchable point on the flattened timeline.
///
/// `slider_head` and `target` are indices into the sequence the point lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchPoint {
    /// Time in milliseconds
    pub time: f64,
    /// Horizontal position in playfield pixels
    pub x: f64,
    pub kind: NoteKind,
    /// Head of the slider this point belongs to (heads point at themselves)
    pub slider_head: Option<usize>,
    /// Next point in time order
    pub target: Option<usize>,
    pub movement_type: MovementType,
    pub direction: Direction,
    /// Extra pixels before the transition becomes a hyperdash (<= 0 means it is one)
    pub distance_to_hyper: Option<f64>,
    /// Extra pixels before the transition needs a dash (<= 0 means it does)
    pub distance_to_dash: Option<f64>,
    /// Milliseconds available to reach the target, grace period included
    pub time_to_target: Option<f64>,
    pub is_edge_movement: bool,
}

impl CatchPoint {
    pub fn new(time: f64, x: f64, kind: NoteKind) -> Self {
        Self {
            time,
            x,
            kind,
            slider_head: None,
            target: None,
            movement_type: MovementType::Walk,
            direction: Direction::None,
            distance_to_hyper: None,
            distance_to_dash: None,
            time_to_target: None,
            is_edge_movement: false,
        }
    }

    pub fn is_spinner(&self) -> bool {
        self.kind == NoteKind::Spinner
    }

    pub fn is_hyperdash(&self) -> bool {
        self.movement_type == MovementType::Hyperdash
    }

    pub fn is_dash(&self) -> bool {
        self.movement_type == MovementType::Dash
    }
}

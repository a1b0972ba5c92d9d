use serde::{Deserialize, Serialize};

use crate::slider::SliderData;

/// What a hit object is, with the data only that kind carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HitObjectKind {
    Circle,
    Slider(SliderData),
    /// Spinner with its end time in milliseconds
    Spinner { end_time: f64 },
}

/// A single decoded hit object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitObject {
    /// Start time in milliseconds
    pub time: f64,
    /// Horizontal position in playfield pixels (0-512)
    pub x: f64,
    pub kind: HitObjectKind,
}

impl HitObject {
    pub fn circle(time: f64, x: f64) -> Self {
        Self {
            time,
            x,
            kind: HitObjectKind::Circle,
        }
    }

    pub fn slider(time: f64, x: f64, data: SliderData) -> Self {
        Self {
            time,
            x,
            kind: HitObjectKind::Slider(data),
        }
    }

    /// Spinners sit in the middle of the playfield.
    pub fn spinner(time: f64, end_time: f64) -> Self {
        Self {
            time,
            x: 256.0,
            kind: HitObjectKind::Spinner { end_time },
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self.kind, HitObjectKind::Circle)
    }

    pub fn is_spinner(&self) -> bool {
        matches!(self.kind, HitObjectKind::Spinner { .. })
    }

    pub fn slider_data(&self) -> Option<&SliderData> {
        match &self.kind {
            HitObjectKind::Slider(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slider::SliderPath;

    #[test]
    fn circle_has_no_slider_data() {
        let circle = HitObject::circle(1000.0, 128.0);
        assert!(circle.is_circle());
        assert!(circle.slider_data().is_none());
    }

    #[test]
    fn slider_carries_its_data() {
        let data = SliderData::new(250.0, 3, vec![], SliderPath::linear(0.0, 100.0));
        let slider = HitObject::slider(1000.0, 0.0, data);
        assert!(!slider.is_circle());
        assert_eq!(slider.slider_data().map(|d| d.span_count), Some(3));
    }

    #[test]
    fn spinner_is_centered() {
        let spinner = HitObject::spinner(500.0, 2500.0);
        assert!(spinner.is_spinner());
        assert_eq!(spinner.x, 256.0);
        assert_eq!(spinner.kind, HitObjectKind::Spinner { end_time: 2500.0 });
    }
}

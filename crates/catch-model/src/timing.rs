use serde::{Deserialize, Serialize};

/// A timing point (red line when uninherited, green line otherwise)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    /// Time in milliseconds
    pub time: f64,
    /// Milliseconds per beat for uninherited points; negative slider
    /// velocity multiplier for inherited ones
    pub beat_length: f64,
    pub uninherited: bool,
}

impl TimingPoint {
    pub fn uninherited(time: f64, beat_length: f64) -> Self {
        Self {
            time,
            beat_length,
            uninherited: true,
        }
    }

    pub fn inherited(time: f64, beat_length: f64) -> Self {
        Self {
            time,
            beat_length,
            uninherited: false,
        }
    }

    /// Beats per minute of an uninherited point.
    pub fn bpm(&self) -> f64 {
        60_000.0 / self.beat_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_from_beat_length() {
        assert_eq!(TimingPoint::uninherited(0.0, 500.0).bpm(), 120.0);
        assert_eq!(TimingPoint::uninherited(0.0, 333.3).bpm().round(), 180.0);
    }

    #[test]
    fn constructors_set_flag() {
        assert!(TimingPoint::uninherited(0.0, 500.0).uninherited);
        assert!(!TimingPoint::inherited(0.0, -100.0).uninherited);
    }
}

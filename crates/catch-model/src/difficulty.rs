use serde::{Deserialize, Serialize};

/// Difficulty settings from the `[Difficulty]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct DifficultySettings {
    /// Catcher size (0-10, higher = smaller catcher)
    pub circle_size: f32,
    pub approach_rate: f32,
    pub hp_drain_rate: f32,
    pub overall_difficulty: f32,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            circle_size: 5.0,
            approach_rate: 5.0,
            hp_drain_rate: 5.0,
            overall_difficulty: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
        }
    }
}

/// Difficulty level of a catch beatmap within its set
///
/// Cup, Salad, Platter, Rain, Overdose and beyond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Insane,
    Expert,
    Ultra,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = DifficultySettings::default();
        assert_eq!(settings.circle_size, 5.0);
        assert_eq!(settings.slider_multiplier, 1.4);
        assert_eq!(settings.slider_tick_rate, 1.0);
    }

    #[test]
    fn test_serde_default_fills_missing_fields() {
        let json = r#"{"circleSize": 4.2}"#;
        let settings: DifficultySettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.circle_size, 4.2);
        assert_eq!(settings.approach_rate, 5.0);
    }
}

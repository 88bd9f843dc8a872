use serde::Deserialize;

/// Step cap applied to each run unless configured otherwise.
pub const DEFAULT_MAX_TIME: u32 = 1000;
/// Largest number of cells a single action may travel.
pub const DEFAULT_MAX_MOVEMENT: u32 = 3;
/// Weight applied to the exploration runtime when scoring.
pub const DEFAULT_EXPLORATION_WEIGHT: f64 = 1.0 / 30.0;

/// Tunable limits of a simulation session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Maximum number of steps per run before it times out.
    pub max_time: u32,
    /// Movement requests are clamped to `-max_movement..=max_movement`.
    pub max_movement: u32,
    /// Multiplier applied to the exploration runtime in the score.
    pub exploration_weight: f64,
}

impl HarnessConfig {
    /// Returns a copy with a different step cap.
    #[must_use]
    pub fn with_max_time(mut self, max_time: u32) -> Self {
        self.max_time = max_time;
        self
    }

    /// Clamps a requested movement to the configured range.
    #[must_use]
    pub fn clamp_movement(&self, movement: i32) -> i32 {
        let limit = i32::try_from(self.max_movement).unwrap_or(i32::MAX);
        movement.clamp(-limit, limit)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_MAX_TIME,
            max_movement: DEFAULT_MAX_MOVEMENT,
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_both_directions() {
        let config = HarnessConfig::default();
        assert_eq!(config.clamp_movement(5), 3);
        assert_eq!(config.clamp_movement(-7), -3);
        assert_eq!(config.clamp_movement(2), 2);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: HarnessConfig = toml::from_str("max_time = 50").expect("valid config");
        assert_eq!(config.max_time, 50);
        assert_eq!(config.max_movement, DEFAULT_MAX_MOVEMENT);
        assert!((config.exploration_weight - DEFAULT_EXPLORATION_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<HarnessConfig>("max_speed = 2").is_err());
    }
}

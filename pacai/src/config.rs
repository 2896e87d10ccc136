use std::{fs, path::Path};

use mcts::config::DEFAULT_SEED;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunables of the junction tree search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Corridor distance past which branches are only simulated.
    pub distance_limit: u32,
    /// Multiplier applied to reward samples on every pass that touches a node.
    pub decay_factor: f64,
    pub exploration_constant: f64,
    /// Children are sampled uniformly until all of them have this many visits.
    pub visit_threshold: u64,
    pub playout_ticks: u32,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            distance_limit: 50,
            decay_factor: 0.9,
            exploration_constant: 1.0,
            visit_threshold: 15,
            playout_ticks: 1_000,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "decay_factor must lie in (0, 1), got {}",
                self.decay_factor
            )));
        }
        if !(self.exploration_constant >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "exploration_constant must not be negative, got {}",
                self.exploration_constant
            )));
        }
        if self.distance_limit == 0 {
            return Err(ConfigError::Invalid("distance_limit must be positive".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn rng(&self) -> XorShiftRng {
        XorShiftRng::seed_from_u64(self.seed.unwrap_or(DEFAULT_SEED))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn defaults_pass_validation() {
        SearchConfig::default().validate().unwrap();
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let config = SearchConfig::from_ron_str(include_str!("../../pac-cli/search.ron")).unwrap();
        assert_eq!(
            config,
            SearchConfig {
                seed: Some(1337),
                ..Default::default()
            }
        );
    }

    #[test]
    fn partial_ron_keeps_remaining_defaults() {
        let config = SearchConfig::from_ron_str("(decay_factor: 0.5, seed: Some(4))").unwrap();
        assert_eq!(config.decay_factor, 0.5);
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.distance_limit, 50);
        assert_eq!(config.visit_threshold, 15);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for text in [
            "(decay_factor: 1.0)",
            "(decay_factor: 0.0)",
            "(exploration_constant: -0.5)",
            "(distance_limit: 0)",
        ] {
            assert!(
                matches!(SearchConfig::from_ron_str(text), Err(ConfigError::Invalid(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(
            SearchConfig::from_ron_str("(decay_factor: )"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SearchConfig::load("/nonexistent/search.ron"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn seeded_generators_repeat() {
        let config = SearchConfig {
            seed: Some(11),
            ..Default::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}

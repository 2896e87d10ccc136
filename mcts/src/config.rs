use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

use crate::VoteError;

pub const DEFAULT_SEED: u64 = 1337;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteConfig {
    /// Random rollouts played for every move that survives pruning.
    pub rollouts: usize,
    /// Plies after which a rollout is abandoned and scored as a draw.
    pub max_rollout_length: usize,
    pub seed: Option<u64>,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            rollouts: 5_000,
            max_rollout_length: 1_000,
            seed: None,
        }
    }
}

impl VoteConfig {
    #[must_use]
    pub fn with_rollouts(rollouts: usize) -> Self {
        Self {
            rollouts,
            ..Default::default()
        }
    }

    pub fn from_ron_str(text: &str) -> Result<Self, VoteError> {
        let config: Self = ron::from_str(text).map_err(|e| VoteError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VoteError> {
        if self.rollouts == 0 {
            return Err(VoteError::InvalidConfig("rollouts must be at least 1".into()));
        }
        if self.max_rollout_length == 0 {
            return Err(VoteError::InvalidConfig(
                "max_rollout_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn rng(&self) -> XorShiftRng {
        XorShiftRng::seed_from_u64(self.seed.unwrap_or(DEFAULT_SEED))
    }
}

use std::str::FromStr;

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which objective is paired with survival when ranking branches.
///
/// Also names the three reward components a playout produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tactic {
    Ghost,
    Pill,
    #[default]
    Survival,
}

impl FromStr for Tactic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ghost" => Ok(Tactic::Ghost),
            "pill" => Ok(Tactic::Pill),
            "survival" => Ok(Tactic::Survival),
            other => Err(ConfigError::Invalid(format!("unknown tactic {other:?}"))),
        }
    }
}

impl std::fmt::Display for Tactic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tactic::Ghost => "ghost",
            Tactic::Pill => "pill",
            Tactic::Survival => "survival",
        };
        write!(f, "{name}")
    }
}

/// Outcome of a single playout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rewards {
    pub ghost: f64,
    pub pill: f64,
    pub survival: f64,
}

impl Rewards {
    #[must_use]
    pub const fn new(ghost: f64, pill: f64, survival: f64) -> Self {
        Self {
            ghost,
            pill,
            survival,
        }
    }

    #[must_use]
    pub const fn get(&self, component: Tactic) -> f64 {
        match component {
            Tactic::Ghost => self.ghost,
            Tactic::Pill => self.pill,
            Tactic::Survival => self.survival,
        }
    }
}

/// Per-component sample lists of a search node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardHistory {
    samples: EnumMap<Tactic, Vec<f64>>,
}

impl RewardHistory {
    pub fn push(&mut self, rewards: &Rewards) {
        for (component, samples) in &mut self.samples {
            samples.push(rewards.get(component));
        }
    }

    pub fn decay(&mut self, factor: f64) {
        for (_, samples) in &mut self.samples {
            samples.iter_mut().for_each(|sample| *sample *= factor);
        }
    }

    /// Arithmetic mean of one component, 0 while nothing has been recorded.
    #[must_use]
    pub fn mean(&self, component: Tactic) -> f64 {
        let samples = &self.samples[component];
        if samples.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        mean
    }

    #[must_use]
    pub fn samples(&self, component: Tactic) -> &[f64] {
        &self.samples[component]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples[Tactic::Survival].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

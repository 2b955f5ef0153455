// Suggestion computations and their configuration
use crate::destination::Destination;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Largest party the explore screen will suggest destinations for
pub const MAX_PEOPLE: i32 = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid max_party_size {0}: must be at least 1")]
    InvalidPartySize(i32),
}

/// How the people-count shuffle derives its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStrategy {
    /// `count * r` with `r` drawn from `1..=100` on every call, so the same
    /// count gives a different order each time.
    #[default]
    PerCallRandom,
    /// `count` itself; the same count always gives the same order.
    StableByCount,
}

// Engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_party_size: i32,
    pub seed_strategy: SeedStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_party_size: MAX_PEOPLE,
            seed_strategy: SeedStrategy::PerCallRandom,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_party_size < 1 {
            return Err(ConfigError::InvalidPartySize(self.max_party_size));
        }
        Ok(())
    }
}

pub fn shuffle_seed(count: i32, strategy: SeedStrategy) -> u64 {
    let multiplier: i64 = match strategy {
        SeedStrategy::PerCallRandom => rand::thread_rng().gen_range(1..=100),
        SeedStrategy::StableByCount => 1,
    };
    // Negative counts wrap; any seed is as good as another
    (i64::from(count) * multiplier) as u64
}

/// Destinations for a party of `count` people.
///
/// Parties above `config.max_party_size` get nothing. Everyone else gets
/// the full list in a seeded random order. Zero and negative counts are
/// not rejected.
pub fn shuffle_for_party(
    destinations: &[Destination],
    count: i32,
    config: &EngineConfig,
) -> Vec<Destination> {
    if count > config.max_party_size {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(shuffle_seed(count, config.seed_strategy));
    let mut shuffled = destinations.to_vec();
    shuffled.shuffle(&mut rng);
    shuffled
}

// Order-preserving, case-sensitive substring match on the display name
pub fn filter_by_display_name(destinations: &[Destination], text: &str) -> Vec<Destination> {
    destinations
        .iter()
        .filter(|destination| destination.name_to_display().contains(text))
        .cloned()
        .collect()
}

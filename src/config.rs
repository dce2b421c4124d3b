use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, AdvisorResult};
use crate::game_state::BlindLevels;

/// Settings an [`Advisor`](crate::advisor::Advisor) is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorConfig {
    pub blinds: BlindLevels,
    /// Monte-Carlo trials for preflop equity vs a range.
    pub preflop_samples: usize,
    /// Monte-Carlo trials for postflop equity vs a range.
    pub postflop_samples: usize,
    /// Cosmetic jitter on the reported confidence.
    pub jitter: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            blinds: BlindLevels::default(),
            preflop_samples: 1500,
            postflop_samples: 1000,
            jitter: true,
        }
    }
}

impl AdvisorConfig {
    pub fn load(path: impl AsRef<Path>) -> AdvisorResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: AdvisorConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdvisorResult<()> {
        validate_blinds(&self.blinds)?;
        if self.preflop_samples == 0 || self.postflop_samples == 0 {
            return Err(AdvisorError::InvalidSizing(
                "sample counts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn validate_blinds(blinds: &BlindLevels) -> AdvisorResult<()> {
    if !blinds.big_blind.is_finite() || blinds.big_blind <= 0.0 {
        return Err(AdvisorError::InvalidSizing(format!(
            "big blind must be positive, got {}",
            blinds.big_blind
        )));
    }
    if !blinds.small_blind.is_finite() || blinds.small_blind < 0.0 {
        return Err(AdvisorError::InvalidSizing(format!(
            "small blind must not be negative, got {}",
            blinds.small_blind
        )));
    }
    Ok(())
}

//! Action-frequency maps: clamping, normalisation to 100, primary action
//! selection and the cosmetic confidence jitter.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "bet")]
    Bet,
    #[serde(rename = "raise")]
    Raise,
    #[serde(rename = "3bet")]
    ThreeBet,
    #[serde(rename = "4bet")]
    FourBet,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call => "call",
            Action::Bet => "bet",
            Action::Raise => "raise",
            Action::ThreeBet => "3bet",
            Action::FourBet => "4bet",
        }
    }

    pub fn from_label(label: &str) -> Option<Action> {
        match label.trim().to_lowercase().replace(['-', ' '], "").as_str() {
            "fold" => Some(Action::Fold),
            "check" => Some(Action::Check),
            "call" => Some(Action::Call),
            "bet" => Some(Action::Bet),
            "raise" => Some(Action::Raise),
            "3bet" | "threebet" => Some(Action::ThreeBet),
            "4bet" | "fourbet" => Some(Action::FourBet),
            _ => None,
        }
    }

    pub fn is_aggressive(self) -> bool {
        matches!(
            self,
            Action::Bet | Action::Raise | Action::ThreeBet | Action::FourBet
        )
    }

    /// Tie-break rank: raise tier over call over check over fold.
    fn preference(self) -> u8 {
        match self {
            Action::FourBet => 6,
            Action::ThreeBet => 5,
            Action::Raise => 4,
            Action::Bet => 3,
            Action::Call => 2,
            Action::Check => 1,
            Action::Fold => 0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "Fold"),
            Action::Check => write!(f, "Check"),
            Action::Call => write!(f, "Call"),
            Action::Bet => write!(f, "Bet"),
            Action::Raise => write!(f, "Raise"),
            Action::ThreeBet => write!(f, "3-Bet"),
            Action::FourBet => write!(f, "4-Bet"),
        }
    }
}

/// Normalised action frequencies. Values are whole percentages summing to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Strategy {
    frequencies: BTreeMap<Action, u32>,
}

impl Strategy {
    pub fn pure(action: Action) -> Self {
        let mut frequencies = BTreeMap::new();
        frequencies.insert(action, 100);
        Strategy { frequencies }
    }

    /// Builds a strategy from raw weights.
    ///
    /// Each weight is clamped to [0, 100]; if the total is not 100 the
    /// difference is spread evenly over the listed actions, then rounded with
    /// the largest-remainder method so the result sums to exactly 100.
    /// Repeated actions are merged. An empty list yields a pure fold.
    pub fn from_weights(weights: &[(Action, f64)]) -> Self {
        let mut merged: BTreeMap<Action, f64> = BTreeMap::new();
        for &(action, weight) in weights {
            let w = if weight.is_finite() { weight } else { 0.0 };
            *merged.entry(action).or_insert(0.0) += w.clamp(0.0, 100.0);
        }
        if merged.is_empty() {
            return Strategy::pure(Action::Fold);
        }
        for w in merged.values_mut() {
            *w = w.min(100.0);
        }

        let n = merged.len() as f64;
        let total: f64 = merged.values().sum();
        if total <= 0.0 {
            for w in merged.values_mut() {
                *w = 100.0 / n;
            }
        } else if (total - 100.0).abs() > f64::EPSILON {
            let share = (100.0 - total) / n;
            for w in merged.values_mut() {
                *w += share;
            }
            // An even cut can push small weights below zero; rescale instead.
            if merged.values().any(|&w| w < 0.0) {
                for w in merged.values_mut() {
                    *w = w.max(0.0);
                }
                let positive: f64 = merged.values().sum();
                for w in merged.values_mut() {
                    *w = *w / positive * 100.0;
                }
            }
        }

        Strategy {
            frequencies: round_largest_remainder(&merged),
        }
    }

    pub fn get(&self, action: Action) -> u32 {
        self.frequencies.get(&action).copied().unwrap_or(0)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.get(action) > 0
    }

    pub fn total(&self) -> u32 {
        self.frequencies.values().sum()
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, u32)> + '_ {
        self.frequencies.iter().map(|(a, f)| (*a, *f))
    }

    /// Actions ordered by frequency, highest first, ties by preference.
    pub fn ranked(&self) -> Vec<(Action, u32)> {
        let mut entries: Vec<(Action, u32)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.preference().cmp(&a.0.preference())));
        entries
    }

    pub fn primary_action(&self) -> Action {
        self.ranked().first().map(|(a, _)| *a).unwrap_or(Action::Fold)
    }

    pub fn primary_frequency(&self) -> u32 {
        self.get(self.primary_action())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ranked()
            .into_iter()
            .map(|(action, freq)| format!("{} {}%", action, freq))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

fn round_largest_remainder(weights: &BTreeMap<Action, f64>) -> BTreeMap<Action, u32> {
    let mut floors: Vec<(Action, u32, f64)> = weights
        .iter()
        .map(|(&a, &w)| (a, w.floor() as u32, w - w.floor()))
        .collect();
    let assigned: u32 = floors.iter().map(|(_, f, _)| *f).sum();
    let mut leftover = 100u32.saturating_sub(assigned);

    floors.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.0.preference().cmp(&a.0.preference()))
    });
    for entry in floors.iter_mut() {
        if leftover == 0 {
            break;
        }
        entry.1 += 1;
        leftover -= 1;
    }

    floors
        .into_iter()
        .filter(|(_, f, _)| *f > 0)
        .map(|(a, f, _)| (a, f))
        .collect()
}

// ---------------------------------------------------------------------------
// Confidence jitter
// ---------------------------------------------------------------------------

/// Deterministic cosmetic noise applied to the displayed confidence.
///
/// Kept apart from the Monte-Carlo equity sampling: it never feeds back into
/// frequencies or the choice of action.
pub trait NoiseSource: Send + Sync {
    /// Offset for `key`, within `[-amplitude, amplitude]`.
    fn jitter(&self, key: &str) -> f64;
}

/// Hash of the decision key mapped onto `[-amplitude, amplitude]`.
#[derive(Debug, Clone, Copy)]
pub struct HashNoise {
    pub amplitude: f64,
}

impl Default for HashNoise {
    fn default() -> Self {
        HashNoise { amplitude: 2.0 }
    }
}

impl NoiseSource for HashNoise {
    fn jitter(&self, key: &str) -> f64 {
        let unit = (fnv1a(key.as_bytes()) % 10_001) as f64 / 10_000.0;
        (unit * 2.0 - 1.0) * self.amplitude
    }
}

/// 64-bit FNV-1a, fixed across platforms and toolchains.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl NoiseSource for NoJitter {
    fn jitter(&self, _key: &str) -> f64 {
        0.0
    }
}

/// Primary frequency plus jitter, clamped to [0, 100], one decimal.
pub fn confidence(strategy: &Strategy, noise: &dyn NoiseSource, key: &str) -> f64 {
    let base = strategy.primary_frequency() as f64;
    let value = (base + noise.jitter(key)).clamp(0.0, 100.0);
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_remainder_sums_to_hundred() {
        let mut weights = BTreeMap::new();
        weights.insert(Action::Fold, 33.3);
        weights.insert(Action::Call, 33.3);
        weights.insert(Action::Raise, 33.4);
        let rounded = round_largest_remainder(&weights);
        assert_eq!(rounded.values().sum::<u32>(), 100);
    }

    #[test]
    fn test_hash_noise_is_bounded_and_repeatable() {
        let noise = HashNoise::default();
        for key in ["AKs|BTN", "72o|UTG", "", "QQ|BB|flop"] {
            let a = noise.jitter(key);
            assert!(a.abs() <= 2.0);
            assert_eq!(a, noise.jitter(key));
        }
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_hash_noise_is_pinned() {
        let jitter = HashNoise::default().jitter("AKo|CO");
        assert!((jitter - -0.2216).abs() < 1e-9);
    }
}

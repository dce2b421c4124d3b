use std::fmt;

use serde::Serialize;

use crate::error::{AdvisorError, AdvisorResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PotOdds {
    /// Share of the final pot the caller contributes.
    pub ratio: f64,
    pub percentage: f64,
}

impl fmt::Display for PotOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}% pot odds", self.percentage)
    }
}

/// Equity needed to call `bet` into `pot`: bet / (pot + bet).
pub fn pot_odds(pot: f64, bet: f64) -> AdvisorResult<PotOdds> {
    if bet <= 0.0 || !bet.is_finite() {
        return Err(AdvisorError::InvalidSizing(format!(
            "bet must be positive, got {}",
            bet
        )));
    }
    if pot < 0.0 || !pot.is_finite() {
        return Err(AdvisorError::InvalidSizing(format!(
            "pot must not be negative, got {}",
            pot
        )));
    }
    let ratio = bet / (pot + bet);
    Ok(PotOdds {
        ratio,
        percentage: ratio * 100.0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpliedOdds {
    pub probability: f64,
    pub percentage: f64,
}

impl fmt::Display for ImpliedOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}% chance to improve", self.percentage)
    }
}

fn choose(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Chance of hitting at least one of `outs` over the next `cards_to_come`
/// cards, drawing without replacement from the unseen deck.
pub fn implied_odds(outs: u32, cards_to_come: u32) -> ImpliedOdds {
    if outs == 0 || cards_to_come == 0 || cards_to_come > 5 {
        return ImpliedOdds {
            probability: 0.0,
            percentage: 0.0,
        };
    }
    // Unseen from hero's seat: 52 minus hole cards minus the visible board.
    let unseen = 52 - 2 - (5 - cards_to_come);
    let outs = outs.min(unseen);
    let probability = 1.0 - choose(unseen - outs, cards_to_come) / choose(unseen, cards_to_come);
    ImpliedOdds {
        probability,
        percentage: probability * 100.0,
    }
}

pub fn ev(equity: f64, pot: f64, bet: f64) -> f64 {
    let win_amount = pot + bet;
    equity * win_amount - (1.0 - equity) * bet
}

/// Minimum defence frequency against a bet of `bet_size` into `pot_size`.
pub fn mdf(bet_size: f64, pot_size: f64) -> AdvisorResult<f64> {
    if pot_size <= 0.0 {
        return Err(AdvisorError::InvalidSizing("Pot must be positive".to_string()));
    }
    Ok(pot_size / (pot_size + bet_size))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SprZone {
    Low,
    Medium,
    High,
}

impl fmt::Display for SprZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SprZone::Low => write!(f, "low"),
            SprZone::Medium => write!(f, "medium"),
            SprZone::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SprResult {
    pub ratio: f64,
    pub zone: SprZone,
}

impl fmt::Display for SprResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SPR {:.1} ({})", self.ratio, self.zone)
    }
}

pub fn spr(stack: f64, pot: f64) -> AdvisorResult<SprResult> {
    if pot <= 0.0 {
        return Err(AdvisorError::InvalidSizing("Pot must be positive".to_string()));
    }
    let ratio = stack / pot;
    let zone = if ratio <= 4.0 {
        SprZone::Low
    } else if ratio <= 10.0 {
        SprZone::Medium
    } else {
        SprZone::High
    };
    Ok(SprResult { ratio, zone })
}

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::game_state::{BlindLevels, EventKind, GameState};
use crate::positions::Position;
use crate::ranges::{parse_range, range_from_top_pct, range_pct, HAND_RANKING};

static OPPONENT_RANGES_JSON: &str = include_str!("../data/opponent_ranges.json");

const FALLBACK_TABLE: &str = "conservative_default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "unopened")]
    Unopened,
    #[serde(rename = "facing2bet")]
    Facing2Bet,
    #[serde(rename = "facing3bet")]
    Facing3Bet,
    #[serde(rename = "facing4bet+")]
    Facing4BetPlus,
    #[serde(rename = "overlimpers")]
    Overlimpers,
    #[serde(rename = "isolateRaise")]
    IsolateRaise,
    #[serde(rename = "squeezeSpot")]
    SqueezeSpot,
    #[serde(rename = "multiway")]
    Multiway,
    #[serde(rename = "blindVsBlind")]
    BlindVsBlind,
    #[serde(rename = "postflopCheck")]
    PostflopCheck,
    #[serde(rename = "postflopBet")]
    PostflopBet,
    #[serde(rename = "postflopRaise")]
    PostflopRaise,
    #[serde(rename = "complex")]
    Complex,
}

pub const ALL_ACTION_TYPES: [ActionType; 13] = [
    ActionType::Unopened,
    ActionType::Facing2Bet,
    ActionType::Facing3Bet,
    ActionType::Facing4BetPlus,
    ActionType::Overlimpers,
    ActionType::IsolateRaise,
    ActionType::SqueezeSpot,
    ActionType::Multiway,
    ActionType::BlindVsBlind,
    ActionType::PostflopCheck,
    ActionType::PostflopBet,
    ActionType::PostflopRaise,
    ActionType::Complex,
];

impl ActionType {
    /// Key used in the range lookup table.
    pub fn key(self) -> &'static str {
        match self {
            ActionType::Unopened => "unopened",
            ActionType::Facing2Bet => "facing2bet",
            ActionType::Facing3Bet => "facing3bet",
            ActionType::Facing4BetPlus => "facing4bet+",
            ActionType::Overlimpers => "overlimpers",
            ActionType::IsolateRaise => "isolateRaise",
            ActionType::SqueezeSpot => "squeezeSpot",
            ActionType::Multiway => "multiway",
            ActionType::BlindVsBlind => "blindVsBlind",
            ActionType::PostflopCheck => "postflopCheck",
            ActionType::PostflopBet => "postflopBet",
            ActionType::PostflopRaise => "postflopRaise",
            ActionType::Complex => "complex",
        }
    }

    pub fn is_postflop(self) -> bool {
        matches!(
            self,
            ActionType::PostflopCheck | ActionType::PostflopBet | ActionType::PostflopRaise
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggression {
    None,
    Small,
    Standard,
    Aggressive,
    VeryAggressive,
}

impl Aggression {
    /// Preflop: raise size as a multiple of the previous bet level.
    fn from_raise_multiple(multiple: f64) -> Aggression {
        if multiple <= 0.0 {
            Aggression::None
        } else if multiple < 2.0 {
            Aggression::Small
        } else if multiple <= 3.0 {
            Aggression::Standard
        } else if multiple <= 4.5 {
            Aggression::Aggressive
        } else {
            Aggression::VeryAggressive
        }
    }

    /// Postflop: bet as a fraction of the pot it was made into.
    fn from_pot_fraction(fraction: f64) -> Aggression {
        if fraction <= 0.0 {
            Aggression::None
        } else if fraction <= 0.33 {
            Aggression::Small
        } else if fraction <= 0.75 {
            Aggression::Standard
        } else if fraction <= 1.0 {
            Aggression::Aggressive
        } else {
            Aggression::VeryAggressive
        }
    }
}

impl fmt::Display for Aggression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggression::None => write!(f, "none"),
            Aggression::Small => write!(f, "small"),
            Aggression::Standard => write!(f, "standard"),
            Aggression::Aggressive => write!(f, "aggressive"),
            Aggression::VeryAggressive => write!(f, "very aggressive"),
        }
    }
}

/// What the hero is facing, derived fresh from one game state.
///
/// `sizing` is in big blinds preflop and a pot fraction postflop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAnalysis {
    pub action_type: ActionType,
    pub sizing: f64,
    pub aggression: Aggression,
    pub raiser_count: u32,
    pub limper_count: u32,
    pub cold_caller_count: u32,
}

#[derive(Default)]
struct EventCounts {
    raisers: u32,
    limpers: u32,
    cold_callers: u32,
    largest_raise: f64,
}

fn count_events(state: &GameState, bb: f64) -> EventCounts {
    if state.betting_action.is_empty() {
        return count_bets(state, bb);
    }
    let mut counts = EventCounts::default();
    for event in &state.betting_action {
        match event.action {
            kind if kind.is_aggressive() => {
                counts.raisers += 1;
                counts.largest_raise = counts.largest_raise.max(event.amount);
            }
            EventKind::Call | EventKind::Limp if counts.raisers == 0 => counts.limpers += 1,
            EventKind::Call => counts.cold_callers += 1,
            _ => {}
        }
    }
    counts
}

/// Reconstructs the round from what each opponent has in front of them.
///
/// Walking the amounts upwards, every new level is a raise and a repeat of
/// the current level is a call. Preflop, amounts at one big blind are limps
/// (less the big blind's own post when the hero is not the big blind) and
/// anything below it is a blind.
fn count_bets(state: &GameState, bb: f64) -> EventCounts {
    let preflop = !state.street.is_postflop();
    let floor = if preflop { bb } else { 0.0 };
    let mut amounts: Vec<f64> = state
        .opponent_bets
        .iter()
        .map(|b| b.bet)
        .filter(|&bet| bet.is_finite() && bet > 0.0 && (!preflop || bet >= bb - 1e-9))
        .collect();
    amounts.sort_by(f64::total_cmp);

    let mut counts = EventCounts::default();
    let mut level = floor;
    for amount in amounts {
        if amount > level + 1e-9 {
            counts.raisers += 1;
            counts.largest_raise = amount;
            level = amount;
        } else if counts.raisers == 0 {
            counts.limpers += 1;
        } else {
            counts.cold_callers += 1;
        }
    }
    if preflop && state.position != Position::BB {
        counts.limpers = counts.limpers.saturating_sub(1);
    }
    counts
}

fn posted_blind(position: Position) -> f64 {
    match position {
        Position::SB => 0.5,
        Position::BB => 1.0,
        _ => 0.0,
    }
}

/// Classifies the situation in `state` for range lookup.
///
/// `betting_action` is read as the current betting round. Without it the
/// round is rebuilt from `opponent_bets`, and with neither the number of
/// raises is inferred from the amount to call in big blinds.
pub fn analyze_action(state: &GameState, blinds: &BlindLevels) -> ActionAnalysis {
    let bb = if blinds.big_blind > 0.0 { blinds.big_blind } else { 1.0 };
    let to_call = state.to_call.max(0.0);
    let active = state.active_players.max(2);
    let counts = count_events(state, bb);

    if state.street.is_postflop() {
        if to_call <= 0.0 {
            return ActionAnalysis {
                action_type: ActionType::PostflopCheck,
                sizing: 0.0,
                aggression: Aggression::None,
                raiser_count: 0,
                limper_count: 0,
                cold_caller_count: counts.cold_callers,
            };
        }
        let pot_before = state.pot_size - to_call;
        let fraction = if pot_before > 0.0 { to_call / pot_before } else { 1.0 };
        let action_type = if counts.raisers >= 2 {
            ActionType::PostflopRaise
        } else {
            ActionType::PostflopBet
        };
        return ActionAnalysis {
            action_type,
            sizing: fraction,
            aggression: Aggression::from_pot_fraction(fraction),
            raiser_count: counts.raisers.max(1),
            limper_count: 0,
            cold_caller_count: counts.cold_callers,
        };
    }

    let to_call_bb = to_call / bb;
    let observed = !state.betting_action.is_empty() || !state.opponent_bets.is_empty();
    let (raisers, sizing) = if !observed {
        let raisers = if to_call_bb <= 1.0 {
            0
        } else if to_call_bb <= 4.0 {
            1
        } else if to_call_bb <= 14.0 {
            2
        } else {
            3
        };
        (raisers, to_call_bb + posted_blind(state.position))
    } else if counts.largest_raise > 0.0 {
        (counts.raisers, counts.largest_raise / bb)
    } else {
        (counts.raisers, to_call_bb + posted_blind(state.position))
    };

    let action_type = match raisers {
        0 if counts.limpers > 0 => ActionType::Overlimpers,
        0 => ActionType::Unopened,
        1 if state.position.is_blind() && active == 2 => ActionType::BlindVsBlind,
        1 if active >= 4 && counts.limpers + counts.cold_callers >= 2 => ActionType::Multiway,
        1 if counts.cold_callers >= 1 => ActionType::SqueezeSpot,
        1 if counts.limpers >= 1 => ActionType::IsolateRaise,
        1 => ActionType::Facing2Bet,
        2 => ActionType::Facing3Bet,
        _ => ActionType::Facing4BetPlus,
    };

    let previous_level = match raisers {
        0 => 0.0,
        1 => 1.0,
        2 => 3.0,
        _ => 9.0,
    };
    let aggression = if previous_level > 0.0 {
        Aggression::from_raise_multiple(sizing / previous_level)
    } else {
        Aggression::None
    };

    ActionAnalysis {
        action_type,
        sizing,
        aggression,
        raiser_count: raisers,
        limper_count: counts.limpers,
        cold_caller_count: counts.cold_callers,
    }
}

// ---------------------------------------------------------------------------
// Range tables
// ---------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
struct TableEntry {
    name: String,
    range: String,
    strength: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct SizingBucket {
    max: Option<f64>,
    table: String,
}

#[derive(Deserialize, Debug)]
struct RangeFile {
    tables: HashMap<String, TableEntry>,
    lookup: HashMap<String, Vec<SizingBucket>>,
}

struct RangeTable {
    name: String,
    hands: Vec<String>,
    strength: String,
    description: String,
}

struct RangeBook {
    tables: HashMap<String, RangeTable>,
    lookup: HashMap<String, Vec<SizingBucket>>,
}

static RANGE_BOOK: Lazy<RangeBook> = Lazy::new(|| {
    let file: RangeFile =
        serde_json::from_str(OPPONENT_RANGES_JSON).expect("Failed to parse opponent ranges");
    let tables = file
        .tables
        .into_iter()
        .map(|(key, entry)| {
            let table = RangeTable {
                name: entry.name,
                hands: parse_range(&entry.range),
                strength: entry.strength,
                description: entry.description,
            };
            (key, table)
        })
        .collect();
    RangeBook {
        tables,
        lookup: file.lookup,
    }
});

/// Opponent hands attributed to an observed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentRange {
    pub key: String,
    pub action_type: ActionType,
    pub name: String,
    pub hands: Vec<String>,
    /// Label such as "Ultra Strong", "Wide" or "Polarized".
    pub strength: String,
    pub description: String,
    pub percentage: f64,
    pub sizing_context: String,
}

fn table_key_for(analysis: &ActionAnalysis) -> Option<&'static str> {
    let buckets = RANGE_BOOK.lookup.get(analysis.action_type.key())?;
    buckets
        .iter()
        .find(|b| b.max.map_or(true, |max| analysis.sizing <= max))
        .map(|b| b.table.as_str())
}

fn sizing_context(analysis: &ActionAnalysis) -> String {
    match analysis.action_type {
        ActionType::Unopened => "No action yet".to_string(),
        ActionType::Overlimpers => format!("{} limper(s)", analysis.limper_count),
        ActionType::PostflopCheck => "Checked to you".to_string(),
        t if t.is_postflop() => format!(
            "{:.0}% pot bet ({})",
            analysis.sizing * 100.0,
            analysis.aggression
        ),
        _ => format!("{:.1}bb ({})", analysis.sizing, analysis.aggression),
    }
}

/// Looks up the opponent range for `analysis`. Deterministic, never empty:
/// unknown keys fall back to the conservative default table.
pub fn estimate_range(analysis: &ActionAnalysis) -> OpponentRange {
    let book = &*RANGE_BOOK;
    let resolved = table_key_for(analysis)
        .and_then(|key| book.tables.get(key).map(|t| (key, t)))
        .filter(|(_, t)| !t.hands.is_empty());

    let (key, table) = match resolved {
        Some(found) => found,
        None => {
            log::warn!(
                "no range table for {} at sizing {:.2}, using {}",
                analysis.action_type,
                analysis.sizing,
                FALLBACK_TABLE
            );
            match book.tables.get_key_value(FALLBACK_TABLE) {
                Some((key, table)) if !table.hands.is_empty() => (key.as_str(), table),
                _ => return last_resort_range(analysis),
            }
        }
    };

    OpponentRange {
        key: key.to_string(),
        action_type: analysis.action_type,
        name: table.name.clone(),
        percentage: range_pct(&table.hands),
        hands: table.hands.clone(),
        strength: table.strength.clone(),
        description: table.description.clone(),
        sizing_context: sizing_context(analysis),
    }
}

fn last_resort_range(analysis: &ActionAnalysis) -> OpponentRange {
    let hands = range_from_top_pct(15.0)
        .unwrap_or_else(|_| HAND_RANKING.iter().take(20).map(|h| h.to_string()).collect());
    OpponentRange {
        key: FALLBACK_TABLE.to_string(),
        action_type: analysis.action_type,
        name: "Top 15%".to_string(),
        percentage: range_pct(&hands),
        hands,
        strength: "Unknown".to_string(),
        description: "Solid default range".to_string(),
        sizing_context: sizing_context(analysis),
    }
}

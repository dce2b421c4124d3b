//! Strategy synthesis: turns one game state into an action-frequency
//! recommendation with sizing and reasoning.
//!
//! The decision is routed through three situations. Unopened preflop pots use
//! the opening charts, preflop pots with action use equity against the range
//! the action implies, and later streets use a hand-type classification.
//! Facing-action and postflop branches are table-driven: each situation maps
//! to a small generator function that can be exercised on its own.

use log::{debug, info, warn};

use crate::cards::{ensure_distinct, simplify_hand, Card, CardInput};
use crate::config::{validate_blinds, AdvisorConfig};
use crate::equity::{calculate_equity, calculate_outs, OutsResult};
use crate::error::{AdvisorError, AdvisorResult};
use crate::game_state::{Advice, BlindLevels, GameState, StackDepth, StackDepthInfo, Street};
use crate::hand_evaluator::{evaluate_holding, preflop_strength, preflop_strength_from_inputs};
use crate::hand_type::{
    classify_postflop, classify_preflop, explain_approach, BettingPurpose, HandType,
};
use crate::math_engine::{implied_odds, pot_odds, spr, SprZone};
use crate::positions::{explain_position, Position};
use crate::postflop::{analyze_board, BoardTexture};
use crate::preflop::{classify_opening, open_size_bb, OpeningClass};
use crate::range_estimator::{
    analyze_action, estimate_range, ActionAnalysis, ActionType, Aggression, OpponentRange,
};
use crate::strategy::{confidence, Action, HashNoise, NoJitter, NoiseSource, Strategy};

/// Fallback calls when the price is below this share of the pot.
const FALLBACK_CALL_FRACTION: f64 = 0.3;
/// A raise that commits this share of the stack is made all-in instead.
const COMMIT_FRACTION: f64 = 0.4;
const DEFAULT_STACK_BB: f64 = 100.0;
const QUICK_REASONING_CHARS: usize = 100;

pub struct Advisor {
    config: AdvisorConfig,
    noise: Box<dyn NoiseSource>,
}

impl Default for Advisor {
    fn default() -> Self {
        Advisor::new(AdvisorConfig::default())
    }
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Self {
        let noise: Box<dyn NoiseSource> = if config.jitter {
            Box::new(HashNoise::default())
        } else {
            Box::new(NoJitter)
        };
        Advisor { config, noise }
    }

    /// Builds an advisor with an explicit confidence-jitter source.
    pub fn with_noise(config: AdvisorConfig, noise: Box<dyn NoiseSource>) -> Self {
        Advisor { config, noise }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn blind_levels(&self) -> BlindLevels {
        self.config.blinds
    }

    /// Replaces the blind levels used for stack depth and sizing.
    /// Invalid levels are rejected and the previous ones kept.
    pub fn update_blind_levels(&mut self, blinds: BlindLevels) -> AdvisorResult<()> {
        validate_blinds(&blinds)?;
        info!(
            "blind levels updated to {}/{}",
            blinds.small_blind, blinds.big_blind
        );
        self.config.blinds = blinds;
        Ok(())
    }

    /// Recommendation for `state`. Never fails: unreadable hole cards give a
    /// pure fold with zero confidence, and any other failure falls back to a
    /// pot-odds-only decision that carries the error in its reasoning.
    pub fn get_advice(&self, state: &GameState) -> Advice {
        let hole = match read_hole_cards(&state.hole_cards) {
            Ok(cards) => cards,
            Err(e) => {
                warn!("no usable hole cards: {}", e);
                return Advice::fold_safe(format!("Cannot read hole cards ({}), folding", e));
            }
        };

        match self.compute(state, hole) {
            Ok(advice) => advice,
            Err(e) => {
                warn!("advice computation failed, using pot-odds fallback: {}", e);
                self.fallback(state, &AdvisorError::AdviceComputation(e.to_string()))
            }
        }
    }

    /// Heads-up, 100bb advice from the bare essentials, with the reasoning
    /// cut to a short line.
    pub fn quick_advice(
        &self,
        hole_cards: &[CardInput],
        board_cards: &[CardInput],
        position: Position,
        pot: f64,
        to_call: f64,
    ) -> Advice {
        let state = GameState {
            street: Street::from_board_len(board_cards.len()),
            position,
            pot_size: pot,
            to_call,
            stack_size: DEFAULT_STACK_BB * self.config.blinds.big_blind,
            active_players: 2,
            hole_cards: hole_cards.to_vec(),
            board_cards: board_cards.to_vec(),
            is_my_turn: true,
            ..Default::default()
        };
        let mut advice = self.get_advice(&state);
        advice.reasoning = truncate_chars(&advice.reasoning, QUICK_REASONING_CHARS);
        advice
    }

    fn compute(&self, state: &GameState, hole: Vec<Card>) -> AdvisorResult<Advice> {
        let board = read_board(&state.board_cards)?;
        let mut all = hole.clone();
        all.extend_from_slice(&board);
        ensure_distinct(&all)?;

        let street = Street::from_board_len(board.len());
        let blinds = self.config.blinds;
        let analysis = if street == state.street {
            analyze_action(state, &blinds)
        } else {
            debug!("reported street {} but board implies {}", state.street, street);
            let mut corrected = state.clone();
            corrected.street = street;
            analyze_action(&corrected, &blinds)
        };

        let stack = if state.stack_size > 0.0 {
            state.stack_size
        } else {
            DEFAULT_STACK_BB * blinds.big_blind
        };

        let spot = Spot {
            state,
            notation: simplify_hand(&hole)?,
            hole,
            board,
            street,
            blinds,
            pot: state.pot_size.max(0.0),
            to_call: state.to_call.max(0.0),
            stack,
            stack_info: StackDepthInfo::new(stack, &blinds),
            analysis,
        };

        let decision = match street {
            Street::Preflop if analysis.action_type == ActionType::Unopened => self.opening(&spot),
            Street::Preflop => self.facing_action(&spot)?,
            _ => self.postflop(&spot)?,
        };
        Ok(self.finalize(&spot, decision))
    }

    fn equity_vs(&self, spot: &Spot, range: &OpponentRange, samples: usize) -> AdvisorResult<f64> {
        let hands = range.hands.as_slice();
        let result = match calculate_equity(&spot.hole, Some(hands), &spot.board, samples) {
            Err(AdvisorError::NoValidCombos) => {
                debug!("board and hole cards block {}, sampling vs random", range.name);
                calculate_equity(&spot.hole, None, &spot.board, samples)?
            }
            other => other?,
        };
        Ok(result.equity_percent())
    }

    // -----------------------------------------------------------------------
    // Opening
    // -----------------------------------------------------------------------

    fn opening(&self, spot: &Spot) -> Decision {
        let position = spot.position();
        let strength = preflop_strength(&spot.hole);
        let class = classify_opening(&spot.notation, position);
        let depth = spot.stack_info.depth;

        let position_bonus = if position.is_late() {
            8.0
        } else if position.is_early() {
            -8.0
        } else {
            0.0
        };

        let (mut raise, node): (f64, &str) = match class {
            OpeningClass::InRangeRaise => (95.0, "open:in_range"),
            OpeningClass::InMixedRange => (55.0 + position_bonus, "open:mixed"),
            OpeningClass::OutsideRange if position.is_late() && strength.strength >= 30.0 => {
                (8.0, "open:steal")
            }
            OpeningClass::OutsideRange => (3.0, "open:outside"),
        };

        match class {
            OpeningClass::InMixedRange if depth.is_shallow() => raise -= 15.0,
            OpeningClass::OutsideRange if depth.is_shallow() => raise = 0.0,
            OpeningClass::InMixedRange if depth == StackDepth::VeryDeep => raise += 5.0,
            _ => {}
        }
        if spot.active() > 6 && class != OpeningClass::InRangeRaise {
            raise -= 5.0;
        }
        let raise = raise.clamp(0.0, 100.0);

        let bb = spot.bb();
        let mut size = open_size_bb(position) * bb;
        if depth == StackDepth::VeryDeep && class == OpeningClass::OutsideRange {
            size -= 0.25 * bb;
        }
        if depth == StackDepth::VeryShort && class == OpeningClass::InRangeRaise {
            size = spot.stack;
        }

        let hand_type = classify_preflop(strength.strength, strength.is_suited, class, None);
        let notes = vec![
            format!(
                "{} ({}, strength {:.0}/100)",
                spot.notation, strength.description, strength.strength
            ),
            format!("{}: {}", position, class),
            explain_position(position).to_string(),
            format!(
                "{:.0}bb effective, {}",
                spot.stack_info.big_blinds, spot.stack_info.depth
            ),
        ];

        Decision {
            weights: vec![(Action::Raise, raise), (Action::Fold, 100.0 - raise)],
            raise_size: size,
            node,
            keeps_fold: position != Position::BB,
            notes,
            hand_type: Some(hand_type),
            hand_strength: strength.strength,
            ..Default::default()
        }
    }

    // -----------------------------------------------------------------------
    // Facing preflop action
    // -----------------------------------------------------------------------

    fn facing_action(&self, spot: &Spot) -> AdvisorResult<Decision> {
        let analysis = &spot.analysis;
        let rule = facing_rule(analysis.action_type);
        let strength = preflop_strength(&spot.hole);
        let class = classify_opening(&spot.notation, spot.position());

        let range = estimate_range(analysis);
        let equity = self.equity_vs(spot, &range, self.config.preflop_samples)?;
        let required = if spot.to_call > 0.0 {
            pot_odds(spot.pot, spot.to_call)?.percentage
        } else {
            0.0
        };
        let margin = equity - required;

        let (mut raise, mut call, mut fold) = margin_band(margin);

        if spot.position().is_late() && fold >= 10.0 {
            call += 5.0;
            fold -= 5.0;
        } else if spot.position() == Position::SB {
            call -= 5.0;
            fold += 5.0;
        }

        match analysis.aggression {
            Aggression::Small if fold >= 10.0 => {
                raise += 5.0;
                fold -= 5.0;
            }
            Aggression::VeryAggressive => {
                raise -= 5.0;
                call -= 5.0;
                fold += 10.0;
            }
            _ => {}
        }

        let depth = spot.stack_info.depth;
        if depth.is_shallow() {
            raise += call / 2.0;
            call /= 2.0;
        } else if depth == StackDepth::VeryDeep {
            call += 5.0;
            raise -= 5.0;
        }

        if analysis.action_type == ActionType::Multiway && margin < 10.0 {
            fold += raise;
            raise = 0.0;
        }

        let hand_type = classify_preflop(strength.strength, strength.is_suited, class, Some(equity));
        let notes = vec![
            format!(
                "{} ({}, strength {:.0}/100)",
                spot.notation, strength.description, strength.strength
            ),
            format!(
                "Facing {} ({}): {}",
                analysis.action_type, range.sizing_context, rule.note
            ),
            format!(
                "Villain range {} [{}], ~{:.0}% of hands",
                range.name, range.strength, range.percentage
            ),
            format!("Equity {:.1}% vs {:.1}% needed", equity, required),
            format!(
                "{:.0}bb effective, {}",
                spot.stack_info.big_blinds, spot.stack_info.depth
            ),
        ];

        Ok(Decision {
            weights: vec![
                (rule.raise_action, raise.max(0.0)),
                (Action::Call, call.max(0.0)),
                (Action::Fold, fold.max(0.0)),
            ],
            raise_size: (rule.sizing)(spot),
            node: rule.node,
            notes,
            hand_type: Some(hand_type),
            hand_strength: strength.strength,
            equity: Some(equity),
            pot_odds: (spot.to_call > 0.0).then_some(required),
            opponent_range: Some(range),
            ..Default::default()
        })
    }

    // -----------------------------------------------------------------------
    // Postflop
    // -----------------------------------------------------------------------

    fn postflop(&self, spot: &Spot) -> AdvisorResult<Decision> {
        let hand = evaluate_holding(&spot.hole, &spot.board)?;
        let texture = analyze_board(&spot.board)?;
        let outs = calculate_outs(&spot.hole, &spot.board)?;
        let range = estimate_range(&spot.analysis);
        let equity = self.equity_vs(spot, &range, self.config.postflop_samples)?;

        let hand_type = classify_postflop(&hand, &spot.hole, &spot.board, &outs, equity, &texture);
        let purpose = hand_type.purpose();
        let facing = spot.to_call > 0.0;
        let required = if facing {
            pot_odds(spot.pot, spot.to_call)?.percentage
        } else {
            0.0
        };
        let implied = implied_odds(outs.outs, spot.street.cards_to_come());
        let spr_zone = spr(spot.stack, spot.pot)
            .map(|s| s.zone)
            .unwrap_or(SprZone::High);

        let ctx = PostflopContext {
            spot,
            hand_type,
            equity,
            required,
            implied_pct: implied.percentage,
            texture: &texture,
            spr_zone,
        };
        let handler = postflop_handler(facing, purpose);
        let line = handler(&ctx);

        let mut notes = vec![
            format!("{} on {}", hand.description, texture.category),
            outs.description.clone(),
            format!(
                "Villain range {} [{}] ({})",
                range.name, range.strength, range.sizing_context
            ),
        ];
        if facing {
            notes.push(format!("Equity {:.1}% vs {:.1}% needed", equity, required));
        } else {
            notes.push(format!("Equity {:.1}%", equity));
        }
        if spr_zone == SprZone::Low {
            notes.push("Low SPR, commit with value".to_string());
        }

        let implied_text = (outs.outs > 0 && spot.street.cards_to_come() > 0).then(|| {
            format!(
                "{} ({} outs, {} to come)",
                implied,
                outs.outs,
                spot.street.cards_to_come()
            )
        });

        Ok(Decision {
            weights: line.weights,
            raise_size: line.size,
            node: line.node,
            keeps_fold: false,
            notes,
            hand_type: Some(hand_type),
            hand_strength: equity,
            equity: Some(equity),
            pot_odds: facing.then_some(required),
            outs: Some(outs),
            board_texture: Some(texture.category.clone()),
            opponent_range: Some(range),
            implied_odds: implied_text,
        })
    }

    // -----------------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------------

    fn finalize(&self, spot: &Spot, decision: Decision) -> Advice {
        let weights: Vec<(Action, f64)> = if spot.to_call <= 0.0 && !decision.keeps_fold {
            decision
                .weights
                .iter()
                .map(|&(a, w)| match a {
                    Action::Fold | Action::Call => (Action::Check, w),
                    _ => (a, w),
                })
                .collect()
        } else {
            decision.weights.clone()
        };
        let strategy = Strategy::from_weights(&weights);
        let primary = strategy.primary_action();

        let bet_size = if primary.is_aggressive() {
            spot.commit(decision.raise_size)
        } else if primary == Action::Call {
            round_chips(spot.to_call.min(spot.stack))
        } else {
            0.0
        };

        let key = spot.decision_key();
        let confidence = confidence(&strategy, &*self.noise, &key);

        debug!(
            "decision node {} for {} at {}: {} -> {}",
            decision.node,
            spot.notation,
            spot.position(),
            strategy,
            primary
        );

        let mut reasoning = decision.notes.join(". ");
        reasoning.push_str(&format!(". Strategy: {}", strategy));
        if primary.is_aggressive() {
            reasoning.push_str(&format!(" (size {:.2})", bet_size));
        }
        if let Some(hand_type) = decision.hand_type {
            reasoning.push_str(&format!(". {}", explain_approach(hand_type)));
        }

        Advice {
            primary_action: primary,
            strategy,
            bet_size,
            confidence,
            reasoning,
            hand_strength: decision.hand_strength,
            hand_type: decision.hand_type,
            betting_purpose: decision.hand_type.map(HandType::purpose),
            equity: decision.equity,
            pot_odds: decision.pot_odds,
            hand_notation: Some(spot.notation.clone()),
            stack_depth_info: Some(spot.stack_info.clone()),
            outs: decision.outs,
            board_texture: decision.board_texture,
            opponent_range: decision.opponent_range,
            implied_odds: decision.implied_odds,
        }
    }

    fn fallback(&self, state: &GameState, error: &AdvisorError) -> Advice {
        let pot = state.pot_size.max(0.0);
        let to_call = state.to_call.max(0.0);
        let (action, why) = if to_call <= 0.0 {
            (Action::Check, "nothing to call")
        } else if to_call < FALLBACK_CALL_FRACTION * pot {
            (Action::Call, "cheap relative to the pot")
        } else {
            (Action::Fold, "too expensive without a read")
        };

        let strategy = Strategy::pure(action);
        let key = format!("fallback|{}|{:.2}|{:.2}", state.position, pot, to_call);
        let mut advice = Advice::fold_safe(format!(
            "Simplified pot-odds decision after error ({}): {}",
            error, why
        ));
        advice.primary_action = action;
        advice.confidence = confidence(&strategy, &*self.noise, &key);
        advice.strategy = strategy;
        advice.bet_size = if action == Action::Call { to_call } else { 0.0 };
        advice.hand_strength = preflop_strength_from_inputs(&state.hole_cards).strength;
        advice.pot_odds = pot_odds(pot, to_call).ok().map(|p| p.percentage);
        advice
    }
}

// ---------------------------------------------------------------------------
// Per-call context
// ---------------------------------------------------------------------------

struct Spot<'a> {
    state: &'a GameState,
    hole: Vec<Card>,
    board: Vec<Card>,
    street: Street,
    blinds: BlindLevels,
    pot: f64,
    to_call: f64,
    stack: f64,
    stack_info: StackDepthInfo,
    notation: String,
    analysis: ActionAnalysis,
}

impl Spot<'_> {
    fn position(&self) -> Position {
        self.state.position
    }

    fn active(&self) -> u32 {
        self.state.active_players.max(2)
    }

    fn bb(&self) -> f64 {
        self.blinds.big_blind
    }

    /// Caps a raise at the stack; sizes near commitment become all-in.
    fn commit(&self, size: f64) -> f64 {
        let floor = (2.0 * self.to_call).max(self.bb());
        let size = size.max(floor);
        if size >= self.stack * COMMIT_FRACTION {
            round_chips(self.stack)
        } else {
            round_chips(size)
        }
    }

    fn decision_key(&self) -> String {
        let board: Vec<String> = self.board.iter().map(|c| c.to_string()).collect();
        format!(
            "{}|{}|{}|{}|{:.2}|{:.2}",
            self.notation,
            board.join(""),
            self.position(),
            self.street,
            self.pot,
            self.to_call
        )
    }
}

#[derive(Default)]
struct Decision {
    weights: Vec<(Action, f64)>,
    raise_size: f64,
    node: &'static str,
    /// Unopened pots keep their folds; elsewhere a free fold or call is a check.
    keeps_fold: bool,
    notes: Vec<String>,
    hand_type: Option<HandType>,
    hand_strength: f64,
    equity: Option<f64>,
    pot_odds: Option<f64>,
    outs: Option<OutsResult>,
    board_texture: Option<String>,
    opponent_range: Option<OpponentRange>,
    implied_odds: Option<String>,
}

// ---------------------------------------------------------------------------
// Facing-action dispatch
// ---------------------------------------------------------------------------

struct FacingRule {
    action_type: ActionType,
    raise_action: Action,
    node: &'static str,
    note: &'static str,
    sizing: fn(&Spot) -> f64,
}

static FACING_RULES: [FacingRule; 9] = [
    FacingRule {
        action_type: ActionType::Facing2Bet,
        raise_action: Action::ThreeBet,
        node: "facing:open",
        note: "3-bet or flat an open",
        sizing: three_bet_size,
    },
    FacingRule {
        action_type: ActionType::Facing3Bet,
        raise_action: Action::FourBet,
        node: "facing:3bet",
        note: "4-bet or continue vs a 3-bet",
        sizing: four_bet_size,
    },
    FacingRule {
        action_type: ActionType::Facing4BetPlus,
        raise_action: Action::Raise,
        node: "facing:4bet",
        note: "jam or fold vs a 4-bet",
        sizing: jam_size,
    },
    FacingRule {
        action_type: ActionType::Overlimpers,
        raise_action: Action::Raise,
        node: "facing:limpers",
        note: "isolate the limpers",
        sizing: isolation_size,
    },
    FacingRule {
        action_type: ActionType::IsolateRaise,
        raise_action: Action::ThreeBet,
        node: "facing:isolation",
        note: "re-raise an isolation raise",
        sizing: three_bet_size,
    },
    FacingRule {
        action_type: ActionType::SqueezeSpot,
        raise_action: Action::ThreeBet,
        node: "facing:squeeze",
        note: "squeeze the raiser and callers",
        sizing: squeeze_size,
    },
    FacingRule {
        action_type: ActionType::Multiway,
        raise_action: Action::ThreeBet,
        node: "facing:multiway",
        note: "several players in, value only",
        sizing: squeeze_size,
    },
    FacingRule {
        action_type: ActionType::BlindVsBlind,
        raise_action: Action::ThreeBet,
        node: "facing:blind_vs_blind",
        note: "defend wide against a blind steal",
        sizing: three_bet_size,
    },
    FacingRule {
        action_type: ActionType::Complex,
        raise_action: Action::Raise,
        node: "facing:complex",
        note: "tangled action, play a solid range",
        sizing: three_bet_size,
    },
];

fn facing_rule(action_type: ActionType) -> &'static FacingRule {
    FACING_RULES
        .iter()
        .find(|r| r.action_type == action_type)
        .unwrap_or(&FACING_RULES[FACING_RULES.len() - 1])
}

/// (raise, call, fold) by equity margin over the pot-odds requirement.
fn margin_band(margin: f64) -> (f64, f64, f64) {
    if margin >= 20.0 {
        (70.0, 25.0, 5.0)
    } else if margin >= 10.0 {
        (35.0, 55.0, 10.0)
    } else if margin >= 0.0 {
        (10.0, 60.0, 30.0)
    } else if margin >= -8.0 {
        (5.0, 30.0, 65.0)
    } else {
        (3.0, 5.0, 92.0)
    }
}

fn in_position(spot: &Spot) -> bool {
    spot.position().is_late() || spot.position() == Position::HJ
}

fn three_bet_size(spot: &Spot) -> f64 {
    let multiple = if in_position(spot) { 3.0 } else { 4.0 };
    spot.analysis.sizing.max(2.0) * multiple * spot.bb()
}

fn four_bet_size(spot: &Spot) -> f64 {
    spot.analysis.sizing.max(6.0) * 2.2 * spot.bb()
}

fn jam_size(spot: &Spot) -> f64 {
    spot.stack
}

fn isolation_size(spot: &Spot) -> f64 {
    (open_size_bb(spot.position()) + 1.0 + spot.analysis.limper_count as f64) * spot.bb()
}

fn squeeze_size(spot: &Spot) -> f64 {
    three_bet_size(spot) + spot.analysis.sizing * spot.analysis.cold_caller_count as f64 * spot.bb()
}

// ---------------------------------------------------------------------------
// Postflop dispatch
// ---------------------------------------------------------------------------

struct PostflopContext<'a> {
    spot: &'a Spot<'a>,
    hand_type: HandType,
    equity: f64,
    required: f64,
    implied_pct: f64,
    texture: &'a BoardTexture,
    spr_zone: SprZone,
}

impl PostflopContext<'_> {
    fn pot_fraction(&self, fraction: f64) -> f64 {
        self.spot.pot * fraction
    }

    fn raise_to(&self, fraction: f64) -> f64 {
        self.spot.to_call + self.spot.pot * fraction
    }

    fn heads_up(&self) -> bool {
        self.spot.active() <= 2
    }

    fn good_position(&self) -> bool {
        self.spot.position().value() >= 7
    }
}

struct Line {
    weights: Vec<(Action, f64)>,
    size: f64,
    node: &'static str,
}

type PostflopHandler = fn(&PostflopContext) -> Line;

/// Keyed by (facing a bet, betting purpose).
static POSTFLOP_HANDLERS: [(bool, BettingPurpose, PostflopHandler); 12] = [
    (false, BettingPurpose::Value, value_bet),
    (false, BettingPurpose::Mixed, mixed_bet),
    (false, BettingPurpose::SemiBluff, semi_bluff_bet),
    (false, BettingPurpose::Bluff, bluff_bet),
    (false, BettingPurpose::BluffCatcher, bluff_catcher_bet),
    (false, BettingPurpose::Fold, give_up_bet),
    (true, BettingPurpose::Value, value_raise),
    (true, BettingPurpose::Mixed, mixed_call),
    (true, BettingPurpose::SemiBluff, semi_bluff_raise),
    (true, BettingPurpose::Bluff, bluff_raise),
    (true, BettingPurpose::BluffCatcher, bluff_catcher_call),
    (true, BettingPurpose::Fold, give_up_call),
];

fn postflop_handler(facing: bool, purpose: BettingPurpose) -> PostflopHandler {
    POSTFLOP_HANDLERS
        .iter()
        .find(|(f, p, _)| *f == facing && *p == purpose)
        .map(|(_, _, h)| *h)
        .unwrap_or_else(|| if facing { give_up_call } else { give_up_bet })
}

fn value_fraction(ctx: &PostflopContext, base: f64) -> f64 {
    if ctx.texture.is_draw_heavy() {
        base
    } else {
        base + 0.1
    }
}

fn value_bet(ctx: &PostflopContext) -> Line {
    let (bet, base) = match ctx.hand_type {
        HandType::NutsStrong => (85.0, 0.75),
        _ => (75.0, 0.66),
    };
    if ctx.spr_zone == SprZone::Low {
        return Line {
            weights: vec![(Action::Bet, 90.0), (Action::Check, 10.0)],
            size: ctx.spot.stack,
            node: "postflop:value_commit",
        };
    }
    Line {
        weights: vec![(Action::Bet, bet), (Action::Check, 100.0 - bet)],
        size: ctx.pot_fraction(value_fraction(ctx, base)),
        node: "postflop:value_bet",
    }
}

fn mixed_bet(ctx: &PostflopContext) -> Line {
    let (bet, fraction) = if ctx.good_position() {
        (40.0, 0.4)
    } else {
        (20.0, 0.33)
    };
    Line {
        weights: vec![(Action::Bet, bet), (Action::Check, 100.0 - bet)],
        size: ctx.pot_fraction(fraction),
        node: "postflop:thin_value",
    }
}

fn semi_bluff_fraction(ctx: &PostflopContext, base: f64) -> f64 {
    if ctx.texture.is_draw_heavy() {
        base + 0.15
    } else {
        base
    }
}

fn semi_bluff_bet(ctx: &PostflopContext) -> Line {
    let (bet, base) = match ctx.hand_type {
        HandType::StrongDraw => (70.0, 0.6),
        HandType::MediumDraw => (45.0, 0.5),
        _ => (25.0, 0.4),
    };
    let bet = if ctx.heads_up() { bet } else { bet - 15.0 };
    Line {
        weights: vec![(Action::Bet, bet), (Action::Check, 100.0 - bet)],
        size: ctx.pot_fraction(semi_bluff_fraction(ctx, base)),
        node: "postflop:semi_bluff",
    }
}

fn bluff_bet(ctx: &PostflopContext) -> Line {
    let bet = if !ctx.heads_up() {
        5.0
    } else if ctx.good_position() {
        35.0
    } else {
        15.0
    };
    Line {
        weights: vec![(Action::Bet, bet), (Action::Check, 100.0 - bet)],
        size: ctx.pot_fraction(0.5),
        node: "postflop:bluff",
    }
}

fn bluff_catcher_bet(ctx: &PostflopContext) -> Line {
    Line {
        weights: vec![(Action::Check, 85.0), (Action::Bet, 15.0)],
        size: ctx.pot_fraction(0.33),
        node: "postflop:pot_control",
    }
}

fn give_up_bet(ctx: &PostflopContext) -> Line {
    let bet = if ctx.heads_up() && !ctx.texture.is_draw_heavy() {
        10.0
    } else {
        0.0
    };
    Line {
        weights: vec![(Action::Check, 100.0 - bet), (Action::Bet, bet)],
        size: ctx.pot_fraction(0.33),
        node: "postflop:give_up",
    }
}

fn value_raise(ctx: &PostflopContext) -> Line {
    let (mut raise, mut call, fold, base) = match ctx.hand_type {
        HandType::NutsStrong => (75.0, 25.0, 0.0, 0.8),
        _ => (25.0, 60.0, 15.0, 0.6),
    };
    if ctx.spr_zone == SprZone::Low {
        raise += call / 2.0;
        call /= 2.0;
    }
    Line {
        weights: vec![(Action::Raise, raise), (Action::Call, call), (Action::Fold, fold)],
        size: ctx.raise_to(value_fraction(ctx, base)),
        node: "postflop:value_raise",
    }
}

fn mixed_call(ctx: &PostflopContext) -> Line {
    let (raise, mut call, mut fold) = if ctx.equity >= ctx.required + 10.0 {
        (10.0, 70.0, 20.0)
    } else if ctx.equity >= ctx.required {
        (5.0, 60.0, 35.0)
    } else {
        (0.0, 25.0, 75.0)
    };
    if ctx.spot.analysis.aggression == Aggression::VeryAggressive {
        call -= 10.0;
        fold += 10.0;
    }
    Line {
        weights: vec![(Action::Raise, raise), (Action::Call, call), (Action::Fold, fold)],
        size: ctx.raise_to(0.6),
        node: "postflop:mixed_defend",
    }
}

fn semi_bluff_raise(ctx: &PostflopContext) -> Line {
    let priced_in = ctx.equity >= ctx.required || ctx.implied_pct >= ctx.required;
    let (raise, call, fold) = match (ctx.hand_type, priced_in) {
        (HandType::StrongDraw, true) => (30.0, 60.0, 10.0),
        (HandType::StrongDraw, false) => (25.0, 35.0, 40.0),
        (HandType::MediumDraw, true) => (20.0, 70.0, 10.0),
        (HandType::MediumDraw, false) => (0.0, 25.0, 75.0),
        (_, true) => (5.0, 40.0, 55.0),
        (_, false) => (5.0, 10.0, 85.0),
    };
    let raise = if ctx.heads_up() { raise } else { raise / 2.0 };
    Line {
        weights: vec![(Action::Raise, raise), (Action::Call, call), (Action::Fold, fold)],
        size: ctx.raise_to(semi_bluff_fraction(ctx, 0.5)),
        node: "postflop:semi_bluff_raise",
    }
}

fn bluff_raise(ctx: &PostflopContext) -> Line {
    let raise = if ctx.heads_up() { 5.0 } else { 0.0 };
    let call = if ctx.equity >= ctx.required { 10.0 } else { 5.0 };
    Line {
        weights: vec![
            (Action::Fold, 100.0 - raise - call),
            (Action::Call, call),
            (Action::Raise, raise),
        ],
        size: ctx.raise_to(0.75),
        node: "postflop:bluff_raise",
    }
}

fn bluff_catcher_call(ctx: &PostflopContext) -> Line {
    let (mut call, mut fold) = if ctx.equity >= ctx.required {
        (65.0, 35.0)
    } else {
        (30.0, 70.0)
    };
    if ctx.spot.analysis.aggression == Aggression::VeryAggressive {
        call -= 10.0;
        fold += 10.0;
    }
    Line {
        weights: vec![(Action::Call, call), (Action::Fold, fold)],
        size: 0.0,
        node: "postflop:bluff_catch",
    }
}

fn give_up_call(ctx: &PostflopContext) -> Line {
    let call = if ctx.equity >= ctx.required { 10.0 } else { 5.0 };
    Line {
        weights: vec![(Action::Fold, 100.0 - call), (Action::Call, call)],
        size: 0.0,
        node: "postflop:fold",
    }
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn read_hole_cards(inputs: &[CardInput]) -> AdvisorResult<Vec<Card>> {
    if inputs.len() != 2 {
        return Err(AdvisorError::InsufficientCards {
            need: 2,
            got: inputs.len(),
        });
    }
    let cards = inputs
        .iter()
        .map(Card::parse)
        .collect::<AdvisorResult<Vec<Card>>>()?;
    ensure_distinct(&cards)?;
    Ok(cards)
}

/// Board cards that fail to parse are skipped.
fn read_board(inputs: &[CardInput]) -> AdvisorResult<Vec<Card>> {
    let mut board = Vec::with_capacity(inputs.len());
    for input in inputs {
        match Card::parse(input) {
            Ok(card) => board.push(card),
            Err(e) => warn!("skipping unreadable board card: {}", e),
        }
    }
    if board.len() > 5 || (1..3).contains(&board.len()) {
        return Err(AdvisorError::InvalidBoardNotation(format!(
            "board must hold 0, 3, 4 or 5 cards, got {}",
            board.len()
        )));
    }
    Ok(board)
}

fn round_chips(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_facing_type_has_a_rule() {
        for t in [
            ActionType::Facing2Bet,
            ActionType::Facing3Bet,
            ActionType::Facing4BetPlus,
            ActionType::Overlimpers,
            ActionType::IsolateRaise,
            ActionType::SqueezeSpot,
            ActionType::Multiway,
            ActionType::BlindVsBlind,
        ] {
            assert_eq!(facing_rule(t).action_type, t);
        }
        assert_eq!(facing_rule(ActionType::PostflopBet).action_type, ActionType::Complex);
    }

    #[test]
    fn test_margin_bands_keep_some_fold() {
        for margin in [-30.0, -5.0, 0.0, 12.0, 40.0] {
            let (raise, call, fold) = margin_band(margin);
            assert_eq!(raise + call + fold, 100.0);
            assert!(fold > 0.0);
        }
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let text = "♠".repeat(150);
        let cut = truncate_chars(&text, 100);
        assert_eq!(cut.chars().count(), 100);
        assert!(cut.ends_with("..."));
    }
}

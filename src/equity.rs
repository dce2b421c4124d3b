use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::cards::{ensure_distinct, Card, Deck};
use crate::error::{AdvisorError, AdvisorResult};
use crate::hand_evaluator::{compare_hands, evaluate_holding, made_category, HandCategory};
use crate::ranges::live_combos;

#[derive(Debug, Clone, Serialize)]
pub struct OutsResult {
    pub outs: u32,
    pub by_category: BTreeMap<HandCategory, u32>,
    pub improving_cards: Vec<Card>,
    /// Outs to a straight or better that the board plus the card does not
    /// already make on its own.
    pub live_draw_outs: u32,
    pub description: String,
}

impl OutsResult {
    fn none(description: &str) -> Self {
        OutsResult {
            outs: 0,
            by_category: BTreeMap::new(),
            improving_cards: Vec::new(),
            live_draw_outs: 0,
            description: description.to_string(),
        }
    }

    /// Drawing outs that need the hole cards, used to grade draws.
    pub fn draw_outs(&self) -> u32 {
        self.live_draw_outs
    }
}

fn outs_description(outs: u32, by_category: &BTreeMap<HandCategory, u32>) -> String {
    if outs == 0 {
        return "No outs - drawing dead".to_string();
    }
    let parts: Vec<String> = by_category
        .iter()
        .rev()
        .map(|(cat, n)| format!("{} {}", n, cat.to_string().to_lowercase()))
        .collect();
    format!("{} outs: {}", outs, parts.join(", "))
}

/// Counts unseen cards that strictly raise the made strength of the hand.
///
/// Made strength is the category plus the ranks that define it, so a card
/// that only changes a kicker is not an out but one that pairs the board is.
pub fn calculate_outs(hole_cards: &[Card], board: &[Card]) -> AdvisorResult<OutsResult> {
    validate_cards(hole_cards, board)?;
    if board.len() < 3 {
        return Err(AdvisorError::InsufficientCards {
            need: 5,
            got: hole_cards.len() + board.len(),
        });
    }
    if board.len() >= 5 {
        return Ok(OutsResult::none("No cards to come"));
    }

    let current = evaluate_holding(hole_cards, board)?;
    let mut dead = hole_cards.to_vec();
    dead.extend_from_slice(board);
    let deck = Deck::new(Some(&dead));

    let mut by_category: BTreeMap<HandCategory, u32> = BTreeMap::new();
    let mut improving_cards = Vec::new();
    let mut live_draw_outs = 0;
    let mut next_board = board.to_vec();

    for &card in &deck.cards {
        next_board.push(card);
        let improved = evaluate_holding(hole_cards, &next_board)?;
        let board_alone = made_category(&next_board);
        next_board.pop();

        if improved.made_score() <= current.made_score() {
            continue;
        }
        *by_category.entry(improved.category).or_insert(0) += 1;
        improving_cards.push(card);
        if improved.category >= HandCategory::Straight
            && improved.category > current.category
            && improved.category > board_alone
        {
            live_draw_outs += 1;
        }
    }

    let outs = improving_cards.len() as u32;
    Ok(OutsResult {
        outs,
        description: outs_description(outs, &by_category),
        by_category,
        improving_cards,
        live_draw_outs,
    })
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EquityResult {
    pub wins: u64,
    pub ties: u64,
    pub losses: u64,
    pub samples: u64,
}

impl EquityResult {
    /// (wins + ties / 2) / samples, as a percentage.
    pub fn equity_percent(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.ties as f64 / 2.0) / self.samples as f64 * 100.0
    }

    pub fn win_pct(&self) -> f64 {
        pct(self.wins, self.samples)
    }

    pub fn tie_pct(&self) -> f64 {
        pct(self.ties, self.samples)
    }

    pub fn loss_pct(&self) -> f64 {
        pct(self.losses, self.samples)
    }
}

fn pct(n: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        n as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for EquityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.1}% | Tie {:.1}% | Lose {:.1}% (equity: {:.1}%)",
            self.win_pct(),
            self.tie_pct(),
            self.loss_pct(),
            self.equity_percent(),
        )
    }
}

fn validate_cards(hole_cards: &[Card], board: &[Card]) -> AdvisorResult<()> {
    if hole_cards.len() != 2 {
        return Err(AdvisorError::InvalidHandNotation(format!(
            "expected 2 hole cards, got {}",
            hole_cards.len()
        )));
    }
    if board.len() > 5 || (1..3).contains(&board.len()) {
        return Err(AdvisorError::InvalidBoardNotation(format!(
            "board must hold 0, 3, 4 or 5 cards, got {}",
            board.len()
        )));
    }
    let all: Vec<Card> = hole_cards.iter().chain(board).copied().collect();
    ensure_distinct(&all)
}

enum Opponent {
    Random,
    Combos(Vec<[Card; 2]>),
}

/// Monte-Carlo equity of `hero` against one opponent.
///
/// Each trial draws an opponent hand (uniformly from the live combos of
/// `villain_range`, or any two unseen cards when no range is given) and
/// completes the board from what is left, so no card is ever dealt twice
/// within a trial.
pub fn calculate_equity(
    hero: &[Card],
    villain_range: Option<&[String]>,
    board: &[Card],
    samples: usize,
) -> AdvisorResult<EquityResult> {
    validate_cards(hero, board)?;
    if samples == 0 {
        return Err(AdvisorError::InvalidSizing(
            "sample count must be positive".to_string(),
        ));
    }

    let mut dead: Vec<Card> = hero.to_vec();
    dead.extend_from_slice(board);
    let remaining = Deck::new(Some(&dead)).cards;

    let opponent = match villain_range {
        Some(hands) if !hands.is_empty() => {
            let combos = live_combos(hands, &dead)?;
            if combos.is_empty() {
                return Err(AdvisorError::NoValidCombos);
            }
            Opponent::Combos(combos)
        }
        _ => Opponent::Random,
    };

    let cards_needed = 5 - board.len();

    let (wins, ties, losses) = (0..samples)
        .into_par_iter()
        .map(|_| -> AdvisorResult<(u64, u64, u64)> {
            let mut rng = rand::thread_rng();
            let mut deck = Deck {
                cards: remaining.clone(),
            };
            deck.shuffle(&mut rng);
            let villain: [Card; 2] = match &opponent {
                Opponent::Combos(combos) => {
                    let pick = combos[rng.gen_range(0..combos.len())];
                    deck.cards.retain(|c| *c != pick[0] && *c != pick[1]);
                    pick
                }
                Opponent::Random => {
                    let dealt = deck.deal(2)?;
                    [dealt[0], dealt[1]]
                }
            };

            let mut full_board = board.to_vec();
            full_board.extend(deck.deal(cards_needed)?);

            Ok(match compare_hands(hero, &villain, &full_board)? {
                Ordering::Greater => (1u64, 0u64, 0u64),
                Ordering::Equal => (0, 1, 0),
                Ordering::Less => (0, 0, 1),
            })
        })
        .try_reduce(|| (0, 0, 0), |a, b| Ok((a.0 + b.0, a.1 + b.1, a.2 + b.2)))?;

    Ok(EquityResult {
        wins,
        ties,
        losses,
        samples: wins + ties + losses,
    })
}

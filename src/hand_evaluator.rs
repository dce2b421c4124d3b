use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardInput, Rank};
use crate::error::{AdvisorError, AdvisorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandCategory {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::Pair => write!(f, "Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
            HandCategory::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}

/// Best five-card hand found in a 5..7 card set.
///
/// `score` packs the category into the high bits and up to five tie-break
/// values (4 bits each) below it, so comparing scores compares hands.
#[derive(Debug, Clone)]
pub struct Hand {
    pub category: HandCategory,
    pub score: u32,
    pub kickers: Vec<u8>,
    pub description: String,
    pub cards: Vec<Card>,
}

impl Hand {
    fn new(category: HandCategory, kickers: Vec<u8>, description: String, cards: &[Card]) -> Self {
        Hand {
            category,
            score: pack_score(category, &kickers),
            kickers,
            description,
            cards: cards.to_vec(),
        }
    }

    /// Score with the kickers that do not define the category dropped:
    /// the pair rank of a pair, both pair ranks of two pair, every rank of
    /// a flush, nothing for high card.
    pub fn made_score(&self) -> u32 {
        let defining = match self.category {
            HandCategory::HighCard | HandCategory::RoyalFlush => 0,
            HandCategory::TwoPair | HandCategory::FullHouse => 2,
            HandCategory::Flush => 5,
            _ => 1,
        };
        pack_score(self.category, &self.kickers[..defining.min(self.kickers.len())])
    }

    /// Zero-strength placeholder used while the board is still incomplete.
    pub fn sentinel(got: usize) -> Self {
        Hand {
            category: HandCategory::HighCard,
            score: 0,
            kickers: Vec::new(),
            description: format!("Need at least 5 cards, got {}", got),
            cards: Vec::new(),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl Eq for Hand {}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

fn pack_score(category: HandCategory, kickers: &[u8]) -> u32 {
    let mut score = (category as u32) << 20;
    for (i, &k) in kickers.iter().take(5).enumerate() {
        score |= (k as u32) << (16 - 4 * i);
    }
    score
}

fn plural(value: u8) -> String {
    match Rank::from_value(value) {
        Some(rank) => format!("{}s", rank.to_char()),
        None => "?".to_string(),
    }
}

fn rank_char(value: u8) -> char {
    Rank::from_value(value).map(|r| r.to_char()).unwrap_or('?')
}

fn is_flush(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].suit == w[1].suit)
}

/// High card of a five-card straight; the wheel counts as five-high.
fn straight_high(values: &[u8]) -> Option<u8> {
    let unique: Vec<u8> = values
        .iter()
        .copied()
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .rev()
        .collect();

    if unique.len() != 5 {
        return None;
    }
    if unique[0] - unique[4] == 4 {
        return Some(unique[0]);
    }
    if unique == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: &[Card; 5]) -> Hand {
    let mut values: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = is_flush(cards);
    let straight = straight_high(&values);

    if let (true, Some(high)) = (flush, straight) {
        if high == 14 {
            return Hand::new(HandCategory::RoyalFlush, vec![14], "Royal Flush".to_string(), cards);
        }
        return Hand::new(
            HandCategory::StraightFlush,
            vec![high],
            format!("Straight Flush - {} high", rank_char(high)),
            cards,
        );
    }

    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }

    // (count, value) sorted by count desc, then value desc
    let mut freq: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    freq.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    let grouped: Vec<u8> = freq.iter().map(|&(_, v)| v).collect();

    match (freq[0].0, freq.get(1).map(|f| f.0).unwrap_or(0)) {
        (4, _) => Hand::new(
            HandCategory::FourOfAKind,
            grouped,
            format!("Four of a Kind - {}", plural(freq[0].1)),
            cards,
        ),
        (3, 2) => Hand::new(
            HandCategory::FullHouse,
            grouped,
            format!("Full House - {} over {}", plural(freq[0].1), plural(freq[1].1)),
            cards,
        ),
        _ if flush => Hand::new(
            HandCategory::Flush,
            values.clone(),
            format!("Flush - {} high", rank_char(values[0])),
            cards,
        ),
        _ if straight.is_some() => {
            let high = straight.unwrap_or(5);
            Hand::new(
                HandCategory::Straight,
                vec![high],
                format!("Straight - {} high", rank_char(high)),
                cards,
            )
        }
        (3, _) => Hand::new(
            HandCategory::ThreeOfAKind,
            grouped,
            format!("Three of a Kind - {}", plural(freq[0].1)),
            cards,
        ),
        (2, 2) => Hand::new(
            HandCategory::TwoPair,
            grouped,
            format!("Two Pair - {} and {}", plural(freq[0].1), plural(freq[1].1)),
            cards,
        ),
        (2, _) => Hand::new(
            HandCategory::Pair,
            grouped,
            format!("Pair of {}", plural(freq[0].1)),
            cards,
        ),
        _ => Hand::new(
            HandCategory::HighCard,
            values.clone(),
            format!("High Card - {}", rank_char(values[0])),
            cards,
        ),
    }
}

/// Best five-card hand among all five-card subsets of `cards` (5..=7 cards).
pub fn evaluate_hand(cards: &[Card]) -> AdvisorResult<Hand> {
    if cards.len() < 5 {
        return Err(AdvisorError::InsufficientCards {
            need: 5,
            got: cards.len(),
        });
    }

    let mut best: Option<Hand> = None;
    for combo in cards.iter().combinations(5) {
        let five: [Card; 5] = [*combo[0], *combo[1], *combo[2], *combo[3], *combo[4]];
        let result = evaluate_five(&five);
        if best.as_ref().map_or(true, |b| result > *b) {
            best = Some(result);
        }
    }

    best.ok_or(AdvisorError::InsufficientCards {
        need: 5,
        got: cards.len(),
    })
}

pub fn evaluate_holding(hole_cards: &[Card], board: &[Card]) -> AdvisorResult<Hand> {
    let mut all_cards: Vec<Card> = Vec::with_capacity(hole_cards.len() + board.len());
    all_cards.extend_from_slice(hole_cards);
    all_cards.extend_from_slice(board);
    evaluate_hand(&all_cards)
}

/// Like [`evaluate_hand`], but an incomplete set yields a zero-strength hand.
pub fn evaluate_or_sentinel(cards: &[Card]) -> Hand {
    evaluate_hand(cards).unwrap_or_else(|_| Hand::sentinel(cards.len()))
}

pub fn compare_hands(hand1: &[Card], hand2: &[Card], board: &[Card]) -> AdvisorResult<Ordering> {
    let r1 = evaluate_holding(hand1, board)?;
    let r2 = evaluate_holding(hand2, board)?;
    Ok(r1.cmp(&r2))
}

/// Category made by any number of cards. Below five cards only rank
/// groupings (pairs, trips, quads) can be detected.
pub fn made_category(cards: &[Card]) -> HandCategory {
    if cards.len() >= 5 {
        return evaluate_or_sentinel(cards).category;
    }
    let mut counts = [0u8; 15];
    for c in cards {
        counts[c.value() as usize] += 1;
    }
    let pairs = counts.iter().filter(|&&n| n == 2).count();
    match counts.iter().copied().max().unwrap_or(0) {
        4 => HandCategory::FourOfAKind,
        3 => HandCategory::ThreeOfAKind,
        2 if pairs >= 2 => HandCategory::TwoPair,
        2 => HandCategory::Pair,
        _ => HandCategory::HighCard,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreflopStrength {
    pub strength: f64,
    pub description: String,
    pub is_pair: bool,
    pub is_suited: bool,
}

impl PreflopStrength {
    fn invalid(note: String) -> Self {
        PreflopStrength {
            strength: 0.0,
            description: note,
            is_pair: false,
            is_suited: false,
        }
    }
}

/// Heuristic 0..100 starting-hand score.
pub fn preflop_strength(hole_cards: &[Card]) -> PreflopStrength {
    if hole_cards.len() != 2 {
        return PreflopStrength::invalid(format!(
            "Invalid hand: expected 2 hole cards, got {}",
            hole_cards.len()
        ));
    }
    let (c1, c2) = (hole_cards[0], hole_cards[1]);
    if c1 == c2 {
        return PreflopStrength::invalid(format!("Invalid hand: duplicate card {}", c1));
    }

    let high = c1.value().max(c2.value()) as i32;
    let low = c1.value().min(c2.value()) as i32;
    let is_pair = high == low;
    let is_suited = c1.suit == c2.suit;
    let (hi_char, lo_char) = (rank_char(high as u8), rank_char(low as u8));

    let (strength, description) = if is_pair {
        let mut s = 50 + (high - 2) * 4;
        if high >= 10 {
            s += 10;
        }
        if high >= 13 {
            s += 5;
        }
        (s, format!("Pocket {}", plural(high as u8)))
    } else {
        let gap = high - low - 1;
        let mut s = (high + low) * 2;
        let description = if is_suited {
            s += 8;
            format!("{}{} suited", hi_char, lo_char)
        } else {
            format!("{}{} offsuit", hi_char, lo_char)
        };
        match gap {
            0 => s += 5,
            1 => s += 3,
            g if g >= 4 => s -= 5,
            _ => {}
        }
        if (high == 14 && low >= 10) || (high == 13 && low >= 11) {
            s += 15;
        }
        (s, description)
    };

    PreflopStrength {
        strength: strength.clamp(0, 100) as f64,
        description,
        is_pair,
        is_suited,
    }
}

/// Scores raw observations; anything unparseable degrades to strength 0.
pub fn preflop_strength_from_inputs(inputs: &[CardInput]) -> PreflopStrength {
    let mut cards = Vec::with_capacity(inputs.len());
    for input in inputs {
        match Card::parse(input) {
            Ok(card) => cards.push(card),
            Err(e) => return PreflopStrength::invalid(format!("Unreadable hole card: {}", e)),
        }
    }
    preflop_strength(&cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_score_orders_categories_before_kickers() {
        let weak_pair = pack_score(HandCategory::Pair, &[2, 5, 4, 3]);
        let best_high = pack_score(HandCategory::HighCard, &[14, 13, 12, 11, 9]);
        assert!(weak_pair > best_high);
    }

    #[test]
    fn test_straight_high_requires_five_distinct() {
        assert_eq!(straight_high(&[9, 8, 7, 6, 5]), Some(9));
        assert_eq!(straight_high(&[14, 5, 4, 3, 2]), Some(5));
        assert_eq!(straight_high(&[9, 9, 7, 6, 5]), None);
    }
}

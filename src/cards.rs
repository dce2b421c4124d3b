use std::collections::HashSet;
use std::fmt;

use itertools::{iproduct, Itertools};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AdvisorError, AdvisorResult};

pub const RANKS_STR: &str = "23456789TJQKA";
pub const SUITS_STR: &str = "shdc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> AdvisorResult<Rank> {
        rank_index(c.to_ascii_uppercase())
            .map(|i| ALL_RANKS[i])
            .ok_or(AdvisorError::InvalidRank(c))
    }

    /// Accepts a rank character or the "10" alias.
    pub fn from_text(s: &str) -> AdvisorResult<Rank> {
        let s = s.trim();
        if s == "10" {
            return Ok(Rank::Ten);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::from_char(c),
            _ => Err(AdvisorError::InvalidCard(s.to_string())),
        }
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        ALL_RANKS.iter().copied().find(|r| r.value() == value)
    }

    pub fn to_char(self) -> char {
        RANKS_STR.as_bytes()[(self.value() - 2) as usize] as char
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> AdvisorResult<Suit> {
        match c.to_ascii_lowercase() {
            's' | '\u{2660}' | '\u{2664}' => Ok(Suit::Spades),
            'h' | '\u{2665}' | '\u{2661}' => Ok(Suit::Hearts),
            'd' | '\u{2666}' | '\u{2662}' => Ok(Suit::Diamonds),
            'c' | '\u{2663}' | '\u{2667}' => Ok(Suit::Clubs),
            _ => Err(AdvisorError::InvalidSuit(c.to_string())),
        }
    }

    /// Letter, symbol or word ("spade", "Hearts", "of clubs").
    pub fn from_text(s: &str) -> AdvisorResult<Suit> {
        let lowered = s.trim().to_lowercase();
        let word = lowered.strip_prefix("of ").unwrap_or(&lowered).trim();
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Suit::from_char(c);
        }
        match word {
            "spade" | "spades" => Ok(Suit::Spades),
            "heart" | "hearts" => Ok(Suit::Hearts),
            "diamond" | "diamonds" => Ok(Suit::Diamonds),
            "club" | "clubs" => Ok(Suit::Clubs),
            _ => Err(AdvisorError::InvalidSuit(s.to_string())),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

/// The shapes a card observation can arrive in from the table parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardInput {
    Text(String),
    Parts { rank: String, suit: String },
}

impl From<&str> for CardInput {
    fn from(s: &str) -> Self {
        CardInput::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Normalizes every accepted input shape into a canonical card.
    ///
    /// A lone rank character is completed with spades; "10" is read as a ten.
    pub fn parse(input: &CardInput) -> AdvisorResult<Card> {
        match input {
            CardInput::Text(text) => parse_card(text),
            CardInput::Parts { rank, suit } => {
                let rank = Rank::from_text(rank)
                    .map_err(|_| AdvisorError::InvalidCard(format!("{}{}", rank, suit)))?;
                let suit = if suit.trim().is_empty() {
                    Suit::Spades
                } else {
                    Suit::from_text(suit)?
                };
                Ok(Card::new(rank, suit))
            }
        }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = CardInput::deserialize(deserializer)?;
        Card::parse(&input).map_err(serde::de::Error::custom)
    }
}

pub fn full_deck() -> Vec<Card> {
    ALL_RANKS
        .iter()
        .flat_map(|&r| ALL_SUITS.iter().map(move |&s| Card::new(r, s)))
        .collect()
}

pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(exclude: Option<&[Card]>) -> Deck {
        let excluded: HashSet<Card> = exclude
            .map(|e| e.iter().copied().collect())
            .unwrap_or_default();
        let cards = full_deck()
            .into_iter()
            .filter(|c| !excluded.contains(c))
            .collect();
        Deck { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.cards.shuffle(rng);
        self
    }

    pub fn deal(&mut self, n: usize) -> AdvisorResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(AdvisorError::NotEnoughDeck {
                requested: n,
                available: self.cards.len(),
            });
        }
        let dealt: Vec<Card> = self.cards.drain(..n).collect();
        Ok(dealt)
    }
}

pub fn parse_card(notation: &str) -> AdvisorResult<Card> {
    let notation = notation.trim();
    if notation.is_empty() {
        return Err(AdvisorError::InvalidCard(notation.to_string()));
    }
    let (rank_part, suit_part) = if let Some(rest) = notation.strip_prefix("10") {
        ("10", rest)
    } else {
        let split = notation
            .char_indices()
            .nth(1)
            .map(|(i, _)| i)
            .unwrap_or(notation.len());
        notation.split_at(split)
    };
    let rank = Rank::from_text(rank_part)
        .map_err(|_| AdvisorError::InvalidCard(notation.to_string()))?;
    let suit = if suit_part.trim().is_empty() {
        Suit::Spades
    } else {
        Suit::from_text(suit_part).map_err(|_| AdvisorError::InvalidCard(notation.to_string()))?
    };
    Ok(Card::new(rank, suit))
}

/// Parses a run of two-character cards: "AsKdQh", "As Kd Qh" or "As,Kd,Qh".
pub fn parse_board(notation: &str) -> AdvisorResult<Vec<Card>> {
    let tokens: Vec<&str> = notation
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let mut cards = Vec::new();
    for token in tokens {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() == 2 || (token.starts_with("10") && chars.len() == 3) {
            cards.push(parse_card(token)?);
            continue;
        }
        if chars.len() % 2 != 0 {
            return Err(AdvisorError::InvalidBoardNotation(notation.to_string()));
        }
        for pair in chars.chunks(2) {
            let s: String = pair.iter().collect();
            cards.push(parse_card(&s)?);
        }
    }
    ensure_distinct(&cards)?;
    Ok(cards)
}

pub fn ensure_distinct(cards: &[Card]) -> AdvisorResult<()> {
    let mut seen = HashSet::new();
    for card in cards {
        if !seen.insert(*card) {
            return Err(AdvisorError::DuplicateCard(card.to_string()));
        }
    }
    Ok(())
}

/// Starting-hand notation for two hole cards: "AA", "AKs", "T9o".
pub fn simplify_hand(cards: &[Card]) -> AdvisorResult<String> {
    if cards.len() != 2 {
        return Err(AdvisorError::InvalidHandNotation(format!(
            "expected 2 cards, got {}",
            cards.len()
        )));
    }
    let (c1, c2) = (cards[0], cards[1]);
    let (r1, r2) = if c1.rank >= c2.rank {
        (c1.rank, c2.rank)
    } else {
        (c2.rank, c1.rank)
    };

    if r1 == r2 {
        return Ok(format!("{}{}", r1.to_char(), r2.to_char()));
    }

    let suffix = if c1.suit == c2.suit { "s" } else { "o" };
    Ok(format!("{}{}{}", r1.to_char(), r2.to_char(), suffix))
}

/// Concrete card pairs behind a hand notation: "AA" (6), "AK" (16),
/// "AKs" (4), "AKo" (12) or an exact holding like "AsKh".
pub fn hand_combos(notation: &str) -> AdvisorResult<Vec<(Card, Card)>> {
    let notation = notation.trim();
    let invalid = || AdvisorError::InvalidHandNotation(notation.to_string());
    let chars: Vec<char> = notation.chars().collect();

    if chars.len() == 4 {
        let first = parse_card(&chars[..2].iter().collect::<String>())?;
        let second = parse_card(&chars[2..].iter().collect::<String>())?;
        if first == second {
            return Err(AdvisorError::DuplicateCard(first.to_string()));
        }
        return Ok(vec![(first, second)]);
    }
    if chars.len() != 2 && chars.len() != 3 {
        return Err(invalid());
    }

    let high = Rank::from_char(chars[0])?;
    let low = Rank::from_char(chars[1])?;
    let qualifier = chars.get(2).copied();

    let combos: Vec<(Card, Card)> = match (high == low, qualifier) {
        (true, None) => ALL_SUITS
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| (Card::new(high, a), Card::new(high, b)))
            .collect(),
        (true, Some(_)) => return Err(invalid()),
        (false, None) => iproduct!(ALL_SUITS, ALL_SUITS)
            .map(|(a, b)| (Card::new(high, a), Card::new(low, b)))
            .collect(),
        (false, Some('s')) => ALL_SUITS
            .iter()
            .map(|&s| (Card::new(high, s), Card::new(low, s)))
            .collect(),
        (false, Some('o')) => iproduct!(ALL_SUITS, ALL_SUITS)
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (Card::new(high, a), Card::new(low, b)))
            .collect(),
        (false, Some(_)) => return Err(invalid()),
    };
    Ok(combos)
}

/// Returns the index of a rank char in RANKS_STR (0-based: '2'=0, 'A'=12)
pub fn rank_index(c: char) -> Option<usize> {
    RANKS_STR.find(c)
}

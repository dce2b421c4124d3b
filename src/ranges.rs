use std::collections::HashSet;

use crate::cards::{hand_combos, rank_index, Card, RANKS_STR};
use crate::error::{AdvisorError, AdvisorResult};

pub const TOTAL_COMBOS: f64 = 1326.0;

/// All 169 starting hands, strongest first.
pub const HAND_RANKING: &[&str] = &[
    "AA", "KK", "QQ", "AKs", "JJ", "AQs", "KQs", "AJs", "KJs", "TT",
    "AKo", "ATs", "QJs", "KTs", "QTs", "JTs", "99", "AQo", "A9s", "KQo",
    "K9s", "T9s", "J9s", "Q9s", "A8s", "88", "A5s", "A7s", "A4s", "A6s",
    "A3s", "K8s", "T8s", "A2s", "98s", "J8s", "77", "Q8s", "K7s", "AJo",
    "87s", "66", "K6s", "ATo", "97s", "76s", "T7s", "K5s", "55", "J7s",
    "86s", "KJo", "65s", "Q7s", "K4s", "K3s", "K2s", "96s", "44", "QJo",
    "75s", "54s", "A9o", "T6s", "KTo", "J6s", "Q6s", "33", "85s", "64s",
    "QTo", "22", "53s", "JTo", "K9o", "J9o", "T9o", "Q9o", "74s", "43s",
    "A8o", "A5o", "A7o", "A4o", "A6o", "A3o", "95s", "63s", "A2o", "Q5s",
    "52s", "84s", "J5s", "42s", "Q4s", "T8o", "98o", "J8o", "Q8o", "73s",
    "J4s", "87o", "Q3s", "32s", "62s", "97o", "T5s", "76o", "Q2s", "K8o",
    "J3s", "86o", "65o", "94s", "T4s", "93s", "J2s", "92s", "T7o", "54o",
    "T3s", "83s", "75o", "82s", "T2s", "K7o", "K6o", "72s", "96o", "J7o",
    "K5o", "T6o", "K4o", "K3o", "K2o", "85o", "Q7o", "64o", "53o", "J6o",
    "Q6o", "Q5o", "Q4o", "Q3o", "Q2o", "74o", "43o", "95o", "63o", "84o",
    "42o", "T5o", "T4o", "T3o", "T2o", "52o", "J5o", "J4o", "J3o", "J2o",
    "73o", "32o", "62o", "94o", "93o", "92o", "83o", "82o", "72o",
];

pub fn combo_count(notation: &str) -> u32 {
    let chars: Vec<char> = notation.chars().collect();
    match chars.len() {
        2 if chars[0] == chars[1] => 6,
        2 => 16,
        3 if chars[2] == 's' => 4,
        3 if chars[2] == 'o' => 12,
        4 => 1,
        _ => 0,
    }
}

/// Expands a range string ("TT+,ATs+,KQo,77-99,AK") into hand notations,
/// strongest first. Unqualified "AK" stays as one entry covering 16 combos.
pub fn parse_range(range_str: &str) -> Vec<String> {
    let mut hands = HashSet::new();
    for part in range_str.replace(' ', "").split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(base) = part.strip_suffix('+') {
            hands.extend(expand_plus(base));
        } else if part.contains('-') && part.len() > 3 {
            hands.extend(expand_dash(part));
        } else {
            hands.insert(part.to_string());
        }
    }
    let mut result: Vec<String> = hands.into_iter().collect();
    result.sort_by(|a, b| {
        hand_strength_index(a)
            .cmp(&hand_strength_index(b))
            .then_with(|| a.cmp(b))
    });
    result
}

/// One range token ("AK", "ATs", "99") as rank indices plus an optional
/// suitedness qualifier.
#[derive(Debug, Clone, Copy)]
struct Token {
    high: usize,
    low: usize,
    kind: Option<char>,
}

impl Token {
    fn parse(text: &str) -> Option<Token> {
        let mut chars = text.chars();
        let first = rank_index(chars.next()?)?;
        let second = rank_index(chars.next()?)?;
        let kind = match chars.next() {
            None => None,
            Some(k @ ('s' | 'o')) if first != second => Some(k),
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Token {
            high: first.max(second),
            low: first.min(second),
            kind,
        })
    }

    fn is_pair(self) -> bool {
        self.high == self.low
    }

    fn render(self, high: usize, low: usize) -> String {
        let ranks = RANKS_STR.as_bytes();
        let mut out = String::with_capacity(3);
        out.push(ranks[high] as char);
        out.push(ranks[low] as char);
        if let Some(kind) = self.kind {
            out.push(kind);
        }
        out
    }
}

/// "TT+" climbs the pairs to AA; "ATs+" climbs the kicker up to one below the top card.
fn expand_plus(base: &str) -> Vec<String> {
    match Token::parse(base) {
        Some(t) if t.is_pair() => (t.high..RANKS_STR.len()).map(|i| t.render(i, i)).collect(),
        Some(t) => (t.low..t.high).map(|i| t.render(t.high, i)).collect(),
        None => vec![base.to_string()],
    }
}

/// "77-TT" or "KTs-KQs"; both ends must share shape, top card and qualifier.
fn expand_dash(text: &str) -> Vec<String> {
    let ends = text.split_once('-').and_then(|(a, b)| Some((Token::parse(a)?, Token::parse(b)?)));
    let Some((a, b)) = ends else {
        return vec![text.to_string()];
    };
    if a.is_pair() && b.is_pair() {
        let (lo, hi) = (a.high.min(b.high), a.high.max(b.high));
        return (lo..=hi).map(|i| a.render(i, i)).collect();
    }
    if !a.is_pair() && !b.is_pair() && a.high == b.high && a.kind == b.kind {
        let (lo, hi) = (a.low.min(b.low), a.low.max(b.low));
        return (lo..=hi).map(|i| a.render(a.high, i)).collect();
    }
    vec![text.to_string()]
}

/// Position in [`HAND_RANKING`]; an unqualified "AK" ranks as its suited form.
pub fn hand_strength_index(hand: &str) -> usize {
    let chars: Vec<char> = hand.chars().collect();
    let key = if chars.len() == 2 && chars[0] != chars[1] {
        format!("{}s", hand)
    } else {
        hand.to_string()
    };
    HAND_RANKING
        .iter()
        .position(|&h| h == key)
        .unwrap_or(HAND_RANKING.len())
}

pub fn range_from_top_pct(pct: f64) -> AdvisorResult<Vec<String>> {
    if pct <= 0.0 || pct > 100.0 {
        return Err(AdvisorError::InvalidSizing(
            "Percentage must be between 0 and 100".to_string(),
        ));
    }
    let target = TOTAL_COMBOS * (pct / 100.0);
    let mut result = Vec::new();
    let mut running = 0u32;
    for &hand in HAND_RANKING {
        let count = combo_count(hand);
        if running + count > target as u32 && running > 0 {
            break;
        }
        result.push(hand.to_string());
        running += count;
        if running as f64 >= target {
            break;
        }
    }
    Ok(result)
}

/// Membership test that also honours unqualified entries ("AK" holds "AKo").
pub fn range_contains(hands: &[String], notation: &str) -> bool {
    hands.iter().any(|h| {
        h == notation || (h.len() == 2 && notation.len() == 3 && notation.starts_with(h.as_str()))
    })
}

pub fn total_combos(hands: &[String]) -> u32 {
    hands.iter().map(|h| combo_count(h)).sum()
}

pub fn range_pct(hands: &[String]) -> f64 {
    total_combos(hands) as f64 / TOTAL_COMBOS * 100.0
}

/// Every concrete two-card combo of `hands` that avoids the dead cards.
pub fn live_combos(hands: &[String], dead: &[Card]) -> AdvisorResult<Vec<[Card; 2]>> {
    let dead: HashSet<Card> = dead.iter().copied().collect();
    let mut combos = Vec::new();
    for notation in hands {
        for (c1, c2) in hand_combos(notation)? {
            if !dead.contains(&c1) && !dead.contains(&c2) {
                combos.push([c1, c2]);
            }
        }
    }
    Ok(combos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_covers_every_starting_hand_once() {
        let unique: HashSet<&str> = HAND_RANKING.iter().copied().collect();
        assert_eq!(HAND_RANKING.len(), 169);
        assert_eq!(unique.len(), 169);
        let combos: u32 = HAND_RANKING.iter().map(|h| combo_count(h)).sum();
        assert_eq!(combos, 1326);
    }
}

use gto_advisor::advisor::Advisor;
use gto_advisor::cards::CardInput;
use gto_advisor::config::AdvisorConfig;
use gto_advisor::game_state::*;
use gto_advisor::hand_type::{BettingPurpose, HandType};
use gto_advisor::positions::Position;
use gto_advisor::strategy::{Action, HashNoise};

fn advisor() -> Advisor {
    Advisor::new(AdvisorConfig {
        jitter: false,
        ..AdvisorConfig::default()
    })
}

fn cards(list: &[&str]) -> Vec<CardInput> {
    list.iter().map(|&c| CardInput::from(c)).collect()
}

fn state(
    hole: &[&str],
    board: &[&str],
    position: Position,
    pot: f64,
    to_call: f64,
    active: u32,
) -> GameState {
    GameState {
        street: Street::from_board_len(board.len()),
        position,
        pot_size: pot,
        to_call,
        stack_size: 200.0,
        active_players: active,
        hole_cards: cards(hole),
        board_cards: cards(board),
        is_my_turn: true,
        ..GameState::default()
    }
}

#[test]
fn test_missing_hole_cards_fold() {
    let advice = advisor().get_advice(&state(&[], &[], Position::BTN, 3.0, 2.0, 6));
    assert_eq!(advice.primary_action, Action::Fold);
    assert_eq!(advice.strategy.get(Action::Fold), 100);
    assert_eq!(advice.strategy.len(), 1);
    assert_eq!(advice.confidence, 0.0);
    assert!(advice.reasoning.contains("hole cards"));
}

#[test]
fn test_unreadable_hole_card_fold() {
    let advice = advisor().get_advice(&state(&["As", "Xx"], &[], Position::BTN, 3.0, 2.0, 6));
    assert_eq!(advice.primary_action, Action::Fold);
    assert_eq!(advice.confidence, 0.0);
}

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

#[test]
fn test_aces_open_on_button() {
    let advice = advisor().get_advice(&state(&["As", "Ah"], &[], Position::BTN, 3.0, 2.0, 2));
    assert_eq!(advice.primary_action, Action::Raise);
    assert!(advice.strategy.get(Action::Raise) >= 85);
    assert_eq!(advice.strategy.total(), 100);
    assert_eq!(advice.hand_notation.as_deref(), Some("AA"));
    assert_eq!(advice.hand_type, Some(HandType::Premium));
    assert_eq!(advice.betting_purpose, Some(BettingPurpose::Value));
    assert!((advice.bet_size - 4.4).abs() < 1e-9);
    assert_eq!(advice.confidence, advice.strategy.get(Action::Raise) as f64);
}

#[test]
fn test_seven_deuce_folds_under_the_gun() {
    let advice = advisor().get_advice(&state(&["7s", "2h"], &[], Position::UTG, 3.0, 2.0, 6));
    assert_eq!(advice.primary_action, Action::Fold);
    assert!(advice.strategy.get(Action::Fold) >= 85);
    assert_eq!(advice.bet_size, 0.0);
}

#[test]
fn test_seven_deuce_folds_under_the_gun_without_price() {
    let advice = advisor().get_advice(&state(&["7s", "2h"], &[], Position::UTG, 3.0, 0.0, 6));
    assert_eq!(advice.primary_action, Action::Fold);
    assert!(advice.strategy.get(Action::Fold) >= 85);
    assert!(!advice.strategy.contains(Action::Check));
}

#[test]
fn test_big_blind_option_checks_instead_of_folding() {
    let advice = advisor().get_advice(&state(&["7s", "2h"], &[], Position::BB, 3.0, 0.0, 6));
    assert!(!advice.strategy.contains(Action::Fold));
    assert_eq!(advice.primary_action, Action::Check);
}

#[test]
fn test_short_stack_premium_jams() {
    let mut s = state(&["Ks", "Kh"], &[], Position::CO, 3.0, 2.0, 6);
    s.stack_size = 30.0;
    let advice = advisor().get_advice(&s);
    assert_eq!(advice.primary_action, Action::Raise);
    assert_eq!(advice.bet_size, 30.0);
    let depth = advice.stack_depth_info.unwrap();
    assert_eq!(depth.depth, StackDepth::VeryShort);
    assert!((depth.big_blinds - 15.0).abs() < 1e-9);
}

#[test]
fn test_missing_stack_defaults_to_hundred_big_blinds() {
    let mut s = state(&["Qs", "Qh"], &[], Position::MP, 3.0, 2.0, 6);
    s.stack_size = 0.0;
    let advice = advisor().get_advice(&s);
    let depth = advice.stack_depth_info.unwrap();
    assert!((depth.big_blinds - 100.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Facing action
// ---------------------------------------------------------------------------

#[test]
fn test_ace_king_suited_vs_cutoff_open() {
    let mut config = AdvisorConfig {
        jitter: false,
        ..AdvisorConfig::default()
    };
    config.blinds = BlindLevels {
        small_blind: 0.5,
        big_blind: 1.0,
    };
    let advisor = Advisor::new(config);

    let mut s = state(&["Ah", "Kh"], &[], Position::BTN, 4.5, 3.0, 3);
    s.stack_size = 100.0;
    s.betting_action = vec![BettingEvent {
        player: "CO".to_string(),
        action: EventKind::Raise,
        amount: 3.0,
    }];

    let advice = advisor.get_advice(&s);
    assert!(
        matches!(advice.primary_action, Action::ThreeBet | Action::Call),
        "got {:?}",
        advice.strategy
    );
    assert!(advice.strategy.get(Action::Fold) > 0);
    assert_eq!(advice.strategy.total(), 100);

    let range = advice.opponent_range.as_ref().unwrap();
    assert_eq!(range.key, "standard_open");
    let equity = advice.equity.unwrap();
    assert!(equity > 50.0 && equity < 80.0, "equity {}", equity);
    assert!((advice.pot_odds.unwrap() - 40.0).abs() < 1e-6);

    if advice.primary_action == Action::ThreeBet {
        assert!((advice.bet_size - 9.0).abs() < 1e-9);
    } else {
        assert!((advice.bet_size - 3.0).abs() < 1e-9);
    }
}

#[test]
fn test_trash_folds_to_four_bet() {
    let advice = advisor().get_advice(&state(&["8c", "3d"], &[], Position::CO, 70.0, 60.0, 3));
    assert_eq!(advice.primary_action, Action::Fold);
    assert!(advice.strategy.get(Action::Fold) >= 85);
}

// ---------------------------------------------------------------------------
// Postflop
// ---------------------------------------------------------------------------

#[test]
fn test_nut_flush_bets_when_checked_to() {
    let advice = advisor().get_advice(&state(
        &["Ah", "Kh"],
        &["Qh", "7h", "2h"],
        Position::BTN,
        10.0,
        0.0,
        2,
    ));
    assert_eq!(advice.primary_action, Action::Bet);
    assert!(!advice.strategy.contains(Action::Fold));
    assert!(!advice.strategy.contains(Action::Call));
    assert_eq!(advice.hand_type, Some(HandType::NutsStrong));
    assert!(advice.equity.unwrap() > 80.0);
    assert!(advice.pot_odds.is_none());
    assert!((advice.bet_size - 7.5).abs() < 1e-9);
    assert!(advice.board_texture.as_deref().unwrap().starts_with("monotone"));
}

#[test]
fn test_air_folds_to_pot_bet() {
    let advice = advisor().get_advice(&state(
        &["7c", "2d"],
        &["As", "Kh", "Qd"],
        Position::BB,
        30.0,
        10.0,
        2,
    ));
    assert_eq!(advice.primary_action, Action::Fold);
    assert_eq!(advice.betting_purpose, Some(BettingPurpose::Fold));
    assert!(advice.equity.unwrap() < 25.0);
}

#[test]
fn test_flush_draw_reports_outs() {
    let advice = advisor().get_advice(&state(
        &["As", "5s"],
        &["Ks", "9s", "2d"],
        Position::BTN,
        20.0,
        0.0,
        2,
    ));
    let outs = advice.outs.as_ref().unwrap();
    assert!(outs.draw_outs() >= 9);
    assert!(advice.implied_odds.as_deref().unwrap().contains("outs"));
    assert_eq!(advice.strategy.total(), 100);
}

#[test]
fn test_street_follows_board_cards() {
    let mut s = state(&["Ah", "Kh"], &["Qh", "7h", "2h"], Position::BTN, 10.0, 0.0, 2);
    s.street = Street::Preflop;
    let advice = advisor().get_advice(&s);
    assert!(advice.board_texture.is_some());
    assert_eq!(advice.primary_action, Action::Bet);
}

// ---------------------------------------------------------------------------
// Fallback and helpers
// ---------------------------------------------------------------------------

#[test]
fn test_fallback_on_conflicting_cards() {
    let conflicting = |to_call| {
        advisor().get_advice(&state(
            &["As", "Kd"],
            &["As", "7c", "2h"],
            Position::CO,
            10.0,
            to_call,
            2,
        ))
    };

    let cheap = conflicting(2.0);
    assert!(cheap.reasoning.starts_with("Simplified pot-odds decision after error"));
    assert!(cheap.reasoning.contains("Advice computation failed"));
    assert_eq!(cheap.primary_action, Action::Call);
    assert_eq!(cheap.bet_size, 2.0);

    let expensive = conflicting(8.0);
    assert_eq!(expensive.primary_action, Action::Fold);

    let free = conflicting(0.0);
    assert_eq!(free.primary_action, Action::Check);
    assert_eq!(free.strategy.total(), 100);
}

#[test]
fn test_fallback_on_two_card_board() {
    let s = state(&["As", "Kd"], &["7c", "2h"], Position::CO, 10.0, 0.0, 2);
    let advice = advisor().get_advice(&s);
    assert!(advice.reasoning.contains("board"));
    assert_eq!(advice.primary_action, Action::Check);
}

#[test]
fn test_unreadable_board_card_skipped() {
    let advice = advisor().get_advice(&state(
        &["Ah", "Kh"],
        &["Qh", "7h", "2h", "??"],
        Position::BTN,
        10.0,
        0.0,
        2,
    ));
    assert!(!advice.reasoning.starts_with("Simplified"));
    assert!(advice.board_texture.is_some());
}

#[test]
fn test_strategies_sum_to_hundred_and_lead_with_primary() {
    let raise = |player: &str, amount: f64| BettingEvent {
        player: player.to_string(),
        action: EventKind::Raise,
        amount,
    };
    let call = |player: &str, amount: f64| BettingEvent {
        player: player.to_string(),
        action: EventKind::Call,
        amount,
    };

    let mut spots = Vec::new();
    for hole in [["As", "Ah"], ["Kd", "Qd"], ["9c", "8c"], ["7s", "2h"], ["Ah", "5h"]] {
        for position in [Position::UTG, Position::CO, Position::BTN, Position::SB, Position::BB] {
            spots.push(state(&hole, &[], position, 3.0, 2.0, 6));
            spots.push(state(&hole, &[], position, 3.0, 0.0, 6));
        }
        // 3-bet, 4-bet and squeeze spots
        spots.push(state(&hole, &[], Position::CO, 15.0, 10.0, 3));
        spots.push(state(&hole, &[], Position::BTN, 70.0, 60.0, 3));
        let mut squeeze = state(&hole, &[], Position::BTN, 12.0, 6.0, 5);
        squeeze.betting_action = vec![raise("UTG", 6.0), call("HJ", 6.0)];
        spots.push(squeeze);
        // postflop, checked to and facing a bet
        for to_call in [0.0, 5.0, 20.0] {
            spots.push(state(&hole, &["Qh", "7c", "2s"], Position::BTN, 20.0, to_call, 2));
            spots.push(state(&hole, &["Jd", "Td", "4c", "8h"], Position::BB, 30.0, to_call, 3));
        }
        // stack depth extremes
        for stack in [20.0, 500.0] {
            let mut deep = state(&hole, &[], Position::HJ, 3.0, 2.0, 6);
            deep.stack_size = stack;
            spots.push(deep);
        }
    }

    let advisor = advisor();
    for spot in &spots {
        let advice = advisor.get_advice(spot);
        let strategy = &advice.strategy;
        assert_eq!(strategy.total(), 100, "{:?} -> {:?}", spot, strategy);
        let top = strategy.iter().map(|(_, freq)| freq).max().unwrap();
        assert_eq!(strategy.get(advice.primary_action), top, "{:?}", strategy);
    }
}

#[test]
fn test_quick_advice_short_reasoning() {
    let advice = advisor().quick_advice(&cards(&["Jd", "Jc"]), &[], Position::HJ, 3.0, 2.0);
    assert!(advice.reasoning.chars().count() <= 100);
    assert_eq!(advice.hand_notation.as_deref(), Some("JJ"));
    assert_eq!(advice.primary_action, Action::Raise);
}

#[test]
fn test_update_blind_levels() {
    let mut advisor = advisor();
    let invalid = BlindLevels {
        small_blind: 1.0,
        big_blind: 0.0,
    };
    assert!(advisor.update_blind_levels(invalid).is_err());
    assert_eq!(advisor.blind_levels(), BlindLevels::default());

    let valid = BlindLevels {
        small_blind: 5.0,
        big_blind: 10.0,
    };
    advisor.update_blind_levels(valid).unwrap();
    assert_eq!(advisor.blind_levels(), valid);
}

#[test]
fn test_jitter_is_repeatable_and_small() {
    let advisor = Advisor::with_noise(AdvisorConfig::default(), Box::new(HashNoise::default()));
    let s = state(&["As", "Ah"], &[], Position::BTN, 3.0, 2.0, 2);
    let first = advisor.get_advice(&s);
    let second = advisor.get_advice(&s);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.strategy, second.strategy);
    let primary = first.strategy.primary_frequency() as f64;
    assert!((first.confidence - primary).abs() <= 2.0 + 1e-9);
}

#[test]
fn test_state_from_json() {
    let json = r#"{
        "street": "preflop",
        "position": "button",
        "potSize": 3,
        "toCall": 2,
        "stackSize": 200,
        "activePlayers": 2,
        "holeCards": [{"rank": "A", "suit": "spades"}, "Kh"],
        "boardCards": [],
        "isMyTurn": true
    }"#;
    let s: GameState = serde_json::from_str(json).unwrap();
    assert_eq!(s.position, Position::BTN);
    let advice = advisor().get_advice(&s);
    assert_eq!(advice.hand_notation.as_deref(), Some("AKo"));

    let out = serde_json::to_value(&advice).unwrap();
    assert_eq!(out["primaryAction"], "raise");
    assert!(out["strategy"]["raise"].as_u64().unwrap() >= 85);
    assert!(out.get("betSize").is_some());
}

use gto_advisor::game_state::*;
use gto_advisor::positions::Position;
use gto_advisor::range_estimator::*;

const BLINDS: BlindLevels = BlindLevels {
    small_blind: 0.5,
    big_blind: 1.0,
};

fn preflop(position: Position, to_call: f64, active: u32, events: &[(&str, f64)]) -> GameState {
    GameState {
        street: Street::Preflop,
        position,
        pot_size: 1.5 + to_call,
        to_call,
        stack_size: 100.0,
        active_players: active,
        betting_action: events
            .iter()
            .enumerate()
            .map(|(i, &(action, amount))| BettingEvent {
                player: format!("villain{}", i + 1),
                action: EventKind::from_label(action),
                amount,
            })
            .collect(),
        ..GameState::default()
    }
}

fn postflop(pot: f64, to_call: f64, events: &[(&str, f64)]) -> GameState {
    let mut state = preflop(Position::BTN, to_call, 2, events);
    state.street = Street::Flop;
    state.pot_size = pot;
    state
}

#[test]
fn test_unopened_pot() {
    let analysis = analyze_action(&preflop(Position::BTN, 0.0, 6, &[]), &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Unopened);
    assert_eq!(analysis.aggression, Aggression::None);
    assert_eq!(estimate_range(&analysis).key, "any_two");
}

#[test]
fn test_raise_count_inferred_from_amount() {
    let open = analyze_action(&preflop(Position::BTN, 3.0, 6, &[]), &BLINDS);
    assert_eq!(open.action_type, ActionType::Facing2Bet);
    assert_eq!(open.raiser_count, 1);
    assert_eq!(open.aggression, Aggression::Standard);

    let three_bet = analyze_action(&preflop(Position::CO, 9.0, 6, &[]), &BLINDS);
    assert_eq!(three_bet.action_type, ActionType::Facing3Bet);

    let four_bet = analyze_action(&preflop(Position::CO, 30.0, 6, &[]), &BLINDS);
    assert_eq!(four_bet.action_type, ActionType::Facing4BetPlus);
    assert_eq!(estimate_range(&four_bet).key, "jam_4bet");
}

#[test]
fn test_open_sizing_picks_table() {
    let small = analyze_action(&preflop(Position::BTN, 2.0, 6, &[]), &BLINDS);
    assert_eq!(estimate_range(&small).key, "wide_open");

    let standard = analyze_action(&preflop(Position::BTN, 3.0, 6, &[]), &BLINDS);
    assert_eq!(estimate_range(&standard).key, "standard_open");

    let large = analyze_action(&preflop(Position::BTN, 4.0, 6, &[]), &BLINDS);
    assert_eq!(estimate_range(&large).key, "tight_open");
}

#[test]
fn test_big_blind_sizing_includes_posted_blind() {
    let analysis = analyze_action(&preflop(Position::BB, 2.0, 6, &[]), &BLINDS);
    assert!((analysis.sizing - 3.0).abs() < 1e-9);
}

#[test]
fn test_overlimpers() {
    let state = preflop(Position::BTN, 1.0, 6, &[("limp", 1.0), ("call", 1.0)]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Overlimpers);
    assert_eq!(analysis.limper_count, 2);
    let range = estimate_range(&analysis);
    assert_eq!(range.key, "limpers");
    assert_eq!(range.sizing_context, "2 limper(s)");
}

#[test]
fn test_isolation_spot() {
    let state = preflop(Position::BTN, 4.0, 4, &[("limp", 1.0), ("raise", 4.0)]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::IsolateRaise);
    assert_eq!(estimate_range(&analysis).key, "isolation");
}

#[test]
fn test_squeeze_spot() {
    let state = preflop(Position::BTN, 3.0, 3, &[("raise", 3.0), ("call", 3.0)]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::SqueezeSpot);
    assert_eq!(analysis.cold_caller_count, 1);
    assert_eq!(estimate_range(&analysis).key, "squeeze");
}

#[test]
fn test_multiway() {
    let state = preflop(
        Position::BTN,
        3.0,
        5,
        &[("raise", 3.0), ("call", 3.0), ("call", 3.0)],
    );
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Multiway);
}

#[test]
fn test_blind_vs_blind() {
    let state = preflop(Position::BB, 2.0, 2, &[("raise", 3.0)]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::BlindVsBlind);
    assert_eq!(estimate_range(&analysis).key, "blind_steal");
}

#[test]
fn test_three_bet_from_events() {
    let state = preflop(Position::BTN, 8.0, 6, &[("raise", 3.0), ("3-bet", 10.0)]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Facing3Bet);
    assert!((analysis.sizing - 10.0).abs() < 1e-9);
    assert_eq!(estimate_range(&analysis).key, "standard_3bet");
}

fn with_bets(position: Position, to_call: f64, active: u32, bets: &[f64]) -> GameState {
    let mut state = preflop(position, to_call, active, &[]);
    state.opponent_bets = bets
        .iter()
        .enumerate()
        .map(|(i, &bet)| OpponentBet {
            name: format!("villain{}", i + 1),
            bet,
        })
        .collect();
    state
}

#[test]
fn test_three_bet_from_opponent_bets() {
    let state = with_bets(Position::CO, 13.0, 6, &[0.5, 1.0, 3.0, 13.0]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Facing3Bet);
    assert_eq!(analysis.raiser_count, 2);
    assert_eq!(analysis.limper_count, 0);
    assert!((analysis.sizing - 13.0).abs() < 1e-9);
    assert_eq!(estimate_range(&analysis).key, "tight_3bet");
}

#[test]
fn test_squeeze_from_opponent_bets() {
    let state = with_bets(Position::BTN, 2.5, 5, &[0.5, 1.0, 2.5, 2.5]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::SqueezeSpot);
    assert_eq!(analysis.cold_caller_count, 1);

    // the same price without the bets reads as a plain open
    let bare = analyze_action(&preflop(Position::BTN, 2.5, 5, &[]), &BLINDS);
    assert_eq!(bare.action_type, ActionType::Facing2Bet);
}

#[test]
fn test_blinds_alone_leave_pot_unopened() {
    let state = with_bets(Position::BTN, 0.0, 6, &[0.5, 1.0]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Unopened);
    assert_eq!(analysis.limper_count, 0);
}

#[test]
fn test_opponent_bets_json() {
    let state: GameState = serde_json::from_str(
        r#"{"position": "CO", "toCall": 9, "activePlayers": 6,
            "opponentBets": [{"name": "v1", "bet": 3}, {"name": "v2", "bet": 9}]}"#,
    )
    .unwrap();
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::Facing3Bet);
    assert_eq!(estimate_range(&analysis).key, "standard_3bet");
}

// ---------------------------------------------------------------------------
// Postflop
// ---------------------------------------------------------------------------

#[test]
fn test_postflop_checked_to() {
    let analysis = analyze_action(&postflop(10.0, 0.0, &[]), &BLINDS);
    assert_eq!(analysis.action_type, ActionType::PostflopCheck);
    let range = estimate_range(&analysis);
    assert!(!range.hands.is_empty());
    assert_eq!(range.sizing_context, "Checked to you");
}

#[test]
fn test_postflop_half_pot_bet() {
    let analysis = analyze_action(&postflop(15.0, 5.0, &[("bet", 5.0)]), &BLINDS);
    assert_eq!(analysis.action_type, ActionType::PostflopBet);
    assert!((analysis.sizing - 0.5).abs() < 1e-9);
    assert_eq!(analysis.aggression, Aggression::Standard);
    assert_eq!(estimate_range(&analysis).key, "small_bet");
}

#[test]
fn test_postflop_overbet() {
    let analysis = analyze_action(&postflop(30.0, 20.0, &[("bet", 20.0)]), &BLINDS);
    assert_eq!(analysis.aggression, Aggression::VeryAggressive);
    let range = estimate_range(&analysis);
    assert_eq!(range.key, "polarized_overbet");
    assert_eq!(range.strength, "Polarized");
}

#[test]
fn test_postflop_raise() {
    let state = postflop(40.0, 15.0, &[("bet", 5.0), ("raise", 20.0)]);
    let analysis = analyze_action(&state, &BLINDS);
    assert_eq!(analysis.action_type, ActionType::PostflopRaise);
    assert_eq!(estimate_range(&analysis).key, "postflop_raise");
}

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

#[test]
fn test_every_action_type_has_a_range() {
    for action_type in ALL_ACTION_TYPES {
        for sizing in [0.0, 0.4, 2.2, 3.0, 9.0, 40.0] {
            let analysis = ActionAnalysis {
                action_type,
                sizing,
                aggression: Aggression::Standard,
                raiser_count: 1,
                limper_count: 0,
                cold_caller_count: 0,
            };
            let range = estimate_range(&analysis);
            assert!(!range.hands.is_empty(), "{} at {}", action_type, sizing);
            assert!(range.percentage > 0.0 && range.percentage <= 100.0);
            assert_eq!(range.action_type, action_type);
        }
    }
}

#[test]
fn test_ranges_tighten_with_action() {
    let pct = |action_type, sizing| {
        estimate_range(&ActionAnalysis {
            action_type,
            sizing,
            aggression: Aggression::Standard,
            raiser_count: 1,
            limper_count: 0,
            cold_caller_count: 0,
        })
        .percentage
    };
    let open = pct(ActionType::Facing2Bet, 3.0);
    let three_bet = pct(ActionType::Facing3Bet, 10.0);
    let four_bet = pct(ActionType::Facing4BetPlus, 30.0);
    assert!(open > three_bet);
    assert!(three_bet > four_bet);
}

#[test]
fn test_complex_uses_conservative_default() {
    let analysis = ActionAnalysis {
        action_type: ActionType::Complex,
        sizing: 0.0,
        aggression: Aggression::None,
        raiser_count: 0,
        limper_count: 0,
        cold_caller_count: 0,
    };
    assert_eq!(estimate_range(&analysis).key, "conservative_default");
}

#[test]
fn test_event_kind_labels() {
    let event: BettingEvent =
        serde_json::from_str(r#"{"player": "v1", "action": "3-bet", "amount": 9}"#).unwrap();
    assert_eq!(event.action, EventKind::Raise);
    assert_eq!(EventKind::from_label("shove"), EventKind::AllIn);
    assert_eq!(EventKind::from_label("posts"), EventKind::Post);
    assert_eq!(EventKind::from_label("sits out"), EventKind::Other);
}

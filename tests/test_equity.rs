use gto_advisor::cards::*;
use gto_advisor::equity::*;
use gto_advisor::error::AdvisorError;
use gto_advisor::hand_evaluator::HandCategory;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

fn range(hands: &[&str]) -> Vec<String> {
    hands.iter().map(|h| h.to_string()).collect()
}

#[test]
fn test_aces_vs_random() {
    let result = calculate_equity(&[c("As"), c("Ah")], None, &[], 5000).unwrap();
    let eq = result.equity_percent();
    assert!(eq > 82.0 && eq < 88.0, "AA vs random: {}", eq);
}

#[test]
fn test_seven_deuce_vs_random() {
    let result = calculate_equity(&[c("7s"), c("2h")], None, &[], 5000).unwrap();
    let eq = result.equity_percent();
    assert!(eq > 31.0 && eq < 37.0, "72o vs random: {}", eq);
}

#[test]
fn test_aces_vs_kings() {
    let villain = range(&["KK"]);
    let result = calculate_equity(&[c("As"), c("Ah")], Some(&villain), &[], 5000).unwrap();
    let eq = result.equity_percent();
    assert!(eq > 75.0 && eq < 88.0, "AA vs KK: {}", eq);
}

#[test]
fn test_set_vs_flush_draw() {
    let board = parse_board("Ts9s2h").unwrap();
    let villain = range(&["AsKs"]);
    let result = calculate_equity(&[c("Td"), c("Th")], Some(&villain), &board, 3000).unwrap();
    assert!(result.equity_percent() > 50.0);
}

#[test]
fn test_river_is_deterministic() {
    let board = parse_board("AsKdQh7c2s").unwrap();
    let villain = range(&["JcTc"]);
    let result = calculate_equity(&[c("8d"), c("3h")], Some(&villain), &board, 200).unwrap();
    assert_eq!(result.losses, 200);
    assert_eq!(result.equity_percent(), 0.0);
}

#[test]
fn test_result_fields_consistent() {
    let board = parse_board("8c7d2s").unwrap();
    let result = calculate_equity(&[c("Ah"), c("Kh")], None, &board, 1000).unwrap();
    assert_eq!(result.samples, result.wins + result.ties + result.losses);
    assert_eq!(result.samples, 1000);
    let eq = result.equity_percent();
    assert!((0.0..=100.0).contains(&eq));
    let total = result.win_pct() + result.tie_pct() + result.loss_pct();
    assert!((total - 100.0).abs() < 1e-6);

    let s = format!("{}", result);
    assert!(s.contains("Win"));
    assert!(s.contains("equity"));
}

#[test]
fn test_zero_samples_rejected() {
    assert!(calculate_equity(&[c("As"), c("Ah")], None, &[], 0).is_err());
}

#[test]
fn test_invalid_board_size_rejected() {
    let board = parse_board("8c7d").unwrap();
    assert!(calculate_equity(&[c("As"), c("Ah")], None, &board, 100).is_err());
}

#[test]
fn test_no_valid_combos() {
    let villain = range(&["AsAh"]);
    let result = calculate_equity(&[c("As"), c("Ah")], Some(&villain), &[], 100);
    assert!(matches!(result, Err(AdvisorError::NoValidCombos)));
}

// ---------------------------------------------------------------------------
// Outs
// ---------------------------------------------------------------------------

#[test]
fn test_nut_flush_draw_outs() {
    let board = parse_board("Ts9s2h").unwrap();
    let outs = calculate_outs(&[c("As"), c("Ks")], &board).unwrap();
    assert_eq!(outs.by_category.get(&HandCategory::Flush), Some(&9));
    assert_eq!(outs.draw_outs(), 9);
    // six overcards plus eight non-spade cards pairing the board
    assert_eq!(outs.by_category.get(&HandCategory::Pair), Some(&14));
    assert_eq!(outs.outs, 23);
    assert_eq!(outs.improving_cards.len(), 23);
    assert_eq!(outs.description, "23 outs: 9 flush, 14 pair");
}

#[test]
fn test_board_pairing_cards_are_outs() {
    let board = parse_board("Qh7c2s").unwrap();
    let outs = calculate_outs(&[c("As"), c("Kd")], &board).unwrap();
    assert_eq!(outs.outs, 15);
    assert!(outs.improving_cards.contains(&c("2d")));
    assert!(outs.improving_cards.contains(&c("Qd")));
    assert!(outs.improving_cards.contains(&c("Ah")));
    // a better kicker alone does not count
    assert!(!outs.improving_cards.contains(&c("Jc")));
    assert_eq!(outs.draw_outs(), 0);
}

#[test]
fn test_flush_made_by_board_is_not_a_live_draw() {
    let board = parse_board("AsKsQs3s").unwrap();
    let outs = calculate_outs(&[c("7h"), c("2c")], &board).unwrap();
    assert_eq!(outs.by_category.get(&HandCategory::Flush), Some(&9));
    assert_eq!(outs.draw_outs(), 0);
}

#[test]
fn test_open_ended_straight_draw() {
    let board = parse_board("9c8d2h").unwrap();
    let outs = calculate_outs(&[c("Js"), c("Th")], &board).unwrap();
    assert_eq!(outs.by_category.get(&HandCategory::Straight), Some(&8));
    assert_eq!(outs.draw_outs(), 8);
}

#[test]
fn test_river_has_no_outs() {
    let board = parse_board("Ts9s2h3c4d").unwrap();
    let outs = calculate_outs(&[c("As"), c("Ks")], &board).unwrap();
    assert_eq!(outs.outs, 0);
}

#[test]
fn test_outs_need_a_flop() {
    assert!(calculate_outs(&[c("As"), c("Ks")], &[]).is_err());
}

#[test]
fn test_repeated_runs_converge() {
    let hero = [c("Ah"), c("Kh")];
    let villain = range(&["QQ", "JJ", "AQs", "KQs"]);
    let board = parse_board("Qh7h2c").unwrap();
    let first = calculate_equity(&hero, Some(&villain), &board, 4000)
        .unwrap()
        .equity_percent();
    let second = calculate_equity(&hero, Some(&villain), &board, 4000)
        .unwrap()
        .equity_percent();
    assert!((first - second).abs() <= 2.0, "{} vs {}", first, second);
}

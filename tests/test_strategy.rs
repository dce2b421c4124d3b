use gto_advisor::strategy::*;

#[test]
fn test_exact_weights_kept() {
    let s = Strategy::from_weights(&[(Action::Raise, 95.0), (Action::Fold, 5.0)]);
    assert_eq!(s.get(Action::Raise), 95);
    assert_eq!(s.get(Action::Fold), 5);
    assert_eq!(s.total(), 100);
    assert_eq!(s.primary_action(), Action::Raise);
    assert_eq!(s.to_string(), "Raise 95%, Fold 5%");
}

#[test]
fn test_shortfall_spread_evenly() {
    let s = Strategy::from_weights(&[(Action::Call, 30.0), (Action::Fold, 30.0)]);
    assert_eq!(s.get(Action::Call), 50);
    assert_eq!(s.get(Action::Fold), 50);
    // equal frequencies: the more active action leads
    assert_eq!(s.primary_action(), Action::Call);
}

#[test]
fn test_excess_rescaled_without_negatives() {
    let s = Strategy::from_weights(&[
        (Action::Raise, 80.0),
        (Action::Call, 60.0),
        (Action::Fold, 2.0),
    ]);
    assert_eq!(s.total(), 100);
    assert_eq!(s.get(Action::Raise), 59);
    assert_eq!(s.get(Action::Call), 41);
    assert!(!s.contains(Action::Fold));
    assert_eq!(s.len(), 2);
}

#[test]
fn test_weights_clamped() {
    let s = Strategy::from_weights(&[(Action::Raise, 150.0), (Action::Fold, -10.0)]);
    assert_eq!(s, Strategy::pure(Action::Raise));
}

#[test]
fn test_non_finite_weight_ignored() {
    let s = Strategy::from_weights(&[(Action::Call, f64::NAN), (Action::Fold, 100.0)]);
    assert_eq!(s.get(Action::Fold), 100);
    assert_eq!(s.total(), 100);
}

#[test]
fn test_empty_and_zero_weights() {
    assert_eq!(Strategy::from_weights(&[]), Strategy::pure(Action::Fold));

    let s = Strategy::from_weights(&[(Action::Call, 0.0), (Action::Fold, 0.0)]);
    assert_eq!(s.get(Action::Call), 50);
    assert_eq!(s.get(Action::Fold), 50);
}

#[test]
fn test_remainder_goes_to_preferred_action() {
    let s = Strategy::from_weights(&[
        (Action::Fold, 1.0),
        (Action::Call, 1.0),
        (Action::ThreeBet, 1.0),
    ]);
    assert_eq!(s.get(Action::ThreeBet), 34);
    assert_eq!(s.get(Action::Call), 33);
    assert_eq!(s.get(Action::Fold), 33);
    assert_eq!(s.primary_action(), Action::ThreeBet);
}

#[test]
fn test_repeated_actions_merge() {
    let s = Strategy::from_weights(&[
        (Action::Call, 40.0),
        (Action::Call, 20.0),
        (Action::Fold, 40.0),
    ]);
    assert_eq!(s.get(Action::Call), 60);
    assert_eq!(s.len(), 2);
}

#[test]
fn test_ranked_order() {
    let s = Strategy::from_weights(&[
        (Action::Fold, 20.0),
        (Action::Call, 50.0),
        (Action::Raise, 30.0),
    ]);
    let order: Vec<Action> = s.ranked().into_iter().map(|(a, _)| a).collect();
    assert_eq!(order, vec![Action::Call, Action::Raise, Action::Fold]);
    assert_eq!(s.primary_frequency(), 50);
}

#[test]
fn test_strategy_json() {
    let s = Strategy::from_weights(&[(Action::ThreeBet, 70.0), (Action::Call, 30.0)]);
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["3bet"], 70);
    assert_eq!(json["call"], 30);
}

#[test]
fn test_action_labels() {
    assert_eq!(Action::from_label("3-Bet"), Some(Action::ThreeBet));
    assert_eq!(Action::from_label(" CHECK "), Some(Action::Check));
    assert_eq!(Action::from_label("limp"), None);
    assert_eq!(Action::FourBet.as_str(), "4bet");
    assert_eq!(Action::FourBet.to_string(), "4-Bet");
    assert!(Action::Bet.is_aggressive());
    assert!(!Action::Call.is_aggressive());
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

#[test]
fn test_confidence_without_jitter() {
    let s = Strategy::from_weights(&[(Action::Raise, 65.0), (Action::Fold, 35.0)]);
    assert_eq!(confidence(&s, &NoJitter, "AKo|CO"), 65.0);
}

#[test]
fn test_confidence_jitter_bounded() {
    let noise = HashNoise::default();
    let s = Strategy::from_weights(&[(Action::Raise, 65.0), (Action::Fold, 35.0)]);
    for key in ["AKo|CO", "72o|UTG", "JTs|BTN|flop"] {
        let c = confidence(&s, &noise, key);
        assert!((63.0..=67.0).contains(&c), "{} -> {}", key, c);
        assert!(((c * 10.0).round() - c * 10.0).abs() < 1e-6);
    }
}

#[test]
fn test_confidence_clamped() {
    let noise = HashNoise { amplitude: 50.0 };
    let s = Strategy::pure(Action::Raise);
    for key in ["a", "b", "c", "d"] {
        let c = confidence(&s, &noise, key);
        assert!((0.0..=100.0).contains(&c));
    }
}

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::cards::{Card, Suit, ALL_RANKS};
use crate::game_state::Advice;
use crate::math_engine::PotOdds;
use crate::ranges::range_contains;
use crate::strategy::{Action, Strategy};

const BAR_WIDTH: usize = 30;

/// Label of the starting hand at a 13x13 grid cell; suited above the diagonal.
fn grid_label(row: usize, col: usize) -> String {
    let rank = |i: usize| ALL_RANKS[ALL_RANKS.len() - 1 - i].to_char();
    match row.cmp(&col) {
        std::cmp::Ordering::Equal => format!("{}{}", rank(row), rank(row)),
        std::cmp::Ordering::Less => format!("{}{}s", rank(row), rank(col)),
        std::cmp::Ordering::Greater => format!("{}{}o", rank(col), rank(row)),
    }
}

/// 13x13 starting-hand chart with the hands of `hands_in_range` highlighted.
pub fn range_grid(hands_in_range: &[String], title: &str) -> String {
    let size = ALL_RANKS.len();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        std::iter::once(Cell::new(""))
            .chain((0..size).map(|i| {
                let rank = ALL_RANKS[size - 1 - i].to_char();
                Cell::new(rank).set_alignment(CellAlignment::Center)
            }))
            .collect::<Vec<_>>(),
    );

    for row in 0..size {
        let rank = ALL_RANKS[size - 1 - row].to_char().to_string();
        let cells = std::iter::once(Cell::new(rank.bold().to_string())).chain((0..size).map(|col| {
            let label = grid_label(row, col);
            let styled = if range_contains(hands_in_range, &label) {
                label.green().bold().to_string()
            } else {
                label.dimmed().to_string()
            };
            Cell::new(styled).set_alignment(CellAlignment::Center)
        }));
        table.add_row(cells.collect::<Vec<_>>());
    }

    format!("  {}\n{}", title.bold(), table)
}

/// Horizontal bar for a percentage in [0, 100].
pub fn equity_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.1}%", clamped);

    if clamped >= 60.0 {
        format!("{} {}", bar.green(), pct)
    } else if clamped >= 40.0 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn board_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let text = card.pretty();
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn odds_table(pot: f64, bet: f64, odds: &PotOdds, equity: Option<f64>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);

    table.add_row(vec![
        Cell::new("Pot".bold().to_string()),
        Cell::new(format!("{:.2}", pot)),
    ]);
    table.add_row(vec![
        Cell::new("To Call".bold().to_string()),
        Cell::new(format!("{:.2}", bet)),
    ]);
    table.add_row(vec![
        Cell::new("Equity Needed".bold().to_string()),
        Cell::new(format!("{:.1}%", odds.percentage)),
    ]);
    table.add_row(vec![
        Cell::new("Pot After Call".bold().to_string()),
        Cell::new(format!("{:.2}", pot + bet)),
    ]);

    if let Some(eq) = equity {
        let verdict = if eq >= odds.percentage {
            "profitable call".green().to_string()
        } else {
            "not enough equity".red().to_string()
        };
        table.add_row(vec![
            Cell::new("Your Equity".bold().to_string()),
            Cell::new(format!("{:.1}% ({})", eq, verdict)),
        ]);
    }

    table.to_string()
}

pub fn styled_action(action: Action) -> String {
    let label = action.to_string().to_uppercase();
    match action {
        a if a.is_aggressive() => label.red().bold().to_string(),
        Action::Call => label.green().bold().to_string(),
        Action::Check => label.yellow().bold().to_string(),
        _ => label.dimmed().bold().to_string(),
    }
}

/// One bar per action, highest frequency first.
pub fn frequency_bars(strategy: &Strategy) -> String {
    strategy
        .ranked()
        .into_iter()
        .map(|(action, freq)| {
            let filled = (freq as usize * BAR_WIDTH) / 100;
            let bar = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(BAR_WIDTH - filled);
            format!("  {:<8} {} {:>3}%", action.to_string(), bar, freq)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn advice_table(advice: &Advice) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Field").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Left),
    ]);

    let mut row = |name: &str, value: String| {
        table.add_row(vec![Cell::new(name.bold().to_string()), Cell::new(value)]);
    };

    if let Some(notation) = &advice.hand_notation {
        row("Hand", notation.clone());
    }
    row("Hand Strength", format!("{:.0}", advice.hand_strength));
    if let (Some(hand_type), Some(purpose)) = (advice.hand_type, advice.betting_purpose) {
        row("Hand Type", format!("{} ({})", hand_type, purpose));
    }
    if let Some(eq) = advice.equity {
        row("Equity", format!("{:.1}%", eq));
    }
    row(
        "Pot Odds",
        advice
            .pot_odds
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "N/A".to_string()),
    );
    if let Some(outs) = &advice.outs {
        row("Outs", outs.description.clone());
    }
    if let Some(implied) = &advice.implied_odds {
        row("Implied Odds", implied.clone());
    }
    if let Some(texture) = &advice.board_texture {
        row("Board", texture.clone());
    }
    if let Some(range) = &advice.opponent_range {
        row(
            "Villain Range",
            format!("{} [{}] ~{:.0}%", range.name, range.strength, range.percentage),
        );
    }
    if let Some(stack) = &advice.stack_depth_info {
        row(
            "Stack",
            format!("{:.0}bb ({})", stack.big_blinds, stack.depth),
        );
    }

    table.to_string()
}

pub fn print_advice(advice: &Advice) {
    let size = if advice.primary_action.is_aggressive() || advice.primary_action == Action::Call {
        format!(" {:.2}", advice.bet_size)
    } else {
        String::new()
    };
    println!(
        "\n  {}{}  {}",
        styled_action(advice.primary_action),
        size,
        format!("(confidence {:.1}%)", advice.confidence).dimmed()
    );
    println!("\n{}", frequency_bars(&advice.strategy));
    println!("\n{}", advice_table(advice));
    print_section("Reasoning", &advice.reasoning);
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_labels() {
        assert_eq!(grid_label(0, 0), "AA");
        assert_eq!(grid_label(0, 1), "AKs");
        assert_eq!(grid_label(1, 0), "AKo");
        assert_eq!(grid_label(12, 11), "32o");
    }
}

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::advisor::Advisor;
use crate::cards::{parse_board, CardInput};
use crate::config::AdvisorConfig;
use crate::display::{
    board_display, equity_bar, odds_table, print_advice, print_error, print_section, range_grid,
};
use crate::equity::{calculate_equity, calculate_outs};
use crate::error::{AdvisorError, AdvisorResult};
use crate::game_state::{BettingEvent, EventKind, GameState, Street};
use crate::hand_evaluator::{evaluate_hand, preflop_strength};
use crate::math_engine::{ev, implied_odds, mdf, pot_odds, spr};
use crate::positions::Position;
use crate::preflop::opening_chart;
use crate::range_estimator::{estimate_range, ActionAnalysis, Aggression, ALL_ACTION_TYPES};
use crate::ranges::{parse_range, range_pct, total_combos};

#[derive(Parser)]
#[command(
    name = "gto-advise",
    version = "1.0.0",
    about = "Poker decision advisor: equity, ranges and mixed-strategy recommendations."
)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// JSON file with advisor settings (blinds, sample counts, jitter)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a strategy for a game state
    Advise {
        /// Hole cards (e.g., AsKh)
        #[arg(long)]
        hole: Option<String>,
        /// Board cards (e.g., "Qs Jh 2c")
        #[arg(long)]
        board: Option<String>,
        /// Position label (UTG, HJ, CO, BTN, SB, BB, ...)
        #[arg(short, long, default_value = "BTN")]
        position: String,
        #[arg(long, default_value = "3")]
        pot: f64,
        #[arg(long = "to-call", default_value = "0")]
        to_call: f64,
        /// Effective stack in chips (default 100 big blinds)
        #[arg(long)]
        stack: Option<f64>,
        #[arg(long, default_value = "2")]
        players: u32,
        /// Amount of an open raise faced, recorded as a betting event
        #[arg(long)]
        raise: Option<f64>,
        /// Read the whole game state from a JSON file
        #[arg(long, conflicts_with_all = ["hole", "board"])]
        state: Option<PathBuf>,
        /// Heads-up quick advice with a one-line reason
        #[arg(long)]
        quick: bool,
        #[arg(long)]
        json: bool,
    },
    /// Monte-Carlo equity against a range or a random hand
    Equity {
        /// Your hand (e.g., AhAs)
        hand: String,
        /// Villain range (e.g., "QQ+,AKs") or exact cards (KsKd)
        #[arg(long)]
        vs: Option<String>,
        #[arg(short, long)]
        board: Option<String>,
        #[arg(short, long, default_value = "5000")]
        sims: usize,
        #[arg(long)]
        json: bool,
    },
    /// Count outs to a better hand
    Outs {
        hand: String,
        board: String,
        #[arg(long)]
        json: bool,
    },
    /// Pot odds, implied odds, MDF and SPR
    Odds {
        pot: f64,
        bet: f64,
        /// Your equity in percent
        #[arg(short, long)]
        equity: Option<f64>,
        /// Outs for the implied-odds estimate
        #[arg(long)]
        outs: Option<u32>,
        #[arg(long = "cards-to-come", default_value = "1")]
        cards_to_come: u32,
        /// Effective stack, for the stack-to-pot ratio
        #[arg(long)]
        stack: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Evaluate 2 (preflop strength) or 5-7 cards (best hand)
    Eval {
        cards: String,
        #[arg(long)]
        json: bool,
    },
    /// Show an opening chart, an estimated opponent range, or a range string
    Range {
        /// Position (BTN), action type (facing3bet) or range ("TT+,AQs+")
        target: String,
        /// Sizing for action types: bb preflop, pot fraction postflop
        #[arg(long, default_value = "3")]
        sizing: f64,
        #[arg(long)]
        json: bool,
    },
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = dispatch(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

pub fn run_with_args(args: Vec<String>) -> AdvisorResult<()> {
    let cli = Cli::parse_from(args);
    dispatch(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env).try_init().ok();
}

fn load_advisor(config: Option<PathBuf>) -> AdvisorResult<Advisor> {
    let config = match config {
        Some(path) => AdvisorConfig::load(path)?,
        None => AdvisorConfig::default(),
    };
    Ok(Advisor::new(config))
}

fn dispatch(cli: Cli) -> AdvisorResult<()> {
    match cli.command {
        Commands::Advise {
            hole,
            board,
            position,
            pot,
            to_call,
            stack,
            players,
            raise,
            state,
            quick,
            json,
        } => {
            let advisor = load_advisor(cli.config)?;
            let state = match state {
                Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
                None => state_from_flags(
                    &advisor, hole, board, &position, pot, to_call, stack, players, raise,
                )?,
            };
            cmd_advise(&advisor, &state, quick, json)
        }
        Commands::Equity {
            hand,
            vs,
            board,
            sims,
            json,
        } => cmd_equity(&hand, vs.as_deref(), board.as_deref(), sims, json),
        Commands::Outs { hand, board, json } => cmd_outs(&hand, &board, json),
        Commands::Odds {
            pot,
            bet,
            equity,
            outs,
            cards_to_come,
            stack,
            json,
        } => cmd_odds(pot, bet, equity, outs, cards_to_come, stack, json),
        Commands::Eval { cards, json } => cmd_eval(&cards, json),
        Commands::Range {
            target,
            sizing,
            json,
        } => cmd_range(&target, sizing, json),
    }
}

fn print_json<T: Serialize>(value: &T) -> AdvisorResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn card_inputs(notation: &str) -> AdvisorResult<Vec<CardInput>> {
    Ok(parse_board(notation)?
        .into_iter()
        .map(|c| CardInput::Text(c.to_string()))
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn state_from_flags(
    advisor: &Advisor,
    hole: Option<String>,
    board: Option<String>,
    position: &str,
    pot: f64,
    to_call: f64,
    stack: Option<f64>,
    players: u32,
    raise: Option<f64>,
) -> AdvisorResult<GameState> {
    let hole = hole.ok_or_else(|| {
        AdvisorError::InvalidHandNotation("--hole or --state is required".to_string())
    })?;
    let board_cards = match board {
        Some(b) => card_inputs(&b)?,
        None => Vec::new(),
    };
    let betting_action = raise
        .map(|amount| {
            vec![BettingEvent {
                player: "villain".to_string(),
                action: EventKind::Raise,
                amount,
            }]
        })
        .unwrap_or_default();

    Ok(GameState {
        street: Street::from_board_len(board_cards.len()),
        position: Position::from_label(position).unwrap_or_default(),
        pot_size: pot,
        to_call,
        stack_size: stack.unwrap_or(100.0 * advisor.blind_levels().big_blind),
        active_players: players,
        hole_cards: card_inputs(&hole)?,
        board_cards,
        betting_action,
        is_my_turn: true,
        ..Default::default()
    })
}

fn cmd_advise(advisor: &Advisor, state: &GameState, quick: bool, json: bool) -> AdvisorResult<()> {
    let advice = if quick {
        advisor.quick_advice(
            &state.hole_cards,
            &state.board_cards,
            state.position,
            state.pot_size,
            state.to_call,
        )
    } else {
        advisor.get_advice(state)
    };

    if json {
        return print_json(&advice);
    }

    if !state.board_cards.is_empty() {
        let board: Vec<_> = state
            .board_cards
            .iter()
            .filter_map(|c| crate::cards::Card::parse(c).ok())
            .collect();
        println!("\n  Board: {}", board_display(&board));
    }
    print_advice(&advice);
    println!();
    Ok(())
}

fn cmd_equity(
    hand: &str,
    vs: Option<&str>,
    board: Option<&str>,
    sims: usize,
    json: bool,
) -> AdvisorResult<()> {
    let hero = parse_board(hand)?;
    let board_cards = match board {
        Some(b) => parse_board(b)?,
        None => Vec::new(),
    };

    // Exact cards ("KsKd") are treated as a single-combo range.
    let villain: Option<Vec<String>> = vs.map(|v| match parse_board(v) {
        Ok(cards) if cards.len() == 2 => vec![format!("{}{}", cards[0], cards[1])],
        _ => parse_range(v),
    });

    let result = calculate_equity(&hero, villain.as_deref(), &board_cards, sims)?;

    if json {
        #[derive(Serialize)]
        struct EquityOutput {
            equity: f64,
            win: f64,
            tie: f64,
            loss: f64,
            samples: u64,
        }
        return print_json(&EquityOutput {
            equity: result.equity_percent(),
            win: result.win_pct(),
            tie: result.tie_pct(),
            loss: result.loss_pct(),
            samples: result.samples,
        });
    }

    let versus = vs.unwrap_or("random");
    let board_str = if board_cards.is_empty() {
        String::new()
    } else {
        format!(" on {}", board_display(&board_cards))
    };
    println!(
        "\n  {} vs {}{}",
        board_display(&hero),
        versus.bold(),
        board_str
    );
    println!("  {}", equity_bar(result.equity_percent(), 30));
    println!("  {}\n", result.to_string().dimmed());
    Ok(())
}

fn cmd_outs(hand: &str, board: &str, json: bool) -> AdvisorResult<()> {
    let hole = parse_board(hand)?;
    let board_cards = parse_board(board)?;
    let outs = calculate_outs(&hole, &board_cards)?;
    if json {
        return print_json(&outs);
    }

    let to_come = Street::from_board_len(board_cards.len()).cards_to_come();
    println!(
        "\n  {} on {}",
        board_display(&hole),
        board_display(&board_cards)
    );
    print_section("Outs", &outs.description);
    if !outs.improving_cards.is_empty() {
        println!("  {}", board_display(&outs.improving_cards));
    }
    if to_come > 0 {
        print_section("Chance to improve", &implied_odds(outs.outs, to_come).to_string());
    }
    println!();
    Ok(())
}

fn cmd_odds(
    pot: f64,
    bet: f64,
    equity: Option<f64>,
    outs: Option<u32>,
    cards_to_come: u32,
    stack: Option<f64>,
    json: bool,
) -> AdvisorResult<()> {
    let odds = pot_odds(pot, bet)?;
    let defence = mdf(bet, pot).ok();
    let implied = outs.map(|o| implied_odds(o, cards_to_come));
    let stack_ratio = match stack {
        Some(s) => Some(spr(s, pot)?),
        None => None,
    };
    let call_ev = equity.map(|eq| ev(eq / 100.0, pot, bet));

    if json {
        #[derive(Serialize)]
        struct OddsOutput {
            pot_odds: f64,
            mdf: Option<f64>,
            implied_odds: Option<f64>,
            spr: Option<f64>,
            call_ev: Option<f64>,
        }
        return print_json(&OddsOutput {
            pot_odds: odds.percentage,
            mdf: defence.map(|m| m * 100.0),
            implied_odds: implied.map(|i| i.percentage),
            spr: stack_ratio.map(|s| s.ratio),
            call_ev,
        });
    }

    println!("\n{}", odds_table(pot, bet, &odds, equity));
    if let Some(m) = defence {
        println!("  MDF: {:.1}%", m * 100.0);
    }
    if let Some(i) = implied {
        println!("  Implied: {}", i);
    }
    if let Some(s) = stack_ratio {
        println!("  {}", s);
    }
    if let Some(value) = call_ev {
        let text = format!("{:.2}", value);
        let styled = if value >= 0.0 { text.green() } else { text.red() };
        println!("  EV of call: {}", styled);
    }
    println!();
    Ok(())
}

fn cmd_eval(cards: &str, json: bool) -> AdvisorResult<()> {
    let parsed = parse_board(cards)?;
    if parsed.len() == 2 {
        let strength = preflop_strength(&parsed);
        if json {
            return print_json(&strength);
        }
        println!(
            "\n  {}  {} ({:.0}/100)\n",
            board_display(&parsed),
            strength.description.bold(),
            strength.strength
        );
        return Ok(());
    }

    let hand = evaluate_hand(&parsed)?;
    if json {
        #[derive(Serialize)]
        struct EvalOutput {
            category: crate::hand_evaluator::HandCategory,
            score: u32,
            description: String,
            cards: Vec<crate::cards::Card>,
        }
        return print_json(&EvalOutput {
            category: hand.category,
            score: hand.score,
            description: hand.description.clone(),
            cards: hand.cards.clone(),
        });
    }
    println!(
        "\n  {}  {}  {}\n",
        board_display(&parsed),
        hand.description.bold(),
        format!("(score {})", hand.score).dimmed()
    );
    Ok(())
}

fn cmd_range(target: &str, sizing: f64, json: bool) -> AdvisorResult<()> {
    if let Some(position) = Position::from_label(target) {
        let chart = opening_chart(position).ok_or_else(|| {
            AdvisorError::InvalidHandNotation(format!("no opening chart for {}", position))
        })?;
        if json {
            #[derive(Serialize)]
            struct ChartOutput<'a> {
                position: Position,
                raise: &'a [String],
                mixed: &'a [String],
                open_size_bb: f64,
                raise_pct: f64,
            }
            return print_json(&ChartOutput {
                position,
                raise: &chart.raise,
                mixed: &chart.mixed,
                open_size_bb: chart.open_size_bb,
                raise_pct: range_pct(&chart.raise),
            });
        }
        let title = format!(
            "{} open ({:.1}% of hands, {}bb)",
            position,
            range_pct(&chart.raise),
            chart.open_size_bb
        );
        println!("\n{}", range_grid(&chart.raise, &title));
        if !chart.mixed.is_empty() {
            println!("  Mixed: {}\n", chart.mixed.join(", ").dimmed());
        }
        return Ok(());
    }

    if let Some(action_type) = ALL_ACTION_TYPES.iter().find(|t| t.key() == target) {
        let analysis = ActionAnalysis {
            action_type: *action_type,
            sizing,
            aggression: Aggression::Standard,
            raiser_count: 0,
            limper_count: 0,
            cold_caller_count: 0,
        };
        let range = estimate_range(&analysis);
        if json {
            return print_json(&range);
        }
        let title = format!(
            "{} [{}] ~{:.1}% ({})",
            range.name, range.strength, range.percentage, range.description
        );
        println!("\n{}\n", range_grid(&range.hands, &title));
        return Ok(());
    }

    let hands = parse_range(target);
    if hands.is_empty() {
        return Err(AdvisorError::InvalidHandNotation(target.to_string()));
    }
    if json {
        return print_json(&hands);
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Hands"), Cell::new("Combos"), Cell::new("Range %")]);
    table.add_row(vec![
        Cell::new(hands.len()),
        Cell::new(total_combos(&hands)),
        Cell::new(format!("{:.1}%", range_pct(&hands))),
    ]);
    println!("\n{}", range_grid(&hands, target));
    println!("{}\n", table);
    Ok(())
}

pub mod advisor;
pub mod cards;
pub mod cli;
pub mod config;
pub mod display;
pub mod equity;
pub mod error;
pub mod game_state;
pub mod hand_evaluator;
pub mod hand_type;
pub mod math_engine;
pub mod positions;
pub mod postflop;
pub mod preflop;
pub mod range_estimator;
pub mod ranges;
pub mod strategy;

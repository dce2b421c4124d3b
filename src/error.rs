use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(String),

    #[error("Invalid card: {0}")]
    InvalidCard(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Need at least {need} cards, got {got}")]
    InsufficientCards { need: usize, got: usize },

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Invalid sizing: {0}")]
    InvalidSizing(String),

    #[error("No valid villain combos after removing dead cards")]
    NoValidCombos,

    #[error("Advice computation failed: {0}")]
    AdviceComputation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

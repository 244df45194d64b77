//! Error taxonomy shared by every fallible entry point.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GtoError {
    #[error("duplicate cards supplied across hands/board")]
    DuplicateCards,

    #[error("card index {0} is outside the valid range 0..52")]
    InvalidCard(u8),

    #[error("too many hands supplied: {0} (max {1})")]
    TooManyHands(usize, usize),

    #[error("preflop group table is invalid: {0}")]
    BadGroupTable(&'static str),

    #[error("no valid combos remain in range after removing dead cards")]
    NoValidCombos,

    #[error("invalid card notation: {0}")]
    BadCardNotation(String),

    #[error("invalid range token: {0}")]
    BadRangeToken(String),
}

pub type GtoResult<T> = Result<T, GtoError>;

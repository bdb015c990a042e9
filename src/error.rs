use thiserror::Error;

use crate::field::ValidationKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index {index} is out of range for a grid of {len} cells")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No targetable cell left on the grid")]
    NoEligibleCell,
    #[error("Time limit is invalid: {0:?}")]
    InvalidTimeLimit(Vec<ValidationKind>),
    #[error("A result dialog is still waiting for a decision")]
    AwaitingDecision,
}

pub type Result<T> = std::result::Result<T, GameError>;

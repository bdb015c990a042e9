use std::fmt;

use serde::{Deserialize, Serialize};

/// Visible state of a single grid cell.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Untouched cell, the only state random selection picks from.
    #[serde(rename = "blue")]
    Blue,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "red")]
    Red,
}

impl CellState {
    pub fn is_targetable(self) -> bool {
        self == CellState::Blue
    }
}

/// Fixed-length row-major grid snapshot.
pub type Grid = Vec<CellState>;

/// Build a grid of `len` targetable cells.
pub fn new_grid(len: usize) -> Grid {
    vec![CellState::Blue; len]
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    #[serde(rename = "player")]
    Player,
    #[serde(rename = "computer")]
    Computer,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => f.write_str("player"),
            Winner::Computer => f.write_str("computer"),
        }
    }
}

/// Payload handed to the result dialog.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultData {
    pub winner: Winner,
}

/// Presentation unit announcing the outcome of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDialog {
    pub title: String,
}

impl ResultDialog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn message(&self, data: &ResultData) -> String {
        match data.winner {
            Winner::Player => format!("{}: you won!", self.title),
            Winner::Computer => format!("{}: the computer won.", self.title),
        }
    }
}

impl Default for ResultDialog {
    fn default() -> Self {
        Self::new("Game over")
    }
}

/// Session state machine: `Idle -> Playing -> AwaitingModalDecision -> (Playing | Idle)`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "phase")]
pub enum GamePhase {
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "playing")]
    Playing,
    #[serde(rename = "awaiting_modal_decision")]
    AwaitingModalDecision,
}

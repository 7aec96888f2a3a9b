//! Engine error types

use crate::board::HexIndex;
use crate::pieces::Player;

/// Errors returned by engine entry points.
///
/// Rule violations (selecting an opponent piece, confirming an illegal
/// destination) are not errors; they come back as ignored or deselected
/// outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("hex index {index} is outside the board (0..{len})")]
    HexOutOfRange { index: HexIndex, len: usize },

    #[error("bench slot {slot} is outside {player}'s bench (0..{len})")]
    BenchSlotOutOfRange { player: Player, slot: usize, len: usize },

    #[error("game is over, {winner} won")]
    GameOver { winner: Player },

    #[error("another action is still being applied")]
    ActionInFlight,
}

/// Errors found while validating a board layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    NoRows,

    #[error("row {row} has no hexes")]
    EmptyRow { row: usize },

    #[error("{role} hex {index} is outside the board (0..{len})")]
    HexOutOfRange { role: &'static str, index: HexIndex, len: usize },

    #[error("hex {index} cannot be both impassable and the center")]
    ImpassableCenter { index: HexIndex },

    #[error("each player needs at least one regular piece")]
    NoRegularPieces,

    #[error("{count} pieces per player exceeds the limit of {max}")]
    TooManyPieces { count: usize, max: usize },
}

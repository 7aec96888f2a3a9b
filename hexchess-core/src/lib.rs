//! HexChess Core - Rules engine
//!
//! This crate provides the game logic for HexChess:
//! - Board geometry (irregular hex grid addressed by flat index)
//! - Piece kinds and the board layout
//! - Game state, placement/move legality and move generation
//! - Turn controller with blocker bonus actions and win detection

pub mod board;
pub mod pieces;
pub mod layout;
pub mod game;
pub mod rules;
pub mod turn;
pub mod error;

// Re-exports for convenient access
pub use board::{generate_adjacency, AdjacencyTable, Direction, HexIndex, Neighbors, STANDARD_ROWS};
pub use pieces::{Location, MoveType, Piece, PieceId, PieceKind, Player};
pub use layout::{Layout, MAX_PIECES_PER_PLAYER};
pub use game::{
    initialize, GamePhase, GameState, HexCell, Located, MoveRecord, Origin, PlayerInventory,
    Selection, Status,
};
pub use rules::{
    check_win, is_valid_move_destination, is_valid_placement_hex, legal_moves, legal_placements,
    material,
};
pub use turn::{Action, ActionGate, ActionOutcome, TurnController};
pub use error::{EngineError, LayoutError};

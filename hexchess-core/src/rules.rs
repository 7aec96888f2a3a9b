//! Move legality, move generation and win detection
//!
//! All functions here are read-only over a `GameState`. Legal hex sets are
//! returned in a stable order: board order for placements, and
//! `Direction::ALL` order (nearest hex first) for moves.

use crate::board::{Direction, HexIndex};
use crate::error::EngineError;
use crate::game::{GameState, HexCell};
use crate::pieces::{MoveType, Piece, PieceKind, Player};

// ============================================================================
// LEGALITY
// ============================================================================

/// Can a bench piece be placed on this hex?
pub fn is_valid_placement_hex(state: &GameState, hex: HexIndex) -> Result<bool, EngineError> {
    state.cell(hex).map(accepts_placement)
}

/// Can a piece of `mover` move into this hex?
pub fn is_valid_move_destination(
    state: &GameState,
    hex: HexIndex,
    mover: Player,
) -> Result<bool, EngineError> {
    state.cell(hex).map(|cell| accepts_mover(cell, mover))
}

fn accepts_placement(cell: &HexCell) -> bool {
    cell.is_empty() && !cell.is_blocked() && !cell.is_impassable && cell.allows_initial_deploy
}

fn accepts_mover(cell: &HexCell, mover: Player) -> bool {
    if cell.is_impassable || cell.is_blocked() {
        return false;
    }
    match &cell.piece {
        None => true,
        Some(occupant) => is_capturable(cell, occupant, mover),
    }
}

/// Opponent pieces can be taken unless they stand in a safe zone or are blockers
fn is_capturable(cell: &HexCell, occupant: &Piece, mover: Player) -> bool {
    occupant.owner != mover && occupant.kind != PieceKind::Blocker && !cell.is_safe
}

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// Hexes that accept a bench placement, in board order
pub fn legal_placements(state: &GameState) -> Vec<HexIndex> {
    state
        .cells()
        .iter()
        .filter(|cell| accepts_placement(cell))
        .map(|cell| cell.index)
        .collect()
}

/// Destinations for the piece standing on `from`. Empty if the hex is empty.
pub fn legal_moves(state: &GameState, from: HexIndex) -> Result<Vec<HexIndex>, EngineError> {
    let piece = match state.cell(from)?.piece {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };

    let mut moves = Vec::new();
    match piece.kind.move_type() {
        MoveType::Step => generate_step_moves(state, from, &piece, &mut moves),
        MoveType::Slide => generate_slide_moves(state, from, &piece, &mut moves),
        MoveType::None => {} // Blockers stay where they were placed
    }
    Ok(moves)
}

fn generate_step_moves(state: &GameState, from: HexIndex, piece: &Piece, moves: &mut Vec<HexIndex>) {
    let Some(neighbors) = state.adjacency().neighbors(from) else {
        return;
    };
    for (_, dest) in neighbors.iter() {
        if accepts_mover(&state.cells()[dest], piece.owner) {
            moves.push(dest);
        }
    }
}

fn generate_slide_moves(state: &GameState, from: HexIndex, piece: &Piece, moves: &mut Vec<HexIndex>) {
    let adjacency = state.adjacency();

    for dir in Direction::ALL {
        let mut current = from;

        while let Some(next) = adjacency.step(current, dir) {
            let cell = &state.cells()[next];
            if !accepts_mover(cell, piece.owner) {
                break; // Friendly, protected, blocked or impassable
            }

            moves.push(next);

            if cell.piece.is_some() {
                break; // Capture ends the slide
            }
            current = next;
        }
    }
}

// ============================================================================
// WIN DETECTION
// ============================================================================

/// Regular pieces on the bench plus regular or promoted pieces on the board
pub fn material(state: &GameState, player: Player) -> usize {
    let on_bench = state
        .player(player)
        .bench
        .iter()
        .filter(|p| p.kind == PieceKind::Regular)
        .count();
    let on_board = state
        .pieces_on_board(player)
        .filter(|(_, p)| p.kind.is_material())
        .count();
    on_bench + on_board
}

/// Has `player` won? True once the opponent has no material left.
pub fn check_win(state: &GameState, player: Player) -> bool {
    material(state, player.opponent()) == 0
}

// ============================================================================
// TESTS
// ============================================================================

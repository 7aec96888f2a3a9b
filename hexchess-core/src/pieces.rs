//! Piece definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::HexIndex;

/// Player seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Seat number as shown to players (1 or 2)
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based index for per-player arrays
    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Movement type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    Step,   // One hex to any neighbor
    Slide,  // Any distance in a straight line
    None,   // Never moves once placed
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Regular,
    Blocker,
    Promoted,
}

impl PieceKind {
    pub fn move_type(self) -> MoveType {
        match self {
            PieceKind::Regular => MoveType::Step,
            PieceKind::Promoted => MoveType::Slide,
            PieceKind::Blocker => MoveType::None,
        }
    }

    /// Counts towards a player's remaining material
    pub fn is_material(self) -> bool {
        matches!(self, PieceKind::Regular | PieceKind::Promoted)
    }

    /// Single-letter code used in move logs and text boards
    pub fn code(self) -> char {
        match self {
            PieceKind::Regular => 'R',
            PieceKind::Blocker => 'B',
            PieceKind::Promoted => 'P',
        }
    }
}

/// Unique piece identifier within one game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A game piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: Player,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, owner: Player) -> Self {
        Self { id, kind, owner }
    }

    /// Promote a regular piece. Other kinds are left untouched.
    /// Returns true if the kind changed.
    pub fn promote(&mut self) -> bool {
        if self.kind == PieceKind::Regular {
            self.kind = PieceKind::Promoted;
            true
        } else {
            false
        }
    }
}

/// Where a piece currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Bench { player: Player, slot: usize },
    Board { hex: HexIndex },
    /// Held in the capturing player's collection
    Captured { by: Player },
}

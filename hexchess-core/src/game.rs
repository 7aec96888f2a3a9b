//! Game state and board model

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{generate_adjacency, AdjacencyTable, HexIndex};
use crate::error::{EngineError, LayoutError};
use crate::layout::Layout;
use crate::pieces::{Location, Piece, PieceId, PieceKind, Player};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Active,
    Ended,
}

/// One hex of the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexCell {
    pub index: HexIndex,
    /// Occupant, owned by this hex while present
    pub piece: Option<Piece>,
    pub is_safe: bool,
    pub is_center: bool,
    pub is_impassable: bool,
    pub allows_initial_deploy: bool,
    /// Set once a blocker lands here; never cleared
    pub(crate) is_blocked: bool,
}

impl HexCell {
    pub fn is_blocked(&self) -> bool {
        self.is_blocked
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

/// Pieces held by one player off the board
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInventory {
    /// Undeployed pieces, in creation order
    pub bench: Vec<Piece>,
    /// Opponent pieces this player has taken
    pub captured: Vec<Piece>,
}

/// Where a selected piece was picked up from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Bench { player: Player, slot: usize },
    Board { hex: HexIndex },
}

/// The piece currently picked up, with its legal destinations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub piece: PieceId,
    pub origin: Origin,
    pub destinations: Vec<HexIndex>,
}

impl Selection {
    pub fn allows(&self, hex: HexIndex) -> bool {
        self.destinations.contains(&hex)
    }
}

/// One applied action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Value of the turn counter when the action was taken
    pub turn: u32,
    pub player: Player,
    pub piece: PieceId,
    /// Kind of the piece after the action
    pub kind: PieceKind,
    /// Source hex; `None` for a bench placement
    pub from: Option<HexIndex>,
    pub to: HexIndex,
    pub captured: Option<PieceId>,
    pub promoted: bool,
    pub bonus_granted: bool,
}

impl MoveRecord {
    pub fn is_placement(&self) -> bool {
        self.from.is_none()
    }
}

/// A piece together with where it was found
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Located {
    pub piece: Piece,
    pub location: Location,
}

/// Summary of whose turn it is, or who won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    ToMove { player: Player, bonus_pending: bool },
    Won { winner: Player },
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Complete game state. Mutated only through the turn controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) layout: Arc<Layout>,
    pub(crate) adjacency: Arc<AdjacencyTable>,
    pub(crate) board: Vec<HexCell>,
    pub(crate) players: [PlayerInventory; 2],
    pub(crate) current_turn: Player,
    pub(crate) turn_count: u32,
    pub(crate) phase: GamePhase,
    pub(crate) winner: Option<Player>,
    pub(crate) selection: Option<Selection>,
    pub(crate) bonus_pending: bool,
    pub(crate) history: Vec<MoveRecord>,
}

/// Fresh game on the standard board
pub fn initialize() -> GameState {
    GameState::new()
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game on the standard board
    pub fn new() -> Self {
        let layout = Layout::standard();
        let adjacency = generate_adjacency(&layout.rows);
        Self::build(Arc::new(layout), Arc::new(adjacency))
    }

    /// New game on a custom layout
    pub fn from_layout(layout: Layout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let adjacency = generate_adjacency(&layout.rows);
        Ok(Self::build(Arc::new(layout), Arc::new(adjacency)))
    }

    /// Fresh game sharing this game's layout and adjacency table
    pub fn restart(&self) -> Self {
        Self::build(Arc::clone(&self.layout), Arc::clone(&self.adjacency))
    }

    fn build(layout: Arc<Layout>, adjacency: Arc<AdjacencyTable>) -> Self {
        let board = build_board(&layout);
        let players = [
            build_bench(&layout, Player::One),
            build_bench(&layout, Player::Two),
        ];

        Self {
            layout,
            adjacency,
            board,
            players,
            current_turn: Player::One,
            turn_count: 0,
            phase: GamePhase::Active,
            winner: None,
            selection: None,
            bonus_pending: false,
            history: Vec::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// Number of completed turns
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// True while the player to move is taking a blocker bonus action
    pub fn bonus_pending(&self) -> bool {
        self.bonus_pending
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn adjacency(&self) -> &AdjacencyTable {
        &self.adjacency
    }

    pub fn hex_count(&self) -> usize {
        self.board.len()
    }

    /// All hexes in index order
    pub fn cells(&self) -> &[HexCell] {
        &self.board
    }

    /// A hex by index
    pub fn cell(&self, hex: HexIndex) -> Result<&HexCell, EngineError> {
        self.board.get(hex).ok_or(EngineError::HexOutOfRange {
            index: hex,
            len: self.board.len(),
        })
    }

    pub fn player(&self, player: Player) -> &PlayerInventory {
        &self.players[player.index()]
    }

    /// A bench piece by slot
    pub fn bench_piece(&self, player: Player, slot: usize) -> Result<&Piece, EngineError> {
        let bench = &self.player(player).bench;
        bench.get(slot).ok_or(EngineError::BenchSlotOutOfRange {
            player,
            slot,
            len: bench.len(),
        })
    }

    /// Pieces a player has on the board, in hex order
    pub fn pieces_on_board(&self, player: Player) -> impl Iterator<Item = (HexIndex, &Piece)> + '_ {
        self.board.iter().filter_map(move |cell| match &cell.piece {
            Some(piece) if piece.owner == player => Some((cell.index, piece)),
            _ => None,
        })
    }

    /// Find a piece by id on the board, a bench, or a captured pile
    pub fn locate(&self, id: PieceId) -> Option<Located> {
        for cell in &self.board {
            if let Some(piece) = cell.piece.filter(|p| p.id == id) {
                return Some(Located {
                    piece,
                    location: Location::Board { hex: cell.index },
                });
            }
        }

        for player in Player::BOTH {
            let inventory = self.player(player);
            if let Some(slot) = inventory.bench.iter().position(|p| p.id == id) {
                return Some(Located {
                    piece: inventory.bench[slot],
                    location: Location::Bench { player, slot },
                });
            }
            if let Some(&piece) = inventory.captured.iter().find(|p| p.id == id) {
                return Some(Located {
                    piece,
                    location: Location::Captured { by: player },
                });
            }
        }

        None
    }

    pub fn status(&self) -> Status {
        match self.winner {
            Some(winner) => Status::Won { winner },
            None => Status::ToMove {
                player: self.current_turn,
                bonus_pending: self.bonus_pending,
            },
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SETUP HELPERS
// ============================================================================

fn build_board(layout: &Layout) -> Vec<HexCell> {
    let no_deploy = layout.no_deploy();
    (0..layout.hex_count())
        .map(|index| HexCell {
            index,
            piece: None,
            is_safe: layout.safe.contains(&index),
            is_center: layout.center.contains(&index),
            is_impassable: layout.impassable.contains(&index),
            allows_initial_deploy: !no_deploy.contains(&index),
            is_blocked: false,
        })
        .collect()
}

/// Regulars first, then blockers. Ids are unique across both benches;
/// `Layout::validate` bounds the count so they fit in a `u16`.
fn build_bench(layout: &Layout, owner: Player) -> PlayerInventory {
    let per_player = layout.regulars + layout.blockers;
    let first_id = owner.index() * per_player;
    let kinds = std::iter::repeat(PieceKind::Regular)
        .take(layout.regulars)
        .chain(std::iter::repeat(PieceKind::Blocker).take(layout.blockers));

    let bench = kinds
        .enumerate()
        .map(|(i, kind)| Piece::new(PieceId((first_id + i) as u16), kind, owner))
        .collect();

    PlayerInventory {
        bench,
        captured: Vec::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Turn controller - selection state machine and action application
//!
//! The controller owns the single `GameState` of a game. Each call runs to
//! completion before returning; `ActionGate` adds a fail-closed guard for
//! front ends that may deliver the same gesture twice.

use std::cell::RefCell;

use crate::board::HexIndex;
use crate::error::EngineError;
use crate::game::{GamePhase, GameState, MoveRecord, Origin, Selection};
use crate::pieces::{Piece, PieceId, PieceKind, Player};
use crate::rules::{check_win, legal_moves, legal_placements};

// ============================================================================
// ACTIONS AND OUTCOMES
// ============================================================================

/// One external gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Select(Origin),
    Confirm(HexIndex),
    Deselect,
    NewGame,
}

/// What an action did to the game
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed
    Ignored,
    /// A piece was picked up; these are its legal destinations
    Selected { destinations: Vec<HexIndex> },
    /// The selection was dropped, board untouched
    Deselected,
    /// The board changed
    Applied {
        record: MoveRecord,
        winner: Option<Player>,
    },
    /// A fresh game replaced the old one
    Restarted,
}

impl ActionOutcome {
    /// Did the board or turn order change?
    pub fn mutated(&self) -> bool {
        matches!(self, ActionOutcome::Applied { .. } | ActionOutcome::Restarted)
    }

    pub fn game_ended(&self) -> bool {
        matches!(self, ActionOutcome::Applied { winner: Some(_), .. })
    }
}

// ============================================================================
// TURN CONTROLLER
// ============================================================================

/// Owns the game state and applies actions to it
#[derive(Clone, Debug, Default)]
pub struct TurnController {
    state: GameState,
}

impl TurnController {
    pub fn new(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Dispatch one gesture
    pub fn handle(&mut self, action: Action) -> Result<ActionOutcome, EngineError> {
        match action {
            Action::Select(origin) => self.select(origin),
            Action::Confirm(hex) => self.confirm(hex),
            Action::Deselect => Ok(self.deselect()),
            Action::NewGame => {
                self.new_game();
                Ok(ActionOutcome::Restarted)
            }
        }
    }

    /// Pick up a piece, or act on the board while one is held.
    ///
    /// A bench origin while a piece is held drops the selection. A board
    /// origin while a piece is held is treated as a destination.
    pub fn select(&mut self, origin: Origin) -> Result<ActionOutcome, EngineError> {
        self.ensure_active()?;
        let current = self.state.current_turn;

        match origin {
            Origin::Bench { player, slot } => {
                let piece = *self.state.bench_piece(player, slot)?;
                if self.state.selection.take().is_some() {
                    tracing::debug!("Bench clicked while holding a piece, deselecting");
                    return Ok(ActionOutcome::Deselected);
                }
                if player != current {
                    return Ok(ActionOutcome::Ignored);
                }

                let destinations = legal_placements(&self.state);
                tracing::debug!("{} picked {:?} {} from bench", current, piece.kind, piece.id);
                Ok(self.hold(piece, origin, destinations))
            }
            Origin::Board { hex } => {
                let occupant = self.state.cell(hex)?.piece;
                if self.state.selection.is_some() {
                    return self.confirm(hex);
                }

                match occupant {
                    Some(piece) if piece.owner == current => {
                        let destinations = legal_moves(&self.state, hex)?;
                        tracing::debug!("{} picked {:?} {} at hex {}", current, piece.kind, piece.id, hex);
                        Ok(self.hold(piece, origin, destinations))
                    }
                    _ => Ok(ActionOutcome::Ignored),
                }
            }
        }
    }

    /// Act with the held piece. Destinations outside its legal set only
    /// drop the selection.
    pub fn confirm(&mut self, destination: HexIndex) -> Result<ActionOutcome, EngineError> {
        self.ensure_active()?;
        self.state.cell(destination)?;

        let Some(selection) = self.state.selection.take() else {
            return Ok(ActionOutcome::Ignored);
        };
        if !selection.allows(destination) {
            tracing::debug!("Hex {} is not a legal destination, deselecting", destination);
            return Ok(ActionOutcome::Deselected);
        }

        Ok(self.apply(&selection, destination))
    }

    /// Drop the current selection, if any
    pub fn deselect(&mut self) -> ActionOutcome {
        match self.state.selection.take() {
            Some(_) => ActionOutcome::Deselected,
            None => ActionOutcome::Ignored,
        }
    }

    /// Replace the game with a fresh one on the same layout
    pub fn new_game(&mut self) {
        tracing::debug!("Starting new game");
        self.state = self.state.restart();
    }

    fn ensure_active(&self) -> Result<(), EngineError> {
        match (self.state.phase, self.state.winner) {
            (GamePhase::Ended, Some(winner)) => Err(EngineError::GameOver { winner }),
            _ => Ok(()),
        }
    }

    fn hold(&mut self, piece: Piece, origin: Origin, destinations: Vec<HexIndex>) -> ActionOutcome {
        self.state.selection = Some(Selection {
            piece: piece.id,
            origin,
            destinations: destinations.clone(),
        });
        ActionOutcome::Selected { destinations }
    }

    // ========================================================================
    // APPLY ACTION
    // ========================================================================

    /// Apply a legal action: place or move, capture, promote, advance the
    /// turn, then check for a win.
    fn apply(&mut self, selection: &Selection, to: HexIndex) -> ActionOutcome {
        let player = self.state.current_turn;

        let (mut piece, from, captured) = match selection.origin {
            Origin::Bench { .. } => match self.take_from_bench(player, selection) {
                Some(piece) => (piece, None, None),
                None => return ActionOutcome::Deselected,
            },
            Origin::Board { hex } => match self.state.board[hex].piece.take() {
                Some(piece) => (piece, Some(hex), self.capture_at(player, to)),
                None => return ActionOutcome::Deselected,
            },
        };

        let cell = &mut self.state.board[to];
        if from.is_none() && piece.kind == PieceKind::Blocker {
            cell.is_blocked = true;
        }
        let promoted = cell.is_center && piece.promote();
        cell.piece = Some(piece);

        if promoted {
            tracing::debug!("{} promoted at hex {}", piece.id, to);
        }

        let bonus_granted = piece.kind == PieceKind::Blocker && !self.state.bonus_pending;
        let record = MoveRecord {
            turn: self.state.turn_count,
            player,
            piece: piece.id,
            kind: piece.kind,
            from,
            to,
            captured,
            promoted,
            bonus_granted,
        };
        self.state.history.push(record);

        self.advance_turn(bonus_granted);

        let winner = self.check_winner(player);
        ActionOutcome::Applied { record, winner }
    }

    fn take_from_bench(&mut self, player: Player, selection: &Selection) -> Option<Piece> {
        let bench = &mut self.state.players[player.index()].bench;
        let slot = bench.iter().position(|p| p.id == selection.piece)?;
        let piece = bench.remove(slot);
        tracing::debug!("{} places {:?} {}", player, piece.kind, piece.id);
        Some(piece)
    }

    /// Move a capturable opponent piece on `hex` into `player`'s captured pile
    fn capture_at(&mut self, player: Player, hex: HexIndex) -> Option<PieceId> {
        let cell = &mut self.state.board[hex];
        let victim = cell.piece.filter(|p| p.owner != player)?;
        cell.piece = None;
        self.state.players[player.index()].captured.push(victim);
        tracing::debug!("{} captures {:?} {} at hex {}", player, victim.kind, victim.id, hex);
        Some(victim.id)
    }

    fn advance_turn(&mut self, bonus_granted: bool) {
        if bonus_granted {
            self.state.bonus_pending = true;
            tracing::debug!("Blocker placed, {} gets a bonus action", self.state.current_turn);
            return;
        }
        self.state.bonus_pending = false;
        self.state.current_turn = self.state.current_turn.opponent();
        self.state.turn_count += 1;
        tracing::debug!("Turn {}: {} to move", self.state.turn_count, self.state.current_turn);
    }

    fn check_winner(&mut self, player: Player) -> Option<Player> {
        if !check_win(&self.state, player) {
            return None;
        }
        tracing::info!("{} has won after {} turns", player, self.state.turn_count);
        self.state.phase = GamePhase::Ended;
        self.state.winner = Some(player);
        Some(player)
    }
}

// ============================================================================
// RE-ENTRANCY GATE
// ============================================================================

/// Shared front-end handle on a controller.
///
/// An action that arrives while another is still being applied (for
/// example from a second listener on the same click) is rejected with
/// `EngineError::ActionInFlight` rather than queued.
#[derive(Debug, Default)]
pub struct ActionGate {
    controller: RefCell<TurnController>,
}

impl ActionGate {
    pub fn new(controller: TurnController) -> Self {
        Self {
            controller: RefCell::new(controller),
        }
    }

    /// Apply an action
    pub fn apply(&self, action: Action) -> Result<ActionOutcome, EngineError> {
        self.dispatch(action, |_, _| {})
    }

    /// Apply an action, then call `observe` with the resulting state before
    /// the gate reopens.
    pub fn dispatch<F>(&self, action: Action, observe: F) -> Result<ActionOutcome, EngineError>
    where
        F: FnOnce(&GameState, &ActionOutcome),
    {
        let mut controller = self.controller.try_borrow_mut().map_err(|_| {
            tracing::warn!("Ignoring {:?}: another action is in flight", action);
            EngineError::ActionInFlight
        })?;

        let outcome = controller.handle(action)?;
        observe(controller.state(), &outcome);
        Ok(outcome)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Result<GameState, EngineError> {
        self.controller
            .try_borrow()
            .map(|controller| controller.state().clone())
            .map_err(|_| EngineError::ActionInFlight)
    }

    pub fn into_inner(self) -> TurnController {
        self.controller.into_inner()
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Integration tests for the HexChess rules engine
//!
//! Plays whole games through the public API: placement, movement,
//! capture, promotion, blocker bonus actions and win detection.

use hexchess_core::{
    is_valid_placement_hex, legal_moves, legal_placements, material, Action, ActionGate,
    ActionOutcome, EngineError, GamePhase, GameState, HexIndex, Layout, Location, MoveRecord,
    Origin, PieceId, PieceKind, Player, TurnController,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const NO_DEPLOY: [HexIndex; 7] = [11, 12, 17, 18, 19, 24, 25];
const SAFE: [HexIndex; 4] = [11, 12, 24, 25];
const IMPASSABLE: [HexIndex; 2] = [17, 19];

fn bench(player: Player, slot: usize) -> Origin {
    Origin::Bench { player, slot }
}

fn board(hex: HexIndex) -> Origin {
    Origin::Board { hex }
}

/// Select then confirm; panics unless the action applies
fn play(ctl: &mut TurnController, origin: Origin, to: HexIndex) -> MoveRecord {
    match ctl.select(origin) {
        Ok(ActionOutcome::Selected { .. }) => {}
        other => panic!("selecting {origin:?} gave {other:?}"),
    }
    match ctl.confirm(to) {
        Ok(ActionOutcome::Applied { record, .. }) => record,
        other => panic!("confirming {to} gave {other:?}"),
    }
}

/// Regular piece of `player` placed from the front of the bench
fn place(ctl: &mut TurnController, player: Player, hex: HexIndex) -> MoveRecord {
    play(ctl, bench(player, 0), hex)
}

/// Player 1 promoted piece on hex 0, player 2 regular on hex 1
fn promoted_corner() -> TurnController {
    let mut ctl = TurnController::default();
    place(&mut ctl, Player::One, 5);
    place(&mut ctl, Player::Two, 30);
    play(&mut ctl, board(5), 11);
    place(&mut ctl, Player::Two, 32);
    assert!(play(&mut ctl, board(11), 18).promoted);
    place(&mut ctl, Player::Two, 1);
    play(&mut ctl, board(18), 0);
    place(&mut ctl, Player::Two, 33);
    ctl
}

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn test_first_placement() {
    let mut ctl = TurnController::new(hexchess_core::initialize());

    let outcome = ctl.select(bench(Player::One, 0)).unwrap();
    assert!(!outcome.mutated());
    let placements = legal_placements(ctl.state());
    assert!(placements.contains(&0));
    assert!(!placements.contains(&18));

    let outcome = ctl.confirm(0).unwrap();
    assert!(outcome.mutated());
    let state = ctl.state();
    assert_eq!(
        state.cells()[0].piece.map(|p| (p.owner, p.kind)),
        Some((Player::One, PieceKind::Regular))
    );
    assert_eq!(state.player(Player::One).bench.len(), 7);
    assert_eq!(state.current_turn(), Player::Two);
}

#[test]
fn test_no_deploy_hexes_never_accept_placement() {
    let mut ctl = TurnController::default();
    for hex in NO_DEPLOY {
        assert_eq!(is_valid_placement_hex(ctl.state(), hex), Ok(false));
    }

    // Occupy hexes next to and inside the excluded set, then re-check
    place(&mut ctl, Player::One, 5);
    place(&mut ctl, Player::Two, 6);
    play(&mut ctl, board(5), 11);
    play(&mut ctl, board(6), 12);
    for hex in NO_DEPLOY {
        assert_eq!(is_valid_placement_hex(ctl.state(), hex), Ok(false));
    }

    play(&mut ctl, board(11), 18);
    play(&mut ctl, board(12), 13);
    for hex in NO_DEPLOY {
        assert_eq!(is_valid_placement_hex(ctl.state(), hex), Ok(false));
    }
}

#[test]
fn test_out_of_range_origins_fail_explicitly() {
    let mut ctl = TurnController::default();
    assert_eq!(
        ctl.select(board(37)),
        Err(EngineError::HexOutOfRange { index: 37, len: 37 })
    );
    assert_eq!(
        ctl.select(bench(Player::One, 8)),
        Err(EngineError::BenchSlotOutOfRange { player: Player::One, slot: 8, len: 8 })
    );
    assert!(legal_moves(ctl.state(), 100).is_err());
}

// ============================================================================
// MOVEMENT
// ============================================================================

#[test]
fn test_promoted_slide_stops_at_capture() {
    let ctl = promoted_corner();
    let state = ctl.state();
    assert_eq!(
        state.cells()[0].piece.map(|p| p.kind),
        Some(PieceKind::Promoted)
    );
    assert_eq!(state.current_turn(), Player::One);

    let moves = legal_moves(state, 0).unwrap();
    assert!(moves.contains(&1));
    assert!(!moves.contains(&2));
    assert!(!moves.contains(&3));
    // Long diagonal runs through the empty center to the far corner
    assert!(moves.contains(&18));
    assert!(moves.contains(&36));
}

#[test]
fn test_promoted_capture() {
    let mut ctl = promoted_corner();
    let victim = ctl.state().cells()[1].piece.unwrap().id;
    let record = play(&mut ctl, board(0), 1);

    assert_eq!(record.captured, Some(victim));
    assert_eq!(
        ctl.state().locate(victim).map(|l| l.location),
        Some(Location::Captured { by: Player::One })
    );
    assert_eq!(ctl.state().player(Player::One).captured.len(), 1);
}

#[test]
fn test_illegal_destination_changes_nothing() {
    let mut ctl = promoted_corner();
    let before = ctl.state().clone();

    ctl.select(board(0)).unwrap();
    assert_eq!(ctl.confirm(2), Ok(ActionOutcome::Deselected));

    let after = ctl.state();
    assert_eq!(after.cells(), before.cells());
    assert_eq!(after.player(Player::One), before.player(Player::One));
    assert_eq!(after.player(Player::Two), before.player(Player::Two));
    assert_eq!(after.current_turn(), before.current_turn());
    assert_eq!(after.turn_count(), before.turn_count());
    assert!(after.selection().is_none());
    assert_eq!(after, &before);
}

#[test]
fn test_safe_zone_occupant_is_immune() {
    let mut ctl = TurnController::default();
    place(&mut ctl, Player::One, 6);
    place(&mut ctl, Player::Two, 13);
    place(&mut ctl, Player::One, 0);
    play(&mut ctl, board(13), 12);

    assert!(!legal_moves(ctl.state(), 6).unwrap().contains(&12));
    ctl.select(board(6)).unwrap();
    assert_eq!(ctl.confirm(12), Ok(ActionOutcome::Deselected));
    assert!(ctl.state().player(Player::One).captured.is_empty());
}

// ============================================================================
// BLOCKERS
// ============================================================================

#[test]
fn test_blocker_bonus_then_turn_passes() {
    let mut ctl = TurnController::default();
    place(&mut ctl, Player::One, 0);
    place(&mut ctl, Player::Two, 35);
    place(&mut ctl, Player::One, 1);

    let record = play(&mut ctl, bench(Player::Two, 6), 20);
    assert!(record.bonus_granted);
    assert_eq!(ctl.state().current_turn(), Player::Two);
    assert!(ctl.state().bonus_pending());
    assert_eq!(ctl.state().turn_count(), 3);

    // The bonus action may be a move as well as a placement
    let record = play(&mut ctl, board(35), 34);
    assert!(!record.bonus_granted);
    assert!(!ctl.state().bonus_pending());
    assert_eq!(ctl.state().current_turn(), Player::One);
    assert_eq!(ctl.state().turn_count(), 4);
}

#[test]
fn test_blocker_hex_stays_blocked() {
    let mut ctl = TurnController::default();
    play(&mut ctl, bench(Player::One, 7), 13);
    place(&mut ctl, Player::One, 7);
    place(&mut ctl, Player::Two, 14);

    for _ in 0..3 {
        assert!(ctl.state().cells()[13].is_blocked());
        assert!(!legal_moves(ctl.state(), 14).unwrap().contains(&13));
        assert!(!legal_placements(ctl.state()).contains(&13));
        let player = ctl.state().current_turn();
        let free = legal_placements(ctl.state())[0];
        place(&mut ctl, player, free);
    }
}

// ============================================================================
// WIN CONDITION
// ============================================================================

#[test]
fn test_blockers_do_not_count_as_material() {
    let mut layout = Layout::standard();
    layout.regulars = 1;
    layout.blockers = 1;
    let mut ctl = TurnController::new(GameState::from_layout(layout).unwrap());

    place(&mut ctl, Player::One, 5);
    play(&mut ctl, bench(Player::Two, 1), 36);
    place(&mut ctl, Player::Two, 6);
    assert_eq!(material(ctl.state(), Player::Two), 1);

    ctl.select(board(5)).unwrap();
    let outcome = ctl.confirm(6).unwrap();
    assert!(outcome.game_ended());
    assert!(matches!(
        outcome,
        ActionOutcome::Applied { winner: Some(Player::One), .. }
    ));

    let state = ctl.state();
    assert_eq!(material(state, Player::Two), 0);
    assert_eq!(state.phase(), GamePhase::Ended);
    assert_eq!(state.winner(), Some(Player::One));
    assert_eq!(
        state.cells()[36].piece.map(|p| p.kind),
        Some(PieceKind::Blocker)
    );

    assert_eq!(
        ctl.select(bench(Player::One, 0)),
        Err(EngineError::GameOver { winner: Player::One })
    );
}

// ============================================================================
// RE-ENTRANCY
// ============================================================================

#[test]
fn test_duplicate_click_is_applied_once() {
    let gate = ActionGate::default();
    gate.apply(Action::Select(bench(Player::One, 0))).unwrap();

    // A second listener fires the same click while the first is applying it
    let mut duplicate = None;
    let outcome = gate
        .dispatch(Action::Confirm(4), |_, _| {
            duplicate = Some(gate.apply(Action::Confirm(4)));
        })
        .unwrap();

    assert!(outcome.mutated());
    assert_eq!(duplicate, Some(Err(EngineError::ActionInFlight)));

    let state = gate.snapshot().unwrap();
    assert_eq!(state.history().len(), 1);
    assert_eq!(state.player(Player::One).bench.len(), 7);

    // The next gesture is accepted normally
    let outcome = gate.apply(Action::Select(bench(Player::Two, 0))).unwrap();
    assert!(matches!(outcome, ActionOutcome::Selected { .. }));
}

// ============================================================================
// RANDOM PLAYOUTS
// ============================================================================

/// Every (origin, destination) pair available to the player to move
fn candidate_actions(state: &GameState) -> Vec<(Origin, HexIndex)> {
    let player = state.current_turn();
    let mut actions = Vec::new();

    let placements = legal_placements(state);
    for slot in 0..state.player(player).bench.len() {
        for &to in &placements {
            actions.push((bench(player, slot), to));
        }
    }

    let hexes: Vec<HexIndex> = state.pieces_on_board(player).map(|(hex, _)| hex).collect();
    for from in hexes {
        for to in legal_moves(state, from).unwrap() {
            actions.push((board(from), to));
        }
    }
    actions
}

fn promoted_ids(state: &GameState) -> HashSet<PieceId> {
    state
        .cells()
        .iter()
        .filter_map(|cell| cell.piece)
        .chain(Player::BOTH.iter().flat_map(|&p| state.player(p).captured.iter().copied()))
        .filter(|p| p.kind == PieceKind::Promoted)
        .map(|p| p.id)
        .collect()
}

fn blocked_hexes(state: &GameState) -> HashSet<HexIndex> {
    state
        .cells()
        .iter()
        .filter(|cell| cell.is_blocked())
        .map(|cell| cell.index)
        .collect()
}

fn check_invariants(state: &GameState) {
    for hex in IMPASSABLE {
        assert!(state.cells()[hex].piece.is_none(), "piece on impassable hex {hex}");
    }

    let on_board = state.cells().iter().filter(|c| c.piece.is_some()).count();
    let off_board: usize = Player::BOTH
        .iter()
        .map(|&p| state.player(p).bench.len() + state.player(p).captured.len())
        .sum();
    assert_eq!(on_board + off_board, 16);

    for player in Player::BOTH {
        for piece in &state.player(player).captured {
            assert_ne!(piece.kind, PieceKind::Blocker);
            assert_ne!(piece.owner, player);
            assert_eq!(
                state.locate(piece.id).map(|l| l.location),
                Some(Location::Captured { by: player })
            );
        }
    }

    for hex in SAFE {
        if let Some(piece) = state.cells()[hex].piece {
            for player in Player::BOTH {
                assert!(
                    !state.player(player).captured.iter().any(|p| p.id == piece.id),
                    "{} on safe hex {} is also in {}'s captured pile",
                    piece.id,
                    hex,
                    player
                );
            }
        }
    }

    if let Some(winner) = state.winner() {
        assert_eq!(material(state, winner.opponent()), 0);
    }
}

#[test]
fn test_random_playouts_keep_invariants() {
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ctl = TurnController::default();
        let mut blocked = HashSet::new();
        let mut promoted = HashSet::new();

        for _ in 0..400 {
            if ctl.state().is_over() {
                break;
            }
            let actions = candidate_actions(ctl.state());
            if actions.is_empty() {
                break;
            }
            let (origin, to) = actions[rng.gen_range(0..actions.len())];
            play(&mut ctl, origin, to);

            let state = ctl.state();
            check_invariants(state);

            let now_blocked = blocked_hexes(state);
            assert!(now_blocked.is_superset(&blocked), "seed {seed}: a hex was unblocked");
            blocked = now_blocked;

            let now_promoted = promoted_ids(state);
            assert!(now_promoted.is_superset(&promoted), "seed {seed}: a promotion was undone");
            promoted = now_promoted;
        }
    }
}

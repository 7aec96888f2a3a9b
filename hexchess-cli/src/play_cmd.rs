//! Play command - hot-seat game in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: game_loop(), execute()
//! - Level 3: parse_command()
//! - Level 4: text rendering

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use hexchess_core::{
    legal_moves, Action, ActionGate, ActionOutcome, GameState, HexCell, HexIndex, Origin, Player,
    Status, TurnController,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Layout JSON file (standard board if omitted)
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Forward a gesture to the engine
    Act(Action),
    /// Show destinations of the piece on a hex without selecting it
    Moves(HexIndex),
    Show,
    History,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  bench <slot>           pick a piece from your bench
  bench <player> <slot>  click a slot on either bench
  hex <n>                pick your piece on hex n, or move the held piece there
  moves <n>              list destinations of the piece on hex n
  cancel                 drop the held piece
  show | history | new | help | quit";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the game from the layout
/// 2. Read commands until quit or end of input
pub fn run(args: PlayArgs) -> Result<()> {
    let layout = crate::load_layout(args.layout.as_deref())?;
    let state = GameState::from_layout(layout).context("Invalid layout")?;
    let gate = ActionGate::new(TurnController::new(state));

    tracing::info!("Starting hot-seat game");

    let stdin = io::stdin();
    game_loop(&gate, stdin.lock(), &mut io::stdout())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn game_loop(gate: &ActionGate, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let state = gate.snapshot()?;
    writeln!(out, "{}", render_board(&state, &[]))?;
    writeln!(out, "{}", status_line(&state))?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line, &gate.snapshot()?) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        execute(gate, command, out)?;
    }
    Ok(())
}

fn execute(gate: &ActionGate, command: Command, out: &mut impl Write) -> Result<()> {
    let state = gate.snapshot()?;
    match command {
        Command::Act(action) => {
            let mut report = String::new();
            let result = gate.dispatch(action, |state, outcome| {
                report = describe(state, outcome);
            });
            match result {
                Ok(_) => writeln!(out, "{report}")?,
                Err(e) => writeln!(out, "{e}")?,
            }
        }
        Command::Moves(hex) => match legal_moves(&state, hex) {
            Ok(moves) => writeln!(out, "{}", render_board(&state, &moves))?,
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Show => {
            let highlights = state
                .selection()
                .map(|s| s.destinations.clone())
                .unwrap_or_default();
            writeln!(out, "{}", render_board(&state, &highlights))?;
            writeln!(out, "{}", status_line(&state))?;
        }
        Command::History => {
            for record in state.history() {
                let from = record.from.map_or_else(|| "bench".to_string(), |h| h.to_string());
                let mut line = format!(
                    "{:>3}. P{} {} {} -> {}",
                    record.turn + 1,
                    record.player.number(),
                    record.kind.code(),
                    from,
                    record.to
                );
                if let Some(victim) = record.captured {
                    line.push_str(&format!(" x{victim}"));
                }
                if record.promoted {
                    line.push_str(" (promoted)");
                }
                if record.bonus_granted {
                    line.push_str(" (bonus)");
                }
                writeln!(out, "{line}")?;
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

/// Text shown after an action went through the engine
fn describe(state: &GameState, outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Ignored => "Nothing to do there.".to_string(),
        ActionOutcome::Selected { destinations } if destinations.is_empty() => {
            "That piece has no legal destinations.".to_string()
        }
        ActionOutcome::Selected { destinations } => format!(
            "{}\nDestinations: {:?}",
            render_board(state, destinations),
            destinations
        ),
        ActionOutcome::Deselected => "Selection cleared.".to_string(),
        ActionOutcome::Applied { .. } | ActionOutcome::Restarted => {
            format!("{}\n{}", render_board(state, &[]), status_line(state))
        }
    }
}

// ============================================================================
// LEVEL 3 - INPUT
// ============================================================================

fn parse_command(line: &str, state: &GameState) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["bench", slot] => Command::Act(Action::Select(Origin::Bench {
            player: state.current_turn(),
            slot: number(slot)?,
        })),
        ["bench", player, slot] => {
            let player = match *player {
                "1" => Player::One,
                "2" => Player::Two,
                other => bail!("unknown player '{other}'"),
            };
            Command::Act(Action::Select(Origin::Bench { player, slot: number(slot)? }))
        }
        ["hex", hex] => Command::Act(Action::Select(Origin::Board { hex: number(hex)? })),
        ["moves", hex] => Command::Moves(number(hex)?),
        ["cancel"] => Command::Act(Action::Deselect),
        ["new"] => Command::Act(Action::NewGame),
        ["show"] => Command::Show,
        ["history"] => Command::History,
        ["help"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        _ => bail!("unknown command, try 'help'"),
    };
    Ok(command)
}

fn number(word: &str) -> Result<usize> {
    word.parse().with_context(|| format!("'{word}' is not a number"))
}

// ============================================================================
// LEVEL 4 - RENDERING
// ============================================================================

fn status_line(state: &GameState) -> String {
    match state.status() {
        Status::ToMove { player, bonus_pending } => {
            let mut line = format!("{player}'s turn");
            if bonus_pending {
                line.push_str(" (blocker bonus action)");
            }
            let bench: Vec<String> = state
                .player(player)
                .bench
                .iter()
                .enumerate()
                .map(|(slot, p)| format!("{slot}:{}", p.kind.code()))
                .collect();
            format!("{line}. Bench [{}]", bench.join(" "))
        }
        Status::Won { winner } => format!("Game over! {winner} won"),
    }
}

/// Rows centered under each other; `highlights` are marked with `+`
fn render_board(state: &GameState, highlights: &[HexIndex]) -> String {
    let rows = state.adjacency().rows();
    let widest = rows.rows().iter().copied().max().unwrap_or(0);
    let mut lines = Vec::with_capacity(rows.rows().len());

    for (row, &len) in rows.rows().iter().enumerate() {
        let indent = " ".repeat((widest - len) * 3);
        let cells: Vec<String> = rows
            .row_hexes(row)
            .map(|hex| render_cell(&state.cells()[hex], highlights.contains(&hex)))
            .collect();
        lines.push(format!("{indent}{}", cells.join("")));
    }
    lines.join("\n")
}

fn render_cell(cell: &HexCell, highlighted: bool) -> String {
    let body = match cell.piece {
        Some(piece) => format!("{}{}", piece.owner.number(), piece.kind.code()),
        None if cell.is_impassable => "##".to_string(),
        None => format!("{:>2}", cell.index),
    };
    let mark = if highlighted {
        '+'
    } else if cell.is_center {
        '*'
    } else if cell.is_safe {
        's'
    } else {
        ' '
    };
    format!("[{body}{mark}]")
}

//! Adjacency command - print the neighbor table of a layout

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hexchess_core::{generate_adjacency, Direction, HexIndex};

#[derive(Args)]
pub struct AdjacencyArgs {
    /// Layout JSON file (standard board if omitted)
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Only print this hex
    #[arg(long)]
    pub hex: Option<HexIndex>,

    /// Output the table as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AdjacencyArgs) -> Result<()> {
    let layout = crate::load_layout(args.layout.as_deref())?;
    let table = generate_adjacency(&layout.rows);

    let hexes: Vec<HexIndex> = match args.hex {
        Some(hex) if hex >= table.len() => {
            anyhow::bail!("hex {} is outside the board (0..{})", hex, table.len())
        }
        Some(hex) => vec![hex],
        None => (0..table.len()).collect(),
    };

    if args.json {
        let entries: Vec<_> = hexes
            .iter()
            .filter_map(|&hex| table.neighbors(hex).map(|n| (hex, *n)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("hex:   L   R  UL  UR  LL  LR");
    for hex in hexes {
        let row = Direction::ALL
            .iter()
            .map(|&dir| format!("{:>3}", format_neighbor(table.step(hex, dir))))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{:>3}: {}", hex, row);
    }
    Ok(())
}

fn format_neighbor(hex: Option<HexIndex>) -> String {
    hex.map_or_else(|| "-".to_string(), |h| h.to_string())
}

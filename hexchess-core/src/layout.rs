//! Layout - board design definition
//!
//! A layout fixes the row structure, the special hexes and the starting
//! bench of each player. Hexes that are safe, impassable or the center
//! never accept a bench placement.

use std::path::Path;

use anyhow::Context;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{HexIndex, STANDARD_ROWS};
use crate::error::LayoutError;

/// Piece ids of both benches must fit in a `u16`
pub const MAX_PIECES_PER_PLAYER: usize = (u16::MAX as usize + 1) / 2;

/// Board design
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub rows: Vec<usize>,
    /// Occupants of these hexes cannot be captured
    pub safe: Vec<HexIndex>,
    /// Nothing ever enters these hexes
    pub impassable: Vec<HexIndex>,
    /// Regular pieces that land here are promoted
    pub center: Vec<HexIndex>,
    /// Regular pieces per bench
    pub regulars: usize,
    /// Blocker pieces per bench, placed after the regulars
    pub blockers: usize,
}

impl Layout {
    /// The standard 37-hex HexChess board
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            rows: STANDARD_ROWS.to_vec(),
            safe: vec![11, 12, 24, 25],
            impassable: vec![17, 19],
            center: vec![18],
            regulars: 7,
            blockers: 1,
        }
    }

    pub fn hex_count(&self) -> usize {
        self.rows.iter().sum()
    }

    /// Hexes that never accept a bench placement
    pub fn no_deploy(&self) -> FxHashSet<HexIndex> {
        self.safe
            .iter()
            .chain(&self.impassable)
            .chain(&self.center)
            .copied()
            .collect()
    }

    /// Check the layout is self-consistent
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.rows.is_empty() {
            return Err(LayoutError::NoRows);
        }
        if let Some(row) = self.rows.iter().position(|&len| len == 0) {
            return Err(LayoutError::EmptyRow { row });
        }

        let len = self.hex_count();
        let groups: [(&'static str, &[HexIndex]); 3] = [
            ("safe", self.safe.as_slice()),
            ("impassable", self.impassable.as_slice()),
            ("center", self.center.as_slice()),
        ];
        for (role, hexes) in groups {
            if let Some(&index) = hexes.iter().find(|&&h| h >= len) {
                return Err(LayoutError::HexOutOfRange { role, index, len });
            }
        }

        let impassable: FxHashSet<HexIndex> = self.impassable.iter().copied().collect();
        if let Some(&index) = self.center.iter().find(|h| impassable.contains(*h)) {
            return Err(LayoutError::ImpassableCenter { index });
        }

        if self.regulars == 0 {
            return Err(LayoutError::NoRegularPieces);
        }
        let count = self.regulars.saturating_add(self.blockers);
        if count > MAX_PIECES_PER_PLAYER {
            return Err(LayoutError::TooManyPieces { count, max: MAX_PIECES_PER_PLAYER });
        }

        Ok(())
    }

    /// Load from JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout: {}", path.display()))?;
        let layout: Layout = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse layout: {}", path.display()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::standard()
    }
}

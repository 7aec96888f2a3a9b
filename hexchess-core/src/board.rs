//! Hex board geometry for an irregular row-based hex grid
//!
//! The board is addressed by a flat hex index, counted row by row from the
//! top-left hex. Rows widen towards the middle and narrow again, so the
//! column offset of an upper or lower neighbor depends on whether the
//! adjacent row is longer or shorter than the current one.

use serde::{Deserialize, Serialize};

/// Flat index of a hex on the board (0-based, row-major)
pub type HexIndex = usize;

/// Row lengths of the standard HexChess board
pub const STANDARD_ROWS: [usize; 7] = [4, 5, 6, 7, 6, 5, 4];

/// The six neighbor directions of a hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Direction {
    /// All directions, in move-generation order
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::UpperLeft,
        Direction::UpperRight,
        Direction::LowerLeft,
        Direction::LowerRight,
    ];

    /// The direction pointing back the way we came
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::UpperLeft => Direction::LowerRight,
            Direction::UpperRight => Direction::LowerLeft,
            Direction::LowerLeft => Direction::UpperRight,
            Direction::LowerRight => Direction::UpperLeft,
        }
    }
}

/// Row/column position of a hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowCol {
    pub row: usize,
    pub col: usize,
}

/// Row structure of a board: row lengths plus their prefix-sum offsets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowLayout {
    lengths: Vec<usize>,
    starts: Vec<usize>,
    hex_count: usize,
}

impl RowLayout {
    pub fn new(lengths: &[usize]) -> Self {
        let mut starts = Vec::with_capacity(lengths.len());
        let mut offset = 0;
        for &len in lengths {
            starts.push(offset);
            offset += len;
        }
        Self {
            lengths: lengths.to_vec(),
            starts,
            hex_count: offset,
        }
    }

    /// Total number of hexes
    pub fn hex_count(&self) -> usize {
        self.hex_count
    }

    pub fn rows(&self) -> &[usize] {
        &self.lengths
    }

    /// Locate the row and column of a flat index
    pub fn row_col(&self, index: HexIndex) -> Option<RowCol> {
        if index >= self.hex_count {
            return None;
        }
        for (row, (&len, &start)) in self.lengths.iter().zip(&self.starts).enumerate() {
            if index < start + len {
                return Some(RowCol { row, col: index - start });
            }
        }
        None
    }

    /// Flat index of (row, col), or None when off the board.
    /// Signed so callers can probe col - 1 without underflow.
    pub fn index(&self, row: isize, col: isize) -> Option<HexIndex> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        let len = *self.lengths.get(row)?;
        if col >= len {
            return None;
        }
        Some(self.starts[row] + col)
    }

    /// Hex indices of one row
    pub fn row_hexes(&self, row: usize) -> std::ops::Range<HexIndex> {
        match (self.starts.get(row), self.lengths.get(row)) {
            (Some(&start), Some(&len)) => start..start + len,
            _ => 0..0,
        }
    }
}

/// Up to six neighbors of one hex; `None` marks the board edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub left: Option<HexIndex>,
    pub right: Option<HexIndex>,
    pub upper_left: Option<HexIndex>,
    pub upper_right: Option<HexIndex>,
    pub lower_left: Option<HexIndex>,
    pub lower_right: Option<HexIndex>,
}

impl Neighbors {
    pub fn get(&self, direction: Direction) -> Option<HexIndex> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::UpperLeft => self.upper_left,
            Direction::UpperRight => self.upper_right,
            Direction::LowerLeft => self.lower_left,
            Direction::LowerRight => self.lower_right,
        }
    }

    /// Existing neighbors in `Direction::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, HexIndex)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.get(dir).map(|hex| (dir, hex)))
    }
}

/// Immutable per-hex neighbor table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyTable {
    rows: RowLayout,
    neighbors: Vec<Neighbors>,
}

impl AdjacencyTable {
    /// Number of hexes covered by the table
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn rows(&self) -> &RowLayout {
        &self.rows
    }

    /// Neighbors of a hex, or None when the index is off the board
    pub fn neighbors(&self, hex: HexIndex) -> Option<&Neighbors> {
        self.neighbors.get(hex)
    }

    /// Step one hex in a direction
    pub fn step(&self, hex: HexIndex, direction: Direction) -> Option<HexIndex> {
        self.neighbors.get(hex).and_then(|n| n.get(direction))
    }
}

/// Build the neighbor table for a grid with the given row lengths.
///
/// Left/right are same-row col ± 1. Towards a shorter row the upper (or
/// lower) pair sits at (col, col + 1); towards a longer row it shifts left
/// to (col - 1, col).
pub fn generate_adjacency(row_lengths: &[usize]) -> AdjacencyTable {
    let rows = RowLayout::new(row_lengths);
    let mut neighbors = Vec::with_capacity(rows.hex_count());

    for hex in 0..rows.hex_count() {
        let Some(RowCol { row, col }) = rows.row_col(hex) else {
            continue;
        };
        let (r, c) = (row as isize, col as isize);
        let len = row_lengths[row];

        let mut n = Neighbors {
            left: rows.index(r, c - 1),
            right: rows.index(r, c + 1),
            ..Neighbors::default()
        };

        if row > 0 {
            let contracting = len < row_lengths[row - 1];
            let (ul, ur) = if contracting { (c, c + 1) } else { (c - 1, c) };
            n.upper_left = rows.index(r - 1, ul);
            n.upper_right = rows.index(r - 1, ur);
        }

        if row + 1 < row_lengths.len() {
            let expanding = row_lengths[row + 1] > len;
            let (ll, lr) = if expanding { (c, c + 1) } else { (c - 1, c) };
            n.lower_left = rows.index(r + 1, ll);
            n.lower_right = rows.index(r + 1, lr);
        }

        neighbors.push(n);
    }

    AdjacencyTable { rows, neighbors }
}

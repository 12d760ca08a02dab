//! Edge bitmap: one bit per grid edge, set when a contour crosses it.
//!
//! Horizontal edges (between two nodes of the same row) and vertical edges
//! (between two nodes of the same column) live in one flat bitset. A cell
//! side is canonicalised to the edge it lies on, so the South side of a
//! cell and the North side of the cell below share a bit.

use contour_common::Result;

/// Side of a grid cell, counterclockwise from the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    South,
    East,
    North,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::South, Side::East, Side::North, Side::West];

    /// Index into the counterclockwise corner ring (SW, SE, NE, NW).
    pub fn index(self) -> usize {
        match self {
            Side::South => 0,
            Side::East => 1,
            Side::North => 2,
            Side::West => 3,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::East => Side::West,
            Side::North => Side::South,
            Side::West => Side::East,
        }
    }
}

/// Canonical identifier of one grid edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(usize);

/// Opaque bitset over all edges of an `nx` x `ny` node grid.
#[derive(Debug, Clone)]
pub struct EdgeBitmap {
    nx: usize,
    ny: usize,
    periodic: bool,
    words: Vec<u64>,
}

impl EdgeBitmap {
    /// Allocate an all-clear bitmap for a grid of `nx` x `ny` nodes.
    ///
    /// On a periodic grid the last node column repeats the first, so
    /// vertical edges on the seam share one bit.
    pub fn new(nx: usize, ny: usize, periodic: bool) -> Result<Self> {
        let horizontal = ny * nx.saturating_sub(1);
        let vertical = ny.saturating_sub(1) * nx;
        let n_words = (horizontal + vertical).div_ceil(64);
        let mut words = Vec::new();
        words.try_reserve_exact(n_words)?;
        words.resize(n_words, 0);
        Ok(Self {
            nx,
            ny,
            periodic,
            words,
        })
    }

    /// Canonical edge of `side` of the cell whose north-west node is (row, col).
    pub fn edge(&self, row: usize, col: usize, side: Side) -> EdgeId {
        let horizontal_base = self.ny * (self.nx - 1);
        match side {
            Side::South => EdgeId((row + 1) * (self.nx - 1) + col),
            Side::North => EdgeId(row * (self.nx - 1) + col),
            Side::West => EdgeId(horizontal_base + row * self.nx + self.seam(col)),
            Side::East => EdgeId(horizontal_base + row * self.nx + self.seam(col + 1)),
        }
    }

    fn seam(&self, col: usize) -> usize {
        if self.periodic && col == self.nx - 1 {
            0
        } else {
            col
        }
    }

    /// Mark the edge and return whether it was already marked.
    pub fn test_and_set(&mut self, row: usize, col: usize, side: Side) -> bool {
        let edge = self.edge(row, col, side);
        self.test_and_set_edge(edge)
    }

    /// Mark `edge` and return whether it was already marked.
    pub fn test_and_set_edge(&mut self, edge: EdgeId) -> bool {
        let (word, mask) = (edge.0 / 64, 1u64 << (edge.0 % 64));
        let was_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        was_set
    }

    pub fn is_set(&self, row: usize, col: usize, side: Side) -> bool {
        let edge = self.edge(row, col, side);
        self.words[edge.0 / 64] & (1u64 << (edge.0 % 64)) != 0
    }

    /// Clear every bit for a new scan.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of marked edges.
    pub fn count_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

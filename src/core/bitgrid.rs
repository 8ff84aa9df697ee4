//! A fixed-size cell set over the battle grid.
//!
//! The type is `no_std` friendly and avoids heap allocations. The
//! `GRID_SIZE`×`GRID_SIZE` cells are packed row-major into an array of `u64`
//! words, giving O(1) membership tests for shots, hits and unit footprints.

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use super::config::GRID_SIZE;

const CELLS: usize = GRID_SIZE * GRID_SIZE;
const WORDS: usize = (CELLS + 63) / 64;

/// Errors returned by grid operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Row or column index is out of bounds [0..GRID_SIZE).
    IndexOutOfBounds { row: usize, col: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::IndexOutOfBounds { row, col } => {
                write!(f, "IndexOutOfBounds: row={}, col={}", row, col)
            }
        }
    }
}

/// Returns `true` when (`row`, `col`) lies on the grid.
#[inline]
pub fn in_bounds(row: usize, col: usize) -> bool {
    row < GRID_SIZE && col < GRID_SIZE
}

/// Set of grid cells stored one bit per cell.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct BitGrid {
    words: [u64; WORDS],
}

impl BitGrid {
    /// Create an empty grid (all bits cleared).
    #[inline]
    pub const fn new() -> Self {
        BitGrid { words: [0; WORDS] }
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no cells are set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Returns true if every cell of the grid is set.
    pub fn is_full(&self) -> bool {
        self.count_ones() == CELLS
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, GridError> {
        let (word, bit) = Self::locate(row, col)?;
        Ok((self.words[word] >> bit) & 1 == 1)
    }

    /// Sets the bit at (row, col). Returns `true` if it was previously clear.
    pub fn set(&mut self, row: usize, col: usize) -> Result<bool, GridError> {
        let (word, bit) = Self::locate(row, col)?;
        let fresh = (self.words[word] >> bit) & 1 == 0;
        self.words[word] |= 1 << bit;
        Ok(fresh)
    }

    /// Clears the bit at (row, col).
    pub fn clear(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let (word, bit) = Self::locate(row, col)?;
        self.words[word] &= !(1 << bit);
        Ok(())
    }

    /// Membership test that treats off-grid coordinates as absent.
    #[inline]
    pub fn contains(&self, (row, col): (usize, usize)) -> bool {
        self.get(row, col).unwrap_or(false)
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        self.words = [0; WORDS];
    }

    #[inline]
    fn locate(row: usize, col: usize) -> Result<(usize, usize), GridError> {
        if !in_bounds(row, col) {
            return Err(GridError::IndexOutOfBounds { row, col });
        }
        let idx = row * GRID_SIZE + col;
        Ok((idx / 64, idx % 64))
    }

    /// Creates a grid from an iterator over `(row, col)` positions.
    pub fn from_cells<I>(iter: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Self::new();
        for (r, c) in iter {
            grid.set(r, c)?;
        }
        Ok(grid)
    }

    /// Iterator over the set cells in row-major order.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_> {
        SetBits { grid: self, idx: 0 }
    }

    /// Masks off the padding bits past the last cell.
    fn trimmed(mut self) -> Self {
        let spare = WORDS * 64 - CELLS;
        if spare > 0 {
            self.words[WORDS - 1] &= u64::MAX >> spare;
        }
        self
    }
}

impl fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid<{}>:", GRID_SIZE)?;
        fmt::Display::fmt(self, f)?;
        writeln!(f)
    }
}

impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                let bit = if self.contains((r, c)) { '■' } else { '□' };
                write!(f, "{} ", bit)?;
            }
            if r + 1 < GRID_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set cells of a grid.
#[derive(Clone, Copy)]
pub struct SetBits<'a> {
    grid: &'a BitGrid,
    idx: usize,
}

impl<'a> Iterator for SetBits<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < CELLS {
            let idx = self.idx;
            self.idx += 1;
            if (self.grid.words[idx / 64] >> (idx % 64)) & 1 == 1 {
                return Some((idx / GRID_SIZE, idx % GRID_SIZE));
            }
        }
        None
    }
}

impl BitAnd for BitGrid {
    type Output = Self;
    fn bitand(mut self, rhs: Self) -> Self {
        self &= rhs;
        self
    }
}

impl BitOr for BitGrid {
    type Output = Self;
    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

/// Complement within the grid bounds.
impl Not for BitGrid {
    type Output = Self;
    fn not(mut self) -> Self {
        for w in self.words.iter_mut() {
            *w = !*w;
        }
        self.trimmed()
    }
}

impl BitAndAssign for BitGrid {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a &= *b;
        }
    }
}

impl BitOrAssign for BitGrid {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a |= *b;
        }
    }
}

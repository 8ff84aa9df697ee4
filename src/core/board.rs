//! Board occupancy: which unit, if any, sits in each cell.

use alloc::vec::Vec;
use core::fmt;

use super::bitgrid::{in_bounds, BitGrid};
use super::common::Coord;
use super::config::GRID_SIZE;
use super::unit::{Unit, UnitKind};

/// Index of a unit in its board's roster. Cells share it; the board owns
/// the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Grid of cell occupants plus the roster of placed units.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<UnitId>; GRID_SIZE]; GRID_SIZE],
    units: Vec<Unit>,
    occupied: BitGrid,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board (no units placed).
    pub fn new() -> Self {
        Board {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
            units: Vec::new(),
            occupied: BitGrid::new(),
        }
    }

    /// Returns `true` when `coord` lies on the grid.
    pub fn in_bounds(&self, coord: Coord) -> bool {
        in_bounds(coord.0, coord.1)
    }

    /// The unit occupying `coord`, if any. Off-grid cells are empty.
    pub fn occupant_at(&self, coord: Coord) -> Option<&Unit> {
        self.occupant_id_at(coord).map(|id| &self.units[id.0])
    }

    pub fn occupant_id_at(&self, coord: Coord) -> Option<UnitId> {
        if !self.in_bounds(coord) {
            return None;
        }
        self.cells[coord.0][coord.1]
    }

    /// Placed units in placement order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.0]
    }

    /// Number of placed units of `kind`.
    pub fn placed_count(&self, kind: UnitKind) -> usize {
        self.units.iter().filter(|u| u.kind() == kind).count()
    }

    /// Occupancy mask of all units.
    pub fn occupied(&self) -> BitGrid {
        self.occupied
    }

    /// Returns `true` when every placed unit is destroyed.
    pub fn all_destroyed(&self) -> bool {
        self.units.iter().all(Unit::is_destroyed)
    }

    /// Write `unit` into its cells. The caller has already checked bounds and
    /// overlap.
    pub(crate) fn commit(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.units.len());
        for &(r, c) in unit.cells() {
            self.cells[r][c] = Some(id);
        }
        self.occupied |= unit.mask();
        self.units.push(unit);
        id
    }

    /// Remove every unit.
    pub fn clear(&mut self) {
        *self = Board::new();
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  occupied: {:?},\n  units: {:?}\n}}",
            self.occupied, self.units
        )
    }
}

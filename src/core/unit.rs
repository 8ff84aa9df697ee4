//! Unit definitions and footprint logic using `BitGrid`.

use alloc::vec::Vec;
use core::fmt;

use super::bitgrid::{in_bounds, BitGrid};
use super::common::{Coord, PlacementError};
use super::config::unit_type;

/// Orientation of a unit on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Footprint extends to the right of the anchor.
    Horizontal,
    /// Footprint extends downward from the anchor.
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// The five unit types every roster is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "kebab-case"))]
pub enum UnitKind {
    LightTank,
    MediumTank,
    HeavyTank,
    TankDestroyer,
    /// The flagship: losing it loses the game.
    CommandTank,
}

impl UnitKind {
    pub const ALL: [UnitKind; 5] = [
        UnitKind::LightTank,
        UnitKind::MediumTank,
        UnitKind::HeavyTank,
        UnitKind::TankDestroyer,
        UnitKind::CommandTank,
    ];

    /// Position in `UNIT_TYPES`.
    pub fn index(self) -> usize {
        match self {
            UnitKind::LightTank => 0,
            UnitKind::MediumTank => 1,
            UnitKind::HeavyTank => 2,
            UnitKind::TankDestroyer => 3,
            UnitKind::CommandTank => 4,
        }
    }

    /// Short tag accepted on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            UnitKind::LightTank => "light",
            UnitKind::MediumTank => "medium",
            UnitKind::HeavyTank => "heavy",
            UnitKind::TankDestroyer => "destroyer",
            UnitKind::CommandTank => "command",
        }
    }

    pub fn is_flagship(self) -> bool {
        self == UnitKind::CommandTank
    }

    /// Footprint length from the unit table.
    pub fn size(self) -> usize {
        unit_type(self).size()
    }

    /// Instances of this kind in a full roster.
    pub fn roster_count(self) -> usize {
        unit_type(self).count()
    }

    pub fn name(self) -> &'static str {
        unit_type(self).name()
    }
}

/// Type of unit: kind, display name, footprint length and roster count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitType {
    kind: UnitKind,
    name: &'static str,
    size: usize,
    count: usize,
}

impl UnitType {
    /// Create a new unit type.
    pub const fn new(kind: UnitKind, name: &'static str, size: usize, count: usize) -> Self {
        Self {
            kind,
            name,
            size,
            count,
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Footprint length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Roster count per side.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Cells covered by a unit of `kind` anchored at `anchor`, extending right
/// (horizontal) or down (vertical).
pub fn footprint(
    kind: UnitKind,
    anchor: Coord,
    orientation: Orientation,
) -> Result<Vec<Coord>, PlacementError> {
    let (row, col) = anchor;
    let cells: Vec<Coord> = (0..kind.size())
        .map(|i| match orientation {
            Orientation::Horizontal => (row, col.saturating_add(i)),
            Orientation::Vertical => (row.saturating_add(i), col),
        })
        .collect();
    if cells.iter().any(|&(r, c)| !in_bounds(r, c)) {
        return Err(PlacementError::OutOfBounds);
    }
    Ok(cells)
}

/// A unit placed on a board, with hits tracked in a `BitGrid`.
///
/// The footprint is fixed at construction; only the hit set changes
/// afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Unit {
    kind: UnitKind,
    orientation: Orientation,
    cells: Vec<Coord>,
    mask: BitGrid,
    hits: BitGrid,
}

impl Unit {
    /// Build a unit at `anchor` with `orientation`, failing if any cell
    /// leaves the grid.
    pub fn new(
        kind: UnitKind,
        anchor: Coord,
        orientation: Orientation,
    ) -> Result<Self, PlacementError> {
        let cells = footprint(kind, anchor, orientation)?;
        let mask =
            BitGrid::from_cells(cells.iter().copied()).map_err(|_| PlacementError::OutOfBounds)?;
        Ok(Unit {
            kind,
            orientation,
            cells,
            mask,
            hits: BitGrid::new(),
        })
    }

    /// Record a hit at `coord`. Returns `true` if the cell belongs to this unit.
    pub fn register_hit(&mut self, coord: Coord) -> bool {
        if self.mask.contains(coord) {
            let _ = self.hits.set(coord.0, coord.1);
            true
        } else {
            false
        }
    }

    /// Destroyed once every footprint cell has been hit.
    pub fn is_destroyed(&self) -> bool {
        self.hits == self.mask
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// First cell of the footprint.
    pub fn anchor(&self) -> Coord {
        self.cells[0]
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Occupied cells in footprint order.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.mask.contains(coord)
    }

    /// Occupancy mask of the unit on the board.
    pub fn mask(&self) -> BitGrid {
        self.mask
    }

    /// Cells of this unit that have been hit.
    pub fn hits(&self) -> BitGrid {
        self.hits
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unit {{ kind: {:?}, anchor: {:?}, orientation: {:?}, hits: {}/{} }}",
            self.kind,
            self.anchor(),
            self.orientation,
            self.hits.count_ones(),
            self.cells.len(),
        )
    }
}

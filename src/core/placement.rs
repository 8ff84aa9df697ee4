//! Manual and randomized unit placement.

use alloc::vec::Vec;
use log::{debug, warn};
use rand::Rng;

use super::board::{Board, UnitId};
use super::common::{Coord, PlacementError};
use super::config::{GRID_SIZE, MAX_PLACEMENT_ATTEMPTS, TOTAL_UNITS, UNIT_TYPES};
use super::unit::{footprint, Orientation, Unit, UnitKind};

/// Place one unit of `kind` at `anchor`. Roster limits are not checked here;
/// see [`place_within_roster`].
pub fn place(
    board: &mut Board,
    kind: UnitKind,
    anchor: Coord,
    orientation: Orientation,
) -> Result<UnitId, PlacementError> {
    let unit = Unit::new(kind, anchor, orientation)?;
    if !(board.occupied() & unit.mask()).is_empty() {
        return Err(PlacementError::Overlap);
    }
    Ok(board.commit(unit))
}

/// Like [`place`], but rejects a kind whose roster count is already reached.
pub fn place_within_roster(
    board: &mut Board,
    kind: UnitKind,
    anchor: Coord,
    orientation: Orientation,
) -> Result<UnitId, PlacementError> {
    if board.placed_count(kind) >= kind.roster_count() {
        return Err(PlacementError::RosterExceeded { kind });
    }
    place(board, kind, anchor, orientation)
}

/// True once the full roster is on the board.
pub fn is_placement_complete(board: &Board) -> bool {
    board.units().len() == TOTAL_UNITS
}

/// Units of `kind` still waiting to be placed.
pub fn remaining(board: &Board, kind: UnitKind) -> usize {
    kind.roster_count().saturating_sub(board.placed_count(kind))
}

/// Cells a placement would cover and whether it would succeed. Cells that
/// fall off the grid are dropped from the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPreview {
    pub cells: Vec<Coord>,
    pub valid: bool,
}

pub fn preview(
    board: &Board,
    kind: UnitKind,
    anchor: Coord,
    orientation: Orientation,
) -> PlacementPreview {
    match footprint(kind, anchor, orientation) {
        Ok(cells) => {
            let valid = cells.iter().all(|&c| board.occupant_id_at(c).is_none());
            PlacementPreview { cells, valid }
        }
        Err(_) => {
            let (row, col) = anchor;
            let cells = (0..kind.size())
                .map(|i| match orientation {
                    Orientation::Horizontal => (row, col.saturating_add(i)),
                    Orientation::Vertical => (row.saturating_add(i), col),
                })
                .filter(|&c| board.in_bounds(c))
                .collect();
            PlacementPreview {
                cells,
                valid: false,
            }
        }
    }
}

/// Outcome of a best-effort random placement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RandomPlacement {
    pub placed: usize,
    /// One entry per instance whose attempt budget ran out.
    pub unplaced: Vec<UnitKind>,
}

impl RandomPlacement {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Try up to `MAX_PLACEMENT_ATTEMPTS` uniformly random anchors and
/// orientations for one unit.
fn try_random<R: Rng + ?Sized>(board: &mut Board, rng: &mut R, kind: UnitKind) -> Option<UnitId> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let row = rng.random_range(0..GRID_SIZE);
        let col = rng.random_range(0..GRID_SIZE);
        let orientation = if rng.random_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        if let Ok(id) = place(board, kind, (row, col), orientation) {
            return Some(id);
        }
    }
    None
}

/// Clear the board and place the whole roster at random.
///
/// An instance whose attempts are exhausted is skipped and reported in
/// `unplaced`; the call never loops without bound.
pub fn random_placement<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> RandomPlacement {
    board.clear();
    let mut report = RandomPlacement::default();
    for def in UNIT_TYPES.iter() {
        for _ in 0..def.count() {
            match try_random(board, rng, def.kind()) {
                Some(_) => report.placed += 1,
                None => {
                    warn!(
                        "random placement gave up on {} after {} attempts",
                        def.name(),
                        MAX_PLACEMENT_ATTEMPTS
                    );
                    report.unplaced.push(def.kind());
                }
            }
        }
    }
    debug!("random placement put {} units on the board", report.placed);
    report
}

/// Strict variant of [`random_placement`] that fails on the first unit it
/// cannot place.
pub fn random_placement_strict<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
) -> Result<(), PlacementError> {
    board.clear();
    for def in UNIT_TYPES.iter() {
        for _ in 0..def.count() {
            try_random(board, rng, def.kind())
                .ok_or(PlacementError::PlacementExhausted { kind: def.kind() })?;
        }
    }
    Ok(())
}

//! Common types: coordinates, side identifiers and engine errors.

use core::fmt;

use super::bitgrid::GridError;
use super::unit::UnitKind;

/// A (row, column) pair, 0-indexed.
pub type Coord = (usize, usize);

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideId {
    One,
    Two,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::One => SideId::Two,
            SideId::Two => SideId::One,
        }
    }

    /// Index into per-side arrays.
    pub fn index(self) -> usize {
        match self {
            SideId::One => 0,
            SideId::Two => 1,
        }
    }

    /// 1 or 2, as reported in game records.
    pub fn number(self) -> u8 {
        match self {
            SideId::One => 1,
            SideId::Two => 2,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Errors returned by unit placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// A footprint cell falls outside the grid.
    OutOfBounds,
    /// A footprint cell is already occupied.
    Overlap,
    /// Every instance of this unit type is already placed.
    RosterExceeded { kind: UnitKind },
    /// Random placement ran out of attempts for this unit type.
    PlacementExhausted { kind: UnitKind },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBounds => write!(f, "Unit placement is out of bounds"),
            PlacementError::Overlap => write!(f, "Unit placement overlaps with another unit"),
            PlacementError::RosterExceeded { kind } => {
                write!(f, "All {} units are already placed", kind.name())
            }
            PlacementError::PlacementExhausted { kind } => {
                write!(f, "Unable to find a free position for {}", kind.name())
            }
        }
    }
}

/// Errors returned when resolving an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatError {
    /// This cell was already fired at; nothing changed.
    DuplicateShot { row: usize, col: usize },
    /// The target is off the grid.
    OutOfBounds { row: usize, col: usize },
}

impl From<GridError> for CombatError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::IndexOutOfBounds { row, col } => CombatError::OutOfBounds { row, col },
        }
    }
}

impl fmt::Display for CombatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatError::DuplicateShot { row, col } => {
                write!(f, "Cell ({}, {}) was already fired at", row, col)
            }
            CombatError::OutOfBounds { row, col } => {
                write!(f, "Cell ({}, {}) is off the grid", row, col)
            }
        }
    }
}

/// Errors returned by game session entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The call is not valid in the current phase.
    WrongPhase,
    /// The caller does not hold the turn.
    NotYourTurn,
    /// `place` was called before a unit type was selected.
    NoUnitSelected,
    /// Placement cannot be confirmed until the roster is complete.
    PlacementIncomplete { placed: usize, required: usize },
    /// AI entry point used in a two-player session.
    NotAiGame,
    /// No unfired cell is left to target.
    NoTarget,
    Placement(PlacementError),
    Combat(CombatError),
}

impl From<PlacementError> for GameError {
    fn from(err: PlacementError) -> Self {
        GameError::Placement(err)
    }
}

impl From<CombatError> for GameError {
    fn from(err: CombatError) -> Self {
        GameError::Combat(err)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::WrongPhase => write!(f, "Action not available in the current phase"),
            GameError::NotYourTurn => write!(f, "It is not your turn"),
            GameError::NoUnitSelected => write!(f, "Select a unit type before placing"),
            GameError::PlacementIncomplete { placed, required } => {
                write!(f, "Only {} of {} units placed", placed, required)
            }
            GameError::NotAiGame => write!(f, "This game has no AI opponent"),
            GameError::NoTarget => write!(f, "No cell left to fire at"),
            GameError::Placement(e) => write!(f, "{}", e),
            GameError::Combat(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GridError {}
#[cfg(feature = "std")]
impl std::error::Error for PlacementError {}
#[cfg(feature = "std")]
impl std::error::Error for CombatError {}
#[cfg(feature = "std")]
impl std::error::Error for GameError {}

//! Read-only snapshots for whatever renders the game.
//!
//! The engine never depends on a renderer; front ends implement
//! [`GameView`] and pull these snapshots after each state change.

use alloc::vec::Vec;

use super::common::SideId;
use super::config::{GRID_SIZE, UNIT_TYPES};
use super::game::{GameSession, Phase};
use super::placement;
use super::unit::UnitKind;

/// Outcome shown on a cell that has been fired at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellView {
    /// Unit type shown in the cell, if visible to the viewer.
    pub occupant: Option<UnitKind>,
    pub mark: Option<CellMark>,
}

pub type GridView = [[CellView; GRID_SIZE]; GRID_SIZE];

/// Alive and total counts for one unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitTally {
    pub kind: UnitKind,
    pub alive: usize,
    pub total: usize,
}

/// Units of one type placed so far during placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterProgress {
    pub kind: UnitKind,
    pub placed: usize,
    pub required: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnIndicator {
    pub phase: Phase,
    pub current: SideId,
    pub ai_turn: bool,
}

/// Consumer notified whenever the session changes.
pub trait GameView {
    fn refresh(&mut self, session: &GameSession);
}

/// View that ignores every update.
pub struct NullView;

impl GameView for NullView {
    fn refresh(&mut self, _session: &GameSession) {}
}

impl GameSession {
    /// `side`'s own board: every unit visible, marked with the opponent's
    /// shots.
    pub fn fleet_view(&self, side: SideId) -> GridView {
        let board = self.side(side).board();
        let shots = self.side(side.opponent()).shots();
        let mut grid = [[CellView::default(); GRID_SIZE]; GRID_SIZE];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let occupant = board.occupant_at((r, c)).map(|u| u.kind());
                cell.occupant = occupant;
                if shots.contains((r, c)) {
                    cell.mark = Some(if occupant.is_some() {
                        CellMark::Hit
                    } else {
                        CellMark::Miss
                    });
                }
            }
        }
        grid
    }

    /// The opponent's board as `attacker` knows it: only fired-at cells,
    /// with the unit type revealed on hits.
    pub fn target_view(&self, attacker: SideId) -> GridView {
        let board = self.side(attacker.opponent()).board();
        let shots = self.side(attacker).shots();
        let mut grid = [[CellView::default(); GRID_SIZE]; GRID_SIZE];
        for (r, c) in shots.iter_set_bits() {
            let occupant = board.occupant_at((r, c)).map(|u| u.kind());
            grid[r][c] = CellView {
                occupant,
                mark: Some(if occupant.is_some() {
                    CellMark::Hit
                } else {
                    CellMark::Miss
                }),
            };
        }
        grid
    }

    /// Alive/total per unit type for `side`. Totals are roster counts.
    pub fn unit_tally(&self, side: SideId) -> Vec<UnitTally> {
        let board = self.side(side).board();
        UNIT_TYPES
            .iter()
            .map(|def| {
                let destroyed = board
                    .units()
                    .iter()
                    .filter(|u| u.kind() == def.kind() && u.is_destroyed())
                    .count();
                UnitTally {
                    kind: def.kind(),
                    alive: def.count().saturating_sub(destroyed),
                    total: def.count(),
                }
            })
            .collect()
    }

    /// Placed/required per unit type for the side currently placing.
    pub fn roster_progress(&self) -> Vec<RosterProgress> {
        let board = self.side(self.current()).board();
        UNIT_TYPES
            .iter()
            .map(|def| RosterProgress {
                kind: def.kind(),
                placed: def.count() - placement::remaining(board, def.kind()),
                required: def.count(),
            })
            .collect()
    }

    pub fn turn_indicator(&self) -> TurnIndicator {
        TurnIndicator {
            phase: self.phase(),
            current: self.current(),
            ai_turn: self.is_ai_turn(),
        }
    }
}

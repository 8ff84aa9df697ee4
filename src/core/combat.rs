//! Attack resolution and the battle turn rule.

use log::debug;

use super::bitgrid::BitGrid;
use super::board::Board;
use super::common::{CombatError, Coord, SideId};
use super::unit::UnitKind;

/// Result of one resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub coord: Coord,
    pub hit: bool,
    /// Kind of the unit this shot finished off.
    pub destroyed: Option<UnitKind>,
    /// The defender has lost: command unit destroyed or no unit left.
    pub game_ended: bool,
}

impl AttackReport {
    fn miss(coord: Coord) -> Self {
        AttackReport {
            coord,
            hit: false,
            destroyed: None,
            game_ended: false,
        }
    }
}

/// Fire at `coord` on `defender`, recording the shot in the attacker's
/// `shots` set.
///
/// A repeated coordinate returns `DuplicateShot` and leaves every piece of
/// state untouched.
pub fn resolve_attack(
    shots: &mut BitGrid,
    defender: &mut Board,
    coord: Coord,
) -> Result<AttackReport, CombatError> {
    let (row, col) = coord;
    if !shots.set(row, col)? {
        return Err(CombatError::DuplicateShot { row, col });
    }

    let Some(id) = defender.occupant_id_at(coord) else {
        debug!("shot at {:?} missed", coord);
        return Ok(AttackReport::miss(coord));
    };

    let unit = defender.unit_mut(id);
    unit.register_hit(coord);
    let destroyed = unit.is_destroyed().then_some(unit.kind());

    // Both checks run on every hit.
    let flagship_down = destroyed.is_some_and(UnitKind::is_flagship);
    let fleet_down = defender.all_destroyed();
    let report = AttackReport {
        coord,
        hit: true,
        destroyed,
        game_ended: flagship_down || fleet_down,
    };
    debug!("shot at {:?} hit: {:?}", coord, report);
    Ok(report)
}

/// Battle-phase turn machine, driven only by attack reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Attacking(SideId),
    Ended { winner: SideId },
}

impl TurnState {
    pub fn new(first: SideId) -> Self {
        TurnState::Attacking(first)
    }

    /// Side allowed to fire, if the battle is still running.
    pub fn attacker(&self) -> Option<SideId> {
        match self {
            TurnState::Attacking(side) => Some(*side),
            TurnState::Ended { .. } => None,
        }
    }

    pub fn winner(&self) -> Option<SideId> {
        match self {
            TurnState::Ended { winner } => Some(*winner),
            TurnState::Attacking(_) => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, TurnState::Ended { .. })
    }

    /// Apply the outcome of the current attacker's shot: hits keep the turn,
    /// misses pass it, a terminal hit ends the battle.
    pub fn apply(&mut self, report: &AttackReport) {
        if let TurnState::Attacking(attacker) = *self {
            *self = if report.game_ended {
                TurnState::Ended { winner: attacker }
            } else if report.hit {
                TurnState::Attacking(attacker)
            } else {
                TurnState::Attacking(attacker.opponent())
            };
        }
    }
}

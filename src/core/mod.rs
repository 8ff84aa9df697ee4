//! Core tank battle engine (no_std compatible)
//!
//! This module contains the pure game logic: board model, placement,
//! combat resolution, AI targeting and the session phase machine. It needs
//! only `alloc`, `rand` and the `log` facade.

pub mod ai;
pub mod bitgrid;
pub mod board;
pub mod combat;
pub mod common;
pub mod config;
pub mod game;
pub mod placement;
pub mod unit;
pub mod view;

// Re-export commonly used types
pub use ai::{targeting_for, Difficulty, HuntMemory, Targeting};
pub use bitgrid::{in_bounds, BitGrid, GridError};
pub use board::{Board, UnitId};
pub use combat::{resolve_attack, AttackReport, TurnState};
pub use common::{CombatError, Coord, GameError, PlacementError, SideId};
pub use config::*;
pub use game::{GameMode, GameRecord, GameSession, Nation, Phase, Side};
pub use placement::{
    is_placement_complete, place, place_within_roster, random_placement, PlacementPreview,
    RandomPlacement,
};
pub use unit::{Orientation, Unit, UnitKind, UnitType};
pub use view::{CellMark, CellView, GameView, GridView, NullView, RosterProgress, TurnIndicator, UnitTally};

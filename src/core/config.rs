use super::unit::{UnitKind, UnitType};

/// Side length of the square battle grid.
pub const GRID_SIZE: usize = 20;

/// Number of distinct unit types in a roster.
pub const NUM_UNIT_TYPES: usize = 5;

/// Unit table in placement order. Random placement walks this order.
pub const UNIT_TYPES: [UnitType; NUM_UNIT_TYPES] = [
    UnitType::new(UnitKind::LightTank, "Light Tank", 2, 4),
    UnitType::new(UnitKind::MediumTank, "Medium Tank", 3, 2),
    UnitType::new(UnitKind::HeavyTank, "Heavy Tank", 4, 1),
    UnitType::new(UnitKind::TankDestroyer, "Tank Destroyer", 2, 2),
    UnitType::new(UnitKind::CommandTank, "Command Tank", 3, 1),
];

/// Units each side fields once placement is complete.
pub const TOTAL_UNITS: usize = 4 + 2 + 1 + 2 + 1;

/// Total number of cells covered by a complete roster.
pub const TOTAL_UNIT_CELLS: usize = 4 * 2 + 2 * 3 + 4 + 2 * 2 + 3;

/// Attempts made for each unit instance during random placement.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Pause before the AI fires the first shot of its turn.
pub const AI_FIRST_SHOT_DELAY_MS: u64 = 1000;

/// Pause between consecutive AI shots during a streak.
pub const AI_SHOT_INTERVAL_MS: u64 = 600;

/// Table entry for `kind`.
pub fn unit_type(kind: UnitKind) -> UnitType {
    UNIT_TYPES[kind.index()]
}

/// Look up a unit kind by its display name or short tag (`light`, `command`, ...).
pub fn unit_kind_by_name(name: &str) -> Option<UnitKind> {
    UNIT_TYPES
        .iter()
        .find(|t| t.name().eq_ignore_ascii_case(name) || t.kind().tag().eq_ignore_ascii_case(name))
        .map(|t| t.kind())
}

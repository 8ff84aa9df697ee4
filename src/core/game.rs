use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::core::{
    ai::{targeting_for, Difficulty, Targeting},
    bitgrid::BitGrid,
    board::{Board, UnitId},
    combat::{resolve_attack, AttackReport, TurnState},
    common::{Coord, GameError, PlacementError, SideId},
    config::TOTAL_UNITS,
    placement::{self, PlacementPreview, RandomPlacement},
    unit::{Orientation, UnitKind},
};

/// Playable factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Nation {
    #[cfg_attr(feature = "std", serde(rename = "US"))]
    Us,
    German,
    #[cfg_attr(feature = "std", serde(rename = "USSR"))]
    Ussr,
    Britain,
    Japan,
}

impl Nation {
    pub const ALL: [Nation; 5] = [
        Nation::Us,
        Nation::German,
        Nation::Ussr,
        Nation::Britain,
        Nation::Japan,
    ];

    /// Identifier used in game records.
    pub fn id(self) -> &'static str {
        match self {
            Nation::Us => "US",
            Nation::German => "German",
            Nation::Ussr => "USSR",
            Nation::Britain => "Britain",
            Nation::Japan => "Japan",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Nation::Us => "United States",
            Nation::German => "Germany",
            Nation::Ussr => "Soviet Union",
            Nation::Britain => "Britain",
            Nation::Japan => "Japan",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Nation::Us => '★',
            Nation::German => '✠',
            Nation::Ussr => '☭',
            Nation::Britain => '♔',
            Nation::Japan => '◉',
        }
    }
}

impl FromStr for Nation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nation::ALL
            .into_iter()
            .find(|n| n.id().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Local two-player hot seat, or a human against one AI tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(into = "String", try_from = "String"))]
pub enum GameMode {
    LocalTwoPlayer,
    Ai(Difficulty),
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::LocalTwoPlayer => "2player",
            GameMode::Ai(Difficulty::Normal) => "ai-normal",
            GameMode::Ai(Difficulty::Hard) => "ai-hard",
            GameMode::Ai(Difficulty::Nightmare) => "ai-nightmare",
        }
    }

    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            GameMode::Ai(d) => Some(d),
            GameMode::LocalTwoPlayer => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "2player" {
            return Ok(GameMode::LocalTwoPlayer);
        }
        s.strip_prefix("ai-")
            .and_then(|d| d.parse().ok())
            .map(GameMode::Ai)
            .ok_or_else(|| alloc::format!("unknown game mode '{}'", s))
    }
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        String::from(mode.as_str())
    }
}

impl TryFrom<String> for GameMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Session phase. Linear except for the second placement pass of a local
/// two-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NationSelection,
    Placement,
    Battle,
    Ended { winner: SideId },
}

/// Outbound summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameRecord {
    #[cfg_attr(feature = "std", serde(rename = "player1_nation"))]
    pub side1_nation: Option<Nation>,
    #[cfg_attr(feature = "std", serde(rename = "player2_nation"))]
    pub side2_nation: Option<Nation>,
    /// 1 or 2.
    pub winner: u8,
    pub game_mode: GameMode,
}

/// Per-player state: faction, own board and shots fired at the opponent.
#[derive(Debug, Clone, Default)]
pub struct Side {
    nation: Option<Nation>,
    board: Board,
    shots: BitGrid,
}

impl Side {
    pub fn nation(&self) -> Option<Nation> {
        self.nation
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cells this side has fired at on the opponent's board.
    pub fn shots(&self) -> &BitGrid {
        &self.shots
    }
}

/// One game from nation selection to the end of the battle.
pub struct GameSession {
    mode: GameMode,
    phase: Phase,
    sides: [Side; 2],
    current: SideId,
    orientation: Orientation,
    selected: Option<UnitKind>,
    turn: TurnState,
    ai: Option<Box<dyn Targeting>>,
    record_taken: bool,
}

impl GameSession {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            phase: Phase::NationSelection,
            sides: [Side::default(), Side::default()],
            current: SideId::One,
            orientation: Orientation::Horizontal,
            selected: None,
            turn: TurnState::new(SideId::One),
            ai: mode.difficulty().map(targeting_for),
            record_taken: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side placing units, or holding the turn once the battle started.
    pub fn current(&self) -> SideId {
        self.current
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn selected_unit(&self) -> Option<UnitKind> {
        self.selected
    }

    pub fn winner(&self) -> Option<SideId> {
        match self.phase {
            Phase::Ended { winner } => Some(winner),
            _ => None,
        }
    }

    /// Side two is the AI in AI mode.
    pub fn is_ai(&self, side: SideId) -> bool {
        self.ai.is_some() && side == SideId::Two
    }

    /// True while the battle waits on the AI to fire.
    pub fn is_ai_turn(&self) -> bool {
        self.phase == Phase::Battle && self.is_ai(self.current)
    }

    fn expect_phase(&self, phase: Phase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase)
        }
    }

    fn placing_board(&mut self) -> &mut Board {
        &mut self.sides[self.current.index()].board
    }

    /// Choose the current side's nation and move on to placement. In AI
    /// mode the AI takes a random different nation.
    pub fn select_nation(&mut self, nation: Nation, rng: &mut SmallRng) -> Result<(), GameError> {
        self.expect_phase(Phase::NationSelection)?;
        self.sides[self.current.index()].nation = Some(nation);
        if self.ai.is_some() {
            let others: alloc::vec::Vec<Nation> =
                Nation::ALL.into_iter().filter(|n| *n != nation).collect();
            self.sides[SideId::Two.index()].nation = others.choose(rng).copied();
        }
        info!("{} chose {}", self.current, nation.name());
        self.phase = Phase::Placement;
        Ok(())
    }

    /// Select the unit type the next `place` call puts down.
    pub fn select_unit(&mut self, kind: UnitKind) -> Result<(), GameError> {
        self.expect_phase(Phase::Placement)?;
        let board = &self.sides[self.current.index()].board;
        if placement::remaining(board, kind) == 0 {
            return Err(PlacementError::RosterExceeded { kind }.into());
        }
        self.selected = Some(kind);
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn rotate(&mut self) -> Orientation {
        self.orientation = self.orientation.toggled();
        self.orientation
    }

    /// Footprint the selected unit would cover at `anchor`.
    pub fn preview_placement(&self, anchor: Coord) -> Option<PlacementPreview> {
        let kind = self.selected?;
        let board = &self.sides[self.current.index()].board;
        Some(placement::preview(board, kind, anchor, self.orientation))
    }

    /// Place the selected unit at `anchor` with the current orientation.
    pub fn place(&mut self, anchor: Coord) -> Result<UnitId, GameError> {
        self.expect_phase(Phase::Placement)?;
        let kind = self.selected.ok_or(GameError::NoUnitSelected)?;
        let orientation = self.orientation;
        let id = placement::place_within_roster(self.placing_board(), kind, anchor, orientation)?;
        debug!("{} placed {} at {:?}", self.current, kind.name(), anchor);
        self.selected = None;
        Ok(id)
    }

    pub fn random_placement(&mut self, rng: &mut SmallRng) -> Result<RandomPlacement, GameError> {
        self.expect_phase(Phase::Placement)?;
        self.selected = None;
        Ok(placement::random_placement(self.placing_board(), rng))
    }

    pub fn clear_board(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Placement)?;
        self.selected = None;
        self.placing_board().clear();
        Ok(())
    }

    pub fn is_placement_complete(&self) -> bool {
        placement::is_placement_complete(&self.sides[self.current.index()].board)
    }

    /// Confirm the current side's placement. Hands over to player two in a
    /// local game; otherwise fields the AI roster if needed and starts the
    /// battle.
    pub fn confirm_placement(&mut self, rng: &mut SmallRng) -> Result<Phase, GameError> {
        self.expect_phase(Phase::Placement)?;
        let placed = self.sides[self.current.index()].board.units().len();
        if placed != TOTAL_UNITS {
            return Err(GameError::PlacementIncomplete {
                placed,
                required: TOTAL_UNITS,
            });
        }
        self.selected = None;
        if self.mode == GameMode::LocalTwoPlayer && self.current == SideId::One {
            self.current = SideId::Two;
            self.phase = Phase::NationSelection;
            info!("player two to select a nation");
            return Ok(self.phase);
        }
        if self.ai.is_some() {
            let report = placement::random_placement(&mut self.sides[SideId::Two.index()].board, rng);
            debug!("AI fielded {} units", report.placed);
        }
        self.start_battle();
        Ok(self.phase)
    }

    fn start_battle(&mut self) {
        self.current = SideId::One;
        self.turn = TurnState::new(SideId::One);
        self.phase = Phase::Battle;
        info!("battle started ({})", self.mode);
    }

    fn attack(&mut self, coord: Coord) -> Result<AttackReport, GameError> {
        let attacker = self.current;
        let [one, two] = &mut self.sides;
        let (att, def) = match attacker {
            SideId::One => (one, two),
            SideId::Two => (two, one),
        };
        let report = resolve_attack(&mut att.shots, &mut def.board, coord)?;
        self.turn.apply(&report);
        match self.turn {
            TurnState::Attacking(next) => self.current = next,
            TurnState::Ended { winner } => {
                info!("{} wins", winner);
                self.phase = Phase::Ended { winner };
            }
        }
        Ok(report)
    }

    /// Fire at `coord` as the human holding the turn.
    pub fn fire(&mut self, coord: Coord) -> Result<AttackReport, GameError> {
        self.expect_phase(Phase::Battle)?;
        if self.is_ai(self.current) {
            return Err(GameError::NotYourTurn);
        }
        self.attack(coord)
    }

    /// Let the AI pick a target and fire once.
    pub fn ai_fire(&mut self, rng: &mut SmallRng) -> Result<AttackReport, GameError> {
        self.expect_phase(Phase::Battle)?;
        if self.ai.is_none() {
            return Err(GameError::NotAiGame);
        }
        if !self.is_ai(self.current) {
            return Err(GameError::NotYourTurn);
        }
        let shots = self.sides[SideId::Two.index()].shots;
        let ai = self.ai.as_mut().ok_or(GameError::NotAiGame)?;
        let coord = ai.next_target(rng, &shots).ok_or(GameError::NoTarget)?;
        let report = self.attack(coord)?;
        let shots = self.sides[SideId::Two.index()].shots;
        if let Some(ai) = self.ai.as_mut() {
            ai.observe(&report, &shots);
        }
        Ok(report)
    }

    /// The result record, handed out once per finished game.
    pub fn take_record(&mut self) -> Option<GameRecord> {
        let winner = self.winner()?;
        if self.record_taken {
            return None;
        }
        self.record_taken = true;
        Some(GameRecord {
            side1_nation: self.sides[0].nation,
            side2_nation: self.sides[1].nation,
            winner: winner.number(),
            game_mode: self.mode,
        })
    }
}

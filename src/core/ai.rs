// Targeting strategies for the AI opponent.
// Each strategy sees only what the AI may legitimately know: its own shots
// and the hit/miss feedback of each attack.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;
use core::str::FromStr;

use rand::rngs::SmallRng;
use rand::Rng;

use super::bitgrid::{in_bounds, BitGrid};
use super::combat::AttackReport;
use super::common::Coord;
use super::config::GRID_SIZE;

/// AI difficulty tier, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Normal, Difficulty::Hard, Difficulty::Nightmare];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Interface implemented by the difficulty tiers.
pub trait Targeting: Send {
    fn difficulty(&self) -> Difficulty;

    /// Pick the next cell to fire at. `None` only when every cell has been
    /// fired at already.
    fn next_target(&mut self, rng: &mut SmallRng, shots: &BitGrid) -> Option<Coord>;

    /// Feed back the result of the shot just fired. `shots` already
    /// contains `report.coord`.
    fn observe(&mut self, report: &AttackReport, shots: &BitGrid);
}

/// Strategy for `difficulty`.
pub fn targeting_for(difficulty: Difficulty) -> Box<dyn Targeting> {
    match difficulty {
        Difficulty::Normal => Box::new(NormalTargeting),
        Difficulty::Hard => Box::new(HardTargeting::default()),
        Difficulty::Nightmare => Box::new(NightmareTargeting::default()),
    }
}

const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn offset(coord: Coord, (dr, dc): (isize, isize)) -> Option<Coord> {
    let r = coord.0.checked_add_signed(dr)?;
    let c = coord.1.checked_add_signed(dc)?;
    in_bounds(r, c).then_some((r, c))
}

/// Uniform pick among cells not yet fired at, by rejection sampling.
pub fn random_unfired(rng: &mut SmallRng, shots: &BitGrid) -> Option<Coord> {
    if shots.is_full() {
        return None;
    }
    loop {
        let coord = (rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        if !shots.contains(coord) {
            return Some(coord);
        }
    }
}

/// First unfired cell in row-major order with an even (row + col).
pub fn parity_scan(shots: &BitGrid) -> Option<Coord> {
    (0..GRID_SIZE)
        .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
        .find(|&(r, c)| (r + c) % 2 == 0 && !shots.contains((r, c)))
}

/// Memory of a located but unfinished unit: the last unresolved hit and the
/// queue of neighbours still to try.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuntMemory {
    last_hit: Option<Coord>,
    queue: VecDeque<Coord>,
}

impl HuntMemory {
    pub fn last_hit(&self) -> Option<Coord> {
        self.last_hit
    }

    pub fn queue(&self) -> &VecDeque<Coord> {
        &self.queue
    }

    /// Append the in-bounds, unfired orthogonal neighbours of `coord` that
    /// are not queued yet.
    pub fn enqueue_neighbours(&mut self, coord: Coord, shots: &BitGrid) {
        for dir in DIRECTIONS {
            if let Some(n) = offset(coord, dir) {
                if !shots.contains(n) && !self.queue.contains(&n) {
                    self.queue.push_back(n);
                }
            }
        }
    }

    /// Pop the next queued cell that is still unfired.
    pub fn pop(&mut self, shots: &BitGrid) -> Option<Coord> {
        while let Some(c) = self.queue.pop_front() {
            if !shots.contains(c) {
                return Some(c);
            }
        }
        None
    }

    /// Queue first; otherwise expand around the pending hit and pop again.
    pub fn next(&mut self, shots: &BitGrid) -> Option<Coord> {
        if let Some(c) = self.pop(shots) {
            return Some(c);
        }
        let lead = self.last_hit?;
        self.enqueue_neighbours(lead, shots);
        self.pop(shots)
    }

    pub fn record(&mut self, report: &AttackReport, shots: &BitGrid) {
        if report.hit {
            if report.destroyed.is_some() {
                self.reset();
            } else {
                self.last_hit = Some(report.coord);
                self.enqueue_neighbours(report.coord, shots);
            }
        } else if self.queue.is_empty() {
            self.last_hit = None;
        }
    }

    pub fn reset(&mut self) {
        self.last_hit = None;
        self.queue.clear();
    }
}

/// Random fire with no spatial reasoning.
#[derive(Debug, Default)]
pub struct NormalTargeting;

impl Targeting for NormalTargeting {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Normal
    }

    fn next_target(&mut self, rng: &mut SmallRng, shots: &BitGrid) -> Option<Coord> {
        random_unfired(rng, shots)
    }

    fn observe(&mut self, _report: &AttackReport, _shots: &BitGrid) {}
}

/// A line being followed through two adjacent hits on one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Heading {
    /// First hit of the line; the reversal restarts from here.
    origin: Coord,
    /// Latest hit along the current direction.
    tip: Coord,
    step: (isize, isize),
    reversed: bool,
}

impl Heading {
    fn reverse(&mut self) {
        self.step = (-self.step.0, -self.step.1);
        self.tip = self.origin;
        self.reversed = true;
    }
}

/// Hunt queue plus directional continuation: once two adjacent hits line up,
/// keep firing along that line, reverse once on a miss or the edge, then
/// fall back to the queue.
#[derive(Debug, Default)]
pub struct HardTargeting {
    memory: HuntMemory,
    heading: Option<Heading>,
}

impl HardTargeting {
    fn follow_heading(&mut self, shots: &BitGrid) -> Option<Coord> {
        let heading = self.heading.as_mut()?;
        for _ in 0..2 {
            if let Some(next) = offset(heading.tip, heading.step) {
                if !shots.contains(next) {
                    return Some(next);
                }
            }
            if heading.reversed {
                break;
            }
            heading.reverse();
        }
        self.heading = None;
        None
    }
}

impl Targeting for HardTargeting {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Hard
    }

    fn next_target(&mut self, rng: &mut SmallRng, shots: &BitGrid) -> Option<Coord> {
        self.follow_heading(shots)
            .or_else(|| self.memory.next(shots))
            .or_else(|| random_unfired(rng, shots))
    }

    fn observe(&mut self, report: &AttackReport, shots: &BitGrid) {
        if report.hit && report.destroyed.is_none() {
            if let Some(h) = self.heading.as_mut() {
                h.tip = report.coord;
            } else if let Some(prev) = self.memory.last_hit() {
                let step = (
                    report.coord.0 as isize - prev.0 as isize,
                    report.coord.1 as isize - prev.1 as isize,
                );
                if DIRECTIONS.contains(&step) {
                    self.heading = Some(Heading {
                        origin: prev,
                        tip: report.coord,
                        step,
                        reversed: false,
                    });
                }
            }
        } else if report.destroyed.is_some() {
            self.heading = None;
        } else if let Some(h) = self.heading.as_mut() {
            if h.reversed {
                self.heading = None;
            } else {
                h.reverse();
            }
        }
        self.memory.record(report, shots);
    }
}

/// Hunt queue with a checkerboard parity sweep when there is no lead.
#[derive(Debug, Default)]
pub struct NightmareTargeting {
    memory: HuntMemory,
}

impl NightmareTargeting {
    pub fn memory(&self) -> &HuntMemory {
        &self.memory
    }
}

impl Targeting for NightmareTargeting {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Nightmare
    }

    fn next_target(&mut self, rng: &mut SmallRng, shots: &BitGrid) -> Option<Coord> {
        self.memory
            .next(shots)
            .or_else(|| parity_scan(shots))
            .or_else(|| random_unfired(rng, shots))
    }

    fn observe(&mut self, report: &AttackReport, shots: &BitGrid) {
        self.memory.record(report, shots);
    }
}

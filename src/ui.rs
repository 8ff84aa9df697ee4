#![cfg(feature = "std")]

use std::fmt::Write as _;

use crate::core::{
    config::GRID_SIZE,
    game::{GameSession, Phase},
    unit::UnitKind,
    view::{CellMark, CellView, GameView, GridView},
    SideId,
};

/// Single-letter glyph for a unit type.
pub fn unit_glyph(kind: UnitKind) -> char {
    match kind {
        UnitKind::LightTank => 'L',
        UnitKind::MediumTank => 'M',
        UnitKind::HeavyTank => 'H',
        UnitKind::TankDestroyer => 'D',
        UnitKind::CommandTank => 'C',
    }
}

fn cell_glyph(cell: &CellView) -> char {
    match (cell.mark, cell.occupant) {
        (Some(CellMark::Hit), _) => 'X',
        (Some(CellMark::Miss), _) => 'o',
        (None, Some(kind)) => unit_glyph(kind),
        (None, None) => '.',
    }
}

/// Column letter for index `c` (A..T).
pub fn column_label(c: usize) -> char {
    (b'A' + c as u8) as char
}

/// Render a grid snapshot with column letters and row numbers.
pub fn render_grid(title: &str, grid: &GridView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    {}", title);
    out.push_str("    ");
    for c in 0..GRID_SIZE {
        let _ = write!(out, " {}", column_label(c));
    }
    out.push('\n');
    for (r, row) in grid.iter().enumerate() {
        let _ = write!(out, "  {:2}", r + 1);
        for cell in row.iter() {
            let _ = write!(out, " {}", cell_glyph(cell));
        }
        out.push('\n');
    }
    out
}

/// Alive/total lines for both sides.
pub fn render_tallies(session: &GameSession) -> String {
    let mut out = String::new();
    for side in [SideId::One, SideId::Two] {
        let _ = writeln!(out, "    {} units:", side_label(session, side));
        for t in session.unit_tally(side) {
            let _ = writeln!(out, "      {:<15} {}/{}", t.kind.name(), t.alive, t.total);
        }
    }
    out
}

fn side_label(session: &GameSession, side: SideId) -> String {
    let who = if session.is_ai(side) {
        "AI".to_string()
    } else {
        side.to_string()
    };
    match session.side(side).nation() {
        Some(n) => format!("{} {} ({})", n.symbol(), who, n.name()),
        None => who,
    }
}

/// Text for the turn indicator.
pub fn turn_banner(session: &GameSession) -> String {
    let t = session.turn_indicator();
    match t.phase {
        Phase::NationSelection => format!("{}: select your nation", t.current),
        Phase::Placement => format!("{}: place your tanks", side_label(session, t.current)),
        Phase::Battle if t.ai_turn => "AI Turn...".to_string(),
        Phase::Battle => format!("{} - Fire!", side_label(session, t.current)),
        Phase::Ended { winner } => format!("Game over - {} wins", side_label(session, winner)),
    }
}

/// Placement screen for the side currently placing.
pub fn render_placement(session: &GameSession) -> String {
    let side = session.current();
    let mut out = render_grid("Your deployment", &session.fleet_view(side));
    let _ = writeln!(out, "    Orientation: {:?}", session.orientation());
    for p in session.roster_progress() {
        let marker = if session.selected_unit() == Some(p.kind) { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "    {} {:<15} ({} squares) {}/{}  [{}]",
            marker,
            p.kind.name(),
            p.kind.size(),
            p.placed,
            p.required,
            p.kind.tag()
        );
    }
    out
}

/// Battle screen from the point of view of `viewer`.
pub fn render_battle(session: &GameSession, viewer: SideId) -> String {
    let mut out = String::new();
    // Hot-seat games only show the opponent's board to the active player.
    if session.mode() != crate::core::GameMode::LocalTwoPlayer {
        out.push_str(&render_grid("Your forces", &session.fleet_view(viewer)));
        out.push('\n');
    }
    out.push_str(&render_grid("Enemy territory", &session.target_view(viewer)));
    out.push('\n');
    out.push_str(&render_tallies(session));
    out
}

/// Prints the current screen to stdout on every refresh.
pub struct TerminalView;

impl GameView for TerminalView {
    fn refresh(&mut self, session: &GameSession) {
        let body = match session.phase() {
            Phase::NationSelection => String::new(),
            Phase::Placement => render_placement(session),
            Phase::Battle | Phase::Ended { .. } => {
                let viewer = if session.is_ai(session.current()) || session.winner().is_some() {
                    SideId::One
                } else {
                    session.current()
                };
                render_battle(session, viewer)
            }
        };
        println!("\n=== {} ===", turn_banner(session));
        print!("{}", body);
    }
}

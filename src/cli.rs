#![cfg(feature = "std")]

//! Line-oriented command front end.

use std::io::{self, BufRead, ErrorKind, Write};
use std::thread;

use log::{debug, warn};
use rand::rngs::SmallRng;
use tokio::sync::mpsc;

use crate::ai_turn::{AiTurnOutcome, AiTurnRunner};
use crate::core::{
    config::{unit_kind_by_name, GRID_SIZE},
    game::{GameSession, Nation, Phase},
    unit::{Orientation, UnitKind},
    view::GameView,
    AttackReport, Coord, GameError, SideId,
};

/// A parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Nation(Nation),
    Unit(UnitKind),
    Rotate,
    Preview(Coord),
    Place {
        anchor: Coord,
        orientation: Option<Orientation>,
    },
    Random,
    Clear,
    Ready,
    Fire(Coord),
    Help,
    Quit,
}

pub fn coord_to_string((r, c): Coord) -> String {
    let col = (b'A' + c as u8) as char;
    format!("{}{}", col, r + 1)
}

/// Parse a cell such as `C7` into `(row, col)`.
pub fn parse_coord(input: &str) -> Result<Coord, String> {
    let last_col = (b'A' + GRID_SIZE as u8 - 1) as char;
    if input.is_empty() {
        return Err("Empty coordinate".to_string());
    }
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., C7)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-{}", col_ch, last_col));
    }
    let col = (col_ch as u8).wrapping_sub(b'A') as usize;
    if col >= GRID_SIZE {
        return Err(format!("Column '{}' out of bounds - must be A-{}", col_ch, last_col));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, GRID_SIZE))?;
    if row == 0 || row > GRID_SIZE {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, GRID_SIZE));
    }
    Ok((row - 1, col))
}

fn parse_orientation(input: &str) -> Result<Orientation, String> {
    match input.to_ascii_lowercase().as_str() {
        "h" | "horizontal" => Ok(Orientation::Horizontal),
        "v" | "vertical" => Ok(Orientation::Vertical),
        other => Err(format!("Unknown orientation '{}' - use h or v", other)),
    }
}

fn one_arg<'a>(args: &[&'a str], usage: &str) -> Result<&'a str, String> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(format!("Usage: {}", usage)),
    }
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or("Empty command")?.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();
    match verb.as_str() {
        "nation" => {
            let id = one_arg(&args, "nation <US|German|USSR|Britain|Japan>")?;
            id.parse()
                .map(Command::Nation)
                .map_err(|_| format!("Unknown nation '{}'", id))
        }
        "unit" | "select" => {
            let name = args.join(" ");
            unit_kind_by_name(&name)
                .map(Command::Unit)
                .ok_or_else(|| format!("Unknown unit '{}'", name))
        }
        "rotate" | "r" => Ok(Command::Rotate),
        "preview" => Ok(Command::Preview(parse_coord(one_arg(&args, "preview <cell>")?)?)),
        "place" | "p" => match args.as_slice() {
            [cell] => Ok(Command::Place {
                anchor: parse_coord(cell)?,
                orientation: None,
            }),
            [cell, o] => Ok(Command::Place {
                anchor: parse_coord(cell)?,
                orientation: Some(parse_orientation(o)?),
            }),
            _ => Err("Usage: place <cell> [h|v]".to_string()),
        },
        "random" => Ok(Command::Random),
        "clear" => Ok(Command::Clear),
        "ready" | "done" => Ok(Command::Ready),
        "fire" | "f" => Ok(Command::Fire(parse_coord(one_arg(&args, "fire <cell>")?)?)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        // A bare cell during battle means "fire".
        _ if args.is_empty() => parse_coord(&verb)
            .map(Command::Fire)
            .map_err(|_| format!("Unknown command '{}' (try 'help')", verb)),
        other => Err(format!("Unknown command '{}' (try 'help')", other)),
    }
}

pub const HELP: &str = "\
Commands:
  nation <US|German|USSR|Britain|Japan>
  unit <light|medium|heavy|destroyer|command>
  rotate                 toggle horizontal/vertical
  preview <cell>         show the selected unit's footprint
  place <cell> [h|v]     place the selected unit (e.g. place B4 v)
  random                 place the whole roster at random
  clear                  remove every placed unit
  ready                  confirm placement
  fire <cell>            attack a cell (e.g. fire C7, or just C7)
  quit";

fn describe_attack(report: &AttackReport) -> String {
    let cell = coord_to_string(report.coord);
    match (report.hit, report.destroyed) {
        (false, _) => format!("{}: miss", cell),
        (true, Some(kind)) => format!("{}: hit - {} destroyed!", cell, kind.name()),
        (true, None) => format!("{}: hit!", cell),
    }
}

/// Apply `cmd` to the session and describe what happened.
pub fn apply_command(
    session: &mut GameSession,
    rng: &mut SmallRng,
    cmd: Command,
) -> Result<String, GameError> {
    match cmd {
        Command::Nation(n) => {
            session.select_nation(n, rng)?;
            Ok(format!("{} - {}", n.symbol(), n.name()))
        }
        Command::Unit(kind) => {
            session.select_unit(kind)?;
            Ok(format!("Selected {} ({} squares)", kind.name(), kind.size()))
        }
        Command::Rotate => Ok(format!("Orientation: {:?}", session.rotate())),
        Command::Preview(anchor) => {
            let preview = session
                .preview_placement(anchor)
                .ok_or(GameError::NoUnitSelected)?;
            let cells: Vec<String> = preview.cells.iter().map(|&c| coord_to_string(c)).collect();
            let verdict = if preview.valid { "valid" } else { "invalid" };
            Ok(format!("{} ({})", cells.join(" "), verdict))
        }
        Command::Place {
            anchor,
            orientation,
        } => {
            if let Some(o) = orientation {
                session.set_orientation(o);
            }
            let kind = session.selected_unit().ok_or(GameError::NoUnitSelected)?;
            session.place(anchor)?;
            Ok(format!("{} placed at {}", kind.name(), coord_to_string(anchor)))
        }
        Command::Random => {
            let report = session.random_placement(rng)?;
            if report.is_complete() {
                Ok("Roster placed at random".to_string())
            } else {
                Ok(format!(
                    "Placed {} units; could not fit {:?}",
                    report.placed, report.unplaced
                ))
            }
        }
        Command::Clear => {
            session.clear_board()?;
            Ok("Board cleared".to_string())
        }
        Command::Ready => match session.confirm_placement(rng)? {
            Phase::NationSelection => Ok("Pass the terminal to Player 2".to_string()),
            _ => Ok("Battle begins!".to_string()),
        },
        Command::Fire(coord) => session.fire(coord).map(|r| describe_attack(&r)),
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

/// How an interactive game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished { winner: SideId },
    Quit,
}

fn prompt(session: &GameSession) -> &'static str {
    match session.phase() {
        Phase::NationSelection => "nation> ",
        Phase::Placement => "deploy> ",
        Phase::Battle | Phase::Ended { .. } => "fire> ",
    }
}

/// Input lines delivered from a reader thread, so waiting for the next
/// command can be raced against shutdown.
pub struct LineSource {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl LineSource {
    /// A source fed by hand through the returned sender.
    pub fn channel(capacity: usize) -> (mpsc::Sender<io::Result<String>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }

    /// Read `reader` line by line on a dedicated thread. Lines that are not
    /// UTF-8 are reported and skipped; other read errors end the source.
    pub fn from_reader<R: BufRead + Send + 'static>(mut reader: R) -> Self {
        let (tx, source) = Self::channel(16);
        thread::spawn(move || {
            let mut line = String::new();
            loop {
                line.clear();
                let item = match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => Ok(line.clone()),
                    Err(e) => Err(e),
                };
                let fatal = matches!(&item, Err(e) if e.kind() != ErrorKind::InvalidData);
                if tx.blocking_send(item).is_err() || fatal {
                    break;
                }
            }
        });
        source
    }

    /// Read standard input.
    pub fn stdin() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Option<io::Result<String>> {
        self.rx.recv().await
    }
}

/// Run the session to completion, reading commands from `input`. AI turns
/// are played out by `runner`; a shutdown request ends the game at the
/// prompt as well as between AI shots.
pub async fn play(
    session: &mut GameSession,
    rng: &mut SmallRng,
    input: &mut LineSource,
    view: &mut dyn GameView,
    runner: &mut AiTurnRunner,
) -> anyhow::Result<PlayOutcome> {
    view.refresh(session);
    loop {
        if let Some(winner) = session.winner() {
            return Ok(PlayOutcome::Finished { winner });
        }
        if session.is_ai_turn() {
            match runner.run(session, rng, view).await? {
                AiTurnOutcome::Cancelled { .. } => return Ok(PlayOutcome::Quit),
                outcome => debug!("AI turn finished: {:?}", outcome),
            }
            continue;
        }

        print!("{}", prompt(session));
        std::io::stdout().flush()?;
        let next = tokio::select! {
            next = input.next_line() => next,
            _ = runner.shutdown_requested() => return Ok(PlayOutcome::Quit),
        };
        let line = match next {
            None => return Ok(PlayOutcome::Quit),
            Some(Ok(line)) => line,
            Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                println!("Unreadable input: {}", e);
                continue;
            }
            Some(Err(e)) => return Err(e.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let cmd = match parse_command(trimmed) {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };
        if cmd == Command::Quit {
            return Ok(PlayOutcome::Quit);
        }
        match apply_command(session, rng, cmd) {
            Ok(msg) => {
                if cmd != Command::Help {
                    view.refresh(session);
                }
                println!("{}", msg);
            }
            Err(e) => {
                warn!("rejected {:?}: {}", cmd, e);
                println!("{}", e);
            }
        }
    }
}

#![cfg(feature = "std")]

//! Stderr logger. Lines carry the time since start-up and the module that
//! logged them, so they can be read alongside the game output on stdout.

use log::{self, Level, LevelFilter, Metadata, Record};
use std::env;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const CRATE_TARGET: &str = "tank_battle";

static STARTED: OnceLock<Instant> = OnceLock::new();

struct GameLogger;

/// `tank_battle::ai_turn` becomes `ai_turn`; the crate root becomes `main`.
fn short_target(target: &str) -> &str {
    match target.strip_prefix(CRATE_TARGET) {
        Some("") => "main",
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

fn is_own_target(target: &str) -> bool {
    short_target(target) != target
}

fn format_line(elapsed: Duration, level: Level, target: &str, args: &std::fmt::Arguments) -> String {
    format!(
        "[{:>8.3}s {:<5} {}] {}",
        elapsed.as_secs_f64(),
        level,
        short_target(target),
        args
    )
}

impl log::Log for GameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > log::max_level() {
            return false;
        }
        // Dependencies such as ureq only get through with warnings.
        is_own_target(metadata.target()) || metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let elapsed = STARTED.get_or_init(Instant::now).elapsed();
            eprintln!(
                "{}",
                format_line(elapsed, record.level(), record.target(), record.args())
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: GameLogger = GameLogger;

/// Initialize logging with a level taken from the `TANK_BATTLE_LOG` environment variable.
/// Defaults to `info` if the variable is not set or invalid.
pub fn init_logging() {
    STARTED.get_or_init(Instant::now);
    let level = env::var("TANK_BATTLE_LOG")
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info);
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn line_names_the_module_and_elapsed_time() {
        let line = format_line(
            Duration::from_millis(1500),
            Level::Warn,
            "tank_battle::report",
            &format_args!("failed to save game result: {}", "timeout"),
        );
        assert_eq!(line, "[   1.500s WARN  report] failed to save game result: timeout");
    }

    #[test]
    fn foreign_targets_are_kept_whole() {
        assert_eq!(short_target("tank_battle::cli"), "cli");
        assert_eq!(short_target("tank_battle"), "main");
        assert_eq!(short_target("ureq::unit"), "ureq::unit");
        assert_eq!(short_target("tank_battlefield"), "tank_battlefield");
    }

    #[test]
    fn only_warnings_pass_from_dependencies() {
        log::set_max_level(LevelFilter::Debug);
        let meta = |level, target| Metadata::builder().level(level).target(target).build();
        assert!(LOGGER.enabled(&meta(Level::Debug, "tank_battle::ai_turn")));
        assert!(!LOGGER.enabled(&meta(Level::Debug, "ureq::unit")));
        assert!(LOGGER.enabled(&meta(Level::Warn, "ureq::unit")));
    }
}

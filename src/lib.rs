#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod core;

#[cfg(feature = "std")]
pub mod ai_turn;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod report;
#[cfg(feature = "std")]
pub mod ui;

pub use crate::core::*;

#[cfg(feature = "std")]
pub use ai_turn::{AiTurnOutcome, AiTurnRunner, Pacing};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use report::{report_detached, HttpResultSink, MemoryResultSink, ResultSink};

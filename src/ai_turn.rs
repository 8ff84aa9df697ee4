#![cfg(feature = "std")]

use log::debug;
use rand::rngs::SmallRng;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::core::{
    config::{AI_FIRST_SHOT_DELAY_MS, AI_SHOT_INTERVAL_MS},
    view::GameView,
    GameSession,
};

/// Presentation delays around AI shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub first_shot: Duration,
    pub between_shots: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            first_shot: Duration::from_millis(AI_FIRST_SHOT_DELAY_MS),
            between_shots: Duration::from_millis(AI_SHOT_INTERVAL_MS),
        }
    }
}

impl Pacing {
    /// No delays at all.
    pub fn immediate() -> Self {
        Self {
            first_shot: Duration::ZERO,
            between_shots: Duration::ZERO,
        }
    }
}

/// How an AI turn finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTurnOutcome {
    /// The AI missed and the turn is back with the human.
    Yielded { shots: usize },
    /// The AI's shot ended the game.
    GameOver { shots: usize },
    /// Shutdown was requested while waiting between shots.
    Cancelled { shots: usize },
    /// It was not the AI's turn.
    Skipped,
}

/// Drives the AI's streak: fire, and while it hits, pause and fire again.
///
/// Each pause races the shutdown signal, so a pending delay is dropped the
/// moment shutdown is requested.
pub struct AiTurnRunner {
    pacing: Pacing,
    shutdown: watch::Receiver<bool>,
}

impl AiTurnRunner {
    /// Create a runner and the sender used to request shutdown.
    pub fn new(pacing: Pacing) -> (Self, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                pacing,
                shutdown: rx,
            },
            tx,
        )
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Resolves once shutdown has been requested. Never resolves if the
    /// sender is gone without having asked for it.
    pub async fn shutdown_requested(&mut self) {
        if self.shutdown.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Wait for `delay` unless shutdown arrives first. Returns `false` when
    /// cancelled.
    async fn pause(&mut self, delay: Duration) -> bool {
        if self.is_shutdown() {
            return false;
        }
        if delay.is_zero() {
            return true;
        }
        tokio::select! {
            _ = sleep(delay) => true,
            changed = self.shutdown.changed() => {
                // A dropped sender cannot cancel any more; finish the wait.
                if changed.is_err() {
                    sleep(delay).await;
                    return true;
                }
                !*self.shutdown.borrow()
            }
        }
    }

    /// Play out the AI's whole turn on `session`.
    pub async fn run(
        &mut self,
        session: &mut GameSession,
        rng: &mut SmallRng,
        view: &mut dyn GameView,
    ) -> anyhow::Result<AiTurnOutcome> {
        if !session.is_ai_turn() {
            return Ok(AiTurnOutcome::Skipped);
        }
        if !self.pause(self.pacing.first_shot).await {
            return Ok(AiTurnOutcome::Cancelled { shots: 0 });
        }

        let mut shots = 0;
        loop {
            let report = session.ai_fire(rng)?;
            shots += 1;
            view.refresh(session);
            debug!("AI shot {} at {:?}: hit={}", shots, report.coord, report.hit);
            if report.game_ended {
                return Ok(AiTurnOutcome::GameOver { shots });
            }
            if !report.hit {
                return Ok(AiTurnOutcome::Yielded { shots });
            }
            if !self.pause(self.pacing.between_shots).await {
                return Ok(AiTurnOutcome::Cancelled { shots });
            }
        }
    }
}

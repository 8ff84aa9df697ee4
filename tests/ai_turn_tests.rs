use rand::rngs::SmallRng;
use rand::SeedableRng;
use tank_battle::{
    AiTurnOutcome, AiTurnRunner, Difficulty, GameMode, GameSession, GameView, Nation, NullView,
    Pacing, SideId, GRID_SIZE,
};
use tokio::time::{timeout, Duration, Instant};

struct CountingView {
    refreshes: usize,
}

impl GameView for CountingView {
    fn refresh(&mut self, _session: &GameSession) {
        self.refreshes += 1;
    }
}

/// Battle where the human has just missed, handing the turn to the AI.
fn session_on_ai_turn(rng: &mut SmallRng) -> GameSession {
    loop {
        let mut session = GameSession::new(GameMode::Ai(Difficulty::Nightmare));
        session.select_nation(Nation::German, rng).unwrap();
        session.random_placement(rng).unwrap();
        session.confirm_placement(rng).unwrap();
        for i in 0..GRID_SIZE * GRID_SIZE {
            let report = session.fire((i / GRID_SIZE, i % GRID_SIZE)).unwrap();
            if report.game_ended {
                break;
            }
            if !report.hit {
                return session;
            }
        }
    }
}

#[tokio::test]
async fn test_skips_when_not_ai_turn() {
    let (mut runner, _shutdown) = AiTurnRunner::new(Pacing::immediate());
    let mut rng = SmallRng::seed_from_u64(1);
    let mut session = GameSession::new(GameMode::Ai(Difficulty::Normal));
    let outcome = runner.run(&mut session, &mut rng, &mut NullView).await.unwrap();
    assert_eq!(outcome, AiTurnOutcome::Skipped);
}

#[tokio::test]
async fn test_streak_ends_on_miss_or_game_over() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut session = session_on_ai_turn(&mut rng);
    let (mut runner, _shutdown) = AiTurnRunner::new(Pacing::immediate());
    let mut view = CountingView { refreshes: 0 };

    let outcome = runner.run(&mut session, &mut rng, &mut view).await.unwrap();
    let shots = session.side(SideId::Two).shots().count_ones();
    match outcome {
        AiTurnOutcome::Yielded { shots: n } => {
            assert_eq!(n, shots);
            assert_eq!(session.current(), SideId::One);
            assert!(!session.is_ai_turn());
        }
        AiTurnOutcome::GameOver { shots: n } => {
            assert_eq!(n, shots);
            assert_eq!(session.winner(), Some(SideId::Two));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(view.refreshes, shots);
}

#[tokio::test]
async fn test_shutdown_before_turn_cancels() {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut session = session_on_ai_turn(&mut rng);
    let (mut runner, shutdown) = AiTurnRunner::new(Pacing::default());
    shutdown.send(true).unwrap();

    let outcome = runner.run(&mut session, &mut rng, &mut NullView).await.unwrap();
    assert_eq!(outcome, AiTurnOutcome::Cancelled { shots: 0 });
    assert!(session.side(SideId::Two).shots().is_empty());
    assert!(session.is_ai_turn());
}

#[tokio::test]
async fn test_shutdown_abandons_pending_delay() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut session = session_on_ai_turn(&mut rng);
    let pacing = Pacing {
        first_shot: Duration::from_secs(60),
        between_shots: Duration::from_secs(60),
    };
    let (mut runner, shutdown) = AiTurnRunner::new(pacing);
    assert_eq!(runner.pacing(), pacing);

    let mut view = NullView;
    let started = Instant::now();
    let turn = runner.run(&mut session, &mut rng, &mut view);
    let cancel = async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.send(true).unwrap();
    };
    let (outcome, ()) = timeout(Duration::from_secs(5), async { tokio::join!(turn, cancel) })
        .await
        .expect("pending delay was not abandoned");

    assert_eq!(outcome.unwrap(), AiTurnOutcome::Cancelled { shots: 0 });
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(session.side(SideId::Two).shots().is_empty());
}

#[test]
fn test_default_pacing_constants() {
    let pacing = Pacing::default();
    assert_eq!(pacing.first_shot, Duration::from_millis(1000));
    assert_eq!(pacing.between_shots, Duration::from_millis(600));
    assert_eq!(Pacing::immediate().first_shot, Duration::ZERO);
}

#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::sync::Arc;

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tank_battle::{
    cli::{self, PlayOutcome},
    init_logging, report_detached,
    ui::TerminalView,
    AiTurnRunner, Difficulty, GameMode, GameSession, HttpResultSink, Nation, Pacing, ResultSink,
};
#[cfg(feature = "std")]
use tokio::time::{timeout, Duration};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum Level {
    Normal,
    Hard,
    Nightmare,
}

#[cfg(feature = "std")]
impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Normal => Difficulty::Normal,
            Level::Hard => Difficulty::Hard,
            Level::Nightmare => Difficulty::Nightmare,
        }
    }
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer.
    Ai {
        #[arg(long, value_enum, default_value_t = Level::Normal)]
        difficulty: Level,
        #[arg(long, help = "Pick a nation up front (US, German, USSR, Britain, Japan)")]
        nation: Option<String>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "POST the finished game to this URL")]
        report_url: Option<String>,
        #[arg(long, help = "Skip the delays between AI shots")]
        fast: bool,
    },
    /// Two players sharing one terminal.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "POST the finished game to this URL")]
        report_url: Option<String>,
    },
}

#[cfg(feature = "std")]
fn seeded_rng(seed: Option<u64>) -> SmallRng {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    }
}

#[cfg(feature = "std")]
async fn run_game(
    mode: GameMode,
    nation: Option<Nation>,
    mut rng: SmallRng,
    pacing: Pacing,
    report_url: Option<String>,
) -> anyhow::Result<()> {
    let mut session = GameSession::new(mode);
    if let Some(n) = nation {
        session
            .select_nation(n, &mut rng)
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    println!("{}", cli::HELP);

    let (mut runner, shutdown) = AiTurnRunner::new(pacing);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(true);
        }
    });

    let mut view = TerminalView;
    let mut input = cli::LineSource::stdin();
    let outcome = cli::play(&mut session, &mut rng, &mut input, &mut view, &mut runner).await?;
    ctrl_c.abort();

    match outcome {
        PlayOutcome::Finished { winner } => println!("{} wins!", winner),
        PlayOutcome::Quit => println!("Game abandoned."),
    }

    if let (Some(record), Some(url)) = (session.take_record(), report_url) {
        let sink: Arc<dyn ResultSink> = Arc::new(HttpResultSink::new(url));
        let handle = report_detached(sink, record);
        // Give the upload a moment before the process exits.
        let _ = timeout(Duration::from_secs(5), handle).await;
    }
    Ok(())
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ai {
            difficulty,
            nation,
            seed,
            report_url,
            fast,
        } => {
            let nation = nation
                .map(|n| {
                    n.parse::<Nation>()
                        .map_err(|_| anyhow::anyhow!("unknown nation '{}'", n))
                })
                .transpose()?;
            let pacing = if fast {
                Pacing::immediate()
            } else {
                Pacing::default()
            };
            let mode = GameMode::Ai(difficulty.into());
            println!("Starting {} game...", mode);
            run_game(mode, nation, seeded_rng(seed), pacing, report_url).await?;
        }
        Commands::Local { seed, report_url } => {
            println!("Starting local two-player game...");
            run_game(
                GameMode::LocalTwoPlayer,
                None,
                seeded_rng(seed),
                Pacing::default(),
                report_url,
            )
            .await?;
        }
    }
    Ok(())
}

use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use tank_battle::{
    random_placement, resolve_attack, targeting_for, BitGrid, Board, Difficulty, SideId,
    TurnState,
};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 && args.len() != 5 {
        eprintln!(
            "Usage: {} <seed1> <seed2> [difficulty1 difficulty2]",
            args[0]
        );
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let (d1, d2) = if args.len() == 5 {
        let parse = |s: &str| {
            s.parse::<Difficulty>()
                .map_err(|_| anyhow::anyhow!("unknown difficulty '{}'", s))
        };
        (parse(&args[3])?, parse(&args[4])?)
    } else {
        (Difficulty::Nightmare, Difficulty::Nightmare)
    };

    let mut rngs = [SmallRng::seed_from_u64(seed1), SmallRng::seed_from_u64(seed2)];
    let mut boards = [Board::new(), Board::new()];
    for (board, rng) in boards.iter_mut().zip(rngs.iter_mut()) {
        let report = random_placement(board, rng);
        if !report.is_complete() {
            anyhow::bail!("random placement left {:?} unplaced", report.unplaced);
        }
    }
    let mut shots = [BitGrid::new(), BitGrid::new()];
    let mut strategies = [targeting_for(d1), targeting_for(d2)];
    let mut turn = TurnState::new(SideId::One);

    while let Some(attacker) = turn.attacker() {
        let a = attacker.index();
        let d = attacker.opponent().index();
        let coord = strategies[a]
            .next_target(&mut rngs[a], &shots[a])
            .ok_or_else(|| anyhow::anyhow!("{} ran out of targets", attacker))?;
        let report = resolve_attack(&mut shots[a], &mut boards[d], coord)?;
        strategies[a].observe(&report, &shots[a]);
        turn.apply(&report);
    }

    let winner = match turn.winner() {
        Some(SideId::One) => "player1",
        Some(SideId::Two) => "player2",
        None => anyhow::bail!("battle stopped without a winner"),
    };
    let destroyed = |board: &Board| board.units().iter().filter(|u| u.is_destroyed()).count();

    let result = json!({
        "player1": {"difficulty": d1.as_str(), "shots": shots[0].count_ones(), "units_lost": destroyed(&boards[0])},
        "player2": {"difficulty": d2.as_str(), "shots": shots[1].count_ones(), "units_lost": destroyed(&boards[1])},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

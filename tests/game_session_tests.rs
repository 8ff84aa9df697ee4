use rand::rngs::SmallRng;
use rand::SeedableRng;
use tank_battle::{
    CombatError, Difficulty, GameError, GameMode, GameSession, Nation, Orientation, Phase,
    PlacementError, SideId, UnitKind, GRID_SIZE, TOTAL_UNITS,
};

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(2024)
}

/// AI session with the human fleet placed and the battle started.
fn ai_battle(difficulty: Difficulty, rng: &mut SmallRng) -> GameSession {
    let mut session = GameSession::new(GameMode::Ai(difficulty));
    session.select_nation(Nation::Us, rng).unwrap();
    assert!(session.random_placement(rng).unwrap().is_complete());
    assert_eq!(session.confirm_placement(rng).unwrap(), Phase::Battle);
    session
}

/// Human fires row-major; the AI answers on its turns.
fn play_out(session: &mut GameSession, rng: &mut SmallRng) -> SideId {
    let mut next = 0;
    while session.winner().is_none() {
        if session.is_ai_turn() {
            session.ai_fire(rng).unwrap();
        } else {
            let coord = (next / GRID_SIZE, next % GRID_SIZE);
            next += 1;
            session.fire(coord).unwrap();
        }
    }
    session.winner().unwrap()
}

#[test]
fn test_phase_gates() {
    let mut rng = rng();
    let mut session = GameSession::new(GameMode::Ai(Difficulty::Normal));
    assert_eq!(session.phase(), Phase::NationSelection);
    assert_eq!(session.fire((0, 0)), Err(GameError::WrongPhase));
    assert_eq!(session.select_unit(UnitKind::LightTank), Err(GameError::WrongPhase));
    session.select_nation(Nation::German, &mut rng).unwrap();
    assert_eq!(session.phase(), Phase::Placement);
    assert_eq!(
        session.select_nation(Nation::Us, &mut rng),
        Err(GameError::WrongPhase)
    );
    assert_eq!(session.fire((0, 0)), Err(GameError::WrongPhase));
}

#[test]
fn test_ai_takes_a_different_nation() {
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut session = GameSession::new(GameMode::Ai(Difficulty::Hard));
        session.select_nation(Nation::Ussr, &mut rng).unwrap();
        let ai_nation = session.side(SideId::Two).nation().unwrap();
        assert_ne!(ai_nation, Nation::Ussr);
    }
}

#[test]
fn test_manual_placement_flow() {
    let mut rng = rng();
    let mut session = GameSession::new(GameMode::Ai(Difficulty::Normal));
    session.select_nation(Nation::Britain, &mut rng).unwrap();

    assert_eq!(session.place((0, 0)), Err(GameError::NoUnitSelected));
    session.select_unit(UnitKind::CommandTank).unwrap();
    assert_eq!(session.rotate(), Orientation::Vertical);
    let preview = session.preview_placement((18, 0)).unwrap();
    assert!(!preview.valid);
    session.set_orientation(Orientation::Horizontal);
    session.place((0, 0)).unwrap();
    assert_eq!(session.selected_unit(), None);

    let progress = session.roster_progress();
    let command = progress.iter().find(|p| p.kind == UnitKind::CommandTank).unwrap();
    assert_eq!((command.placed, command.required), (1, 1));
    assert_eq!(
        session.select_unit(UnitKind::CommandTank),
        Err(GameError::Placement(PlacementError::RosterExceeded {
            kind: UnitKind::CommandTank
        }))
    );

    session.select_unit(UnitKind::LightTank).unwrap();
    assert_eq!(
        session.place((0, 1)),
        Err(GameError::Placement(PlacementError::Overlap))
    );
    // A failed placement keeps the selection.
    assert_eq!(session.selected_unit(), Some(UnitKind::LightTank));

    assert_eq!(
        session.confirm_placement(&mut rng),
        Err(GameError::PlacementIncomplete {
            placed: 1,
            required: TOTAL_UNITS
        })
    );
    session.clear_board().unwrap();
    assert!(session.side(SideId::One).board().units().is_empty());
}

#[test]
fn test_ai_fleet_fielded_on_confirm() {
    let mut rng = rng();
    let session = ai_battle(Difficulty::Nightmare, &mut rng);
    assert_eq!(session.side(SideId::Two).board().units().len(), TOTAL_UNITS);
    assert_eq!(session.current(), SideId::One);
    assert!(!session.is_ai_turn());
    assert!(session.is_ai(SideId::Two));
}

#[test]
fn test_turn_passes_on_miss_only() {
    let mut rng = rng();
    let mut session = ai_battle(Difficulty::Normal, &mut rng);
    let mut next = 0;
    loop {
        let coord = (next / GRID_SIZE, next % GRID_SIZE);
        next += 1;
        let report = session.fire(coord).unwrap();
        if report.game_ended {
            return;
        }
        if !report.hit {
            break;
        }
        assert_eq!(session.current(), SideId::One);
    }
    assert!(session.is_ai_turn());
    assert_eq!(session.fire((19, 19)), Err(GameError::NotYourTurn));
    session.ai_fire(&mut rng).unwrap();
}

#[test]
fn test_duplicate_fire_keeps_turn() {
    let mut rng = rng();
    let mut session = ai_battle(Difficulty::Normal, &mut rng);
    // A hit keeps the turn with player one.
    let target = session.side(SideId::Two).board().units()[1].anchor();
    session.fire(target).unwrap();
    assert_eq!(session.current(), SideId::One);
    assert_eq!(
        session.fire(target),
        Err(GameError::Combat(CombatError::DuplicateShot {
            row: target.0,
            col: target.1
        }))
    );
    assert_eq!(session.current(), SideId::One);
    assert_eq!(session.side(SideId::One).shots().count_ones(), 1);
}

#[test]
fn test_full_ai_game_and_single_record() {
    let mut rng = rng();
    let mut session = ai_battle(Difficulty::Hard, &mut rng);
    assert_eq!(session.take_record(), None);
    let winner = play_out(&mut session, &mut rng);
    assert_eq!(session.phase(), Phase::Ended { winner });
    assert_eq!(session.fire((0, 0)), Err(GameError::WrongPhase));

    let record = session.take_record().unwrap();
    assert_eq!(record.winner, winner.number());
    assert_eq!(record.game_mode, GameMode::Ai(Difficulty::Hard));
    assert_eq!(record.side1_nation, Some(Nation::Us));
    assert_eq!(session.take_record(), None);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["player1_nation"], "US");
    assert_eq!(json["game_mode"], "ai-hard");
    assert!(json["player2_nation"].is_string());
    assert_eq!(json["winner"], winner.number());
}

#[test]
fn test_local_two_player_flow() {
    let mut rng = rng();
    let mut session = GameSession::new(GameMode::LocalTwoPlayer);
    session.select_nation(Nation::Japan, &mut rng).unwrap();
    assert_eq!(session.side(SideId::Two).nation(), None);
    session.random_placement(&mut rng).unwrap();
    assert_eq!(
        session.confirm_placement(&mut rng).unwrap(),
        Phase::NationSelection
    );
    assert_eq!(session.current(), SideId::Two);

    session.select_nation(Nation::German, &mut rng).unwrap();
    assert_eq!(session.side(SideId::Two).board().units().len(), 0);
    session.random_placement(&mut rng).unwrap();
    assert_eq!(session.confirm_placement(&mut rng).unwrap(), Phase::Battle);
    assert_eq!(session.current(), SideId::One);
    assert_eq!(session.ai_fire(&mut rng), Err(GameError::NotAiGame));

    // Both sides fire row-major until someone wins.
    let mut next = [0usize; 2];
    while session.winner().is_none() {
        let side = session.current().index();
        let coord = (next[side] / GRID_SIZE, next[side] % GRID_SIZE);
        next[side] += 1;
        session.fire(coord).unwrap();
    }
    let record = session.take_record().unwrap();
    assert_eq!(record.game_mode, GameMode::LocalTwoPlayer);
    assert_eq!(record.side2_nation, Some(Nation::German));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["game_mode"], "2player");
}

#[test]
fn test_views_hide_unshot_cells() {
    let mut rng = rng();
    let mut session = ai_battle(Difficulty::Normal, &mut rng);
    let target = session.side(SideId::Two).board().units()[0].anchor();
    let kind = session.side(SideId::Two).board().units()[0].kind();
    session.fire(target).unwrap();

    let view = session.target_view(SideId::One);
    let shown: usize = view.iter().flatten().filter(|c| c.mark.is_some()).count();
    assert_eq!(shown, 1);
    assert_eq!(view[target.0][target.1].occupant, Some(kind));
    assert_eq!(
        view.iter().flatten().filter(|c| c.occupant.is_some()).count(),
        1
    );

    let fleet = session.fleet_view(SideId::Two);
    assert_eq!(
        fleet.iter().flatten().filter(|c| c.occupant.is_some()).count(),
        tank_battle::TOTAL_UNIT_CELLS
    );

    let tally = session.unit_tally(SideId::Two);
    assert!(tally.iter().all(|t| t.alive <= t.total));
    assert_eq!(tally.iter().map(|t| t.total).sum::<usize>(), TOTAL_UNITS);
}

#[test]
fn test_mode_strings() {
    for mode in [
        GameMode::LocalTwoPlayer,
        GameMode::Ai(Difficulty::Normal),
        GameMode::Ai(Difficulty::Hard),
        GameMode::Ai(Difficulty::Nightmare),
    ] {
        assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
    }
    assert!("ai-easy".parse::<GameMode>().is_err());
    assert_eq!("ussr".parse::<Nation>(), Ok(Nation::Ussr));
}

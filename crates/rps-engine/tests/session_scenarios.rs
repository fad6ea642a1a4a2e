use std::time::Duration;

use rps_engine::{
    EngineConfig, MatchError, MatchEvent, MatchOutcome, Move, OpponentStrategy, RoundEvent,
    RoundOutcome, RoundPhase, Session, SessionEvent,
};

const LONG: Duration = Duration::from_secs(60);

fn session(seed: u64) -> Session {
    Session::new(EngineConfig::default(), seed).unwrap()
}

fn to_selecting(session: &mut Session) {
    for _ in 0..4 {
        if session.phase() == RoundPhase::Selecting {
            return;
        }
        session.advance(LONG);
    }
    panic!("never reached Selecting, stuck in {}", session.phase());
}

/// Play one round, picking the player's move from the opponent's hidden move.
fn play_round(session: &mut Session, pick: impl Fn(Move) -> Move) -> RoundOutcome {
    to_selecting(session);
    let opponent = session.machine().opponent_move();
    assert!(session.submit_move(pick(opponent)));
    session.machine().last_outcome().unwrap()
}

fn win(opponent: Move) -> Move {
    opponent.counter()
}

fn lose(opponent: Move) -> Move {
    opponent.counter().counter()
}

fn draw(opponent: Move) -> Move {
    opponent
}

#[test]
fn test_three_wins_end_in_victory() {
    let mut session = session(1);
    session.start_match();

    for _ in 0..3 {
        assert_eq!(play_round(&mut session, win), RoundOutcome::Win);
    }
    assert_eq!(session.advance(LONG), RoundPhase::MatchEnd);

    let battle = &session.ledgers().battle;
    assert_eq!(battle.opponent_hp(), 0);
    assert_eq!(battle.player_hp(), 30);
    assert_eq!(battle.current_round(), 3);
    assert_eq!(session.match_outcome(), Some(MatchOutcome::Victory));
}

#[test]
fn test_three_losses_end_in_defeat() {
    let mut session = session(2);
    session.start_match();

    for _ in 0..3 {
        assert_eq!(play_round(&mut session, lose), RoundOutcome::Lose);
    }
    assert_eq!(session.advance(LONG), RoundPhase::MatchEnd);
    assert_eq!(session.match_outcome(), Some(MatchOutcome::Defeat));
    assert_eq!(session.ledgers().streak.current_streak(), 0);
    assert_eq!(session.ledgers().rank.current_points(), 0);
}

#[test]
fn test_match_end_is_terminal() {
    let mut session = session(3);
    session.start_match();
    for _ in 0..3 {
        play_round(&mut session, win);
    }
    session.advance(LONG);

    assert_eq!(session.advance(LONG), RoundPhase::MatchEnd);
    assert!(!session.submit_move(Move::Rock));
    assert_eq!(
        session.ledgers_mut().battle.start_next_round(),
        Err(MatchError::AlreadyEnded { round: 3 })
    );
}

#[test]
fn test_timeout_proceeds_like_manual_pick() {
    let mut session = session(4);
    let log = session.record_events();
    session.start_match();
    to_selecting(&mut session);
    log.drain();

    assert_eq!(
        session.advance(Duration::from_millis(4_999)),
        RoundPhase::Selecting
    );
    assert_eq!(session.advance(Duration::from_millis(1)), RoundPhase::Revealing);

    let auto_move = session.machine().player_move();
    assert!(auto_move.is_playable());
    assert!(session.machine().was_auto_selected());

    let events = log.drain();
    assert_eq!(
        events.first(),
        Some(&SessionEvent::Round(RoundEvent::PlayerMoveSelected {
            player_move: auto_move,
            auto: true,
        }))
    );
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Match(MatchEvent::RoundEnded { round: 1, .. })
    )));
    assert_eq!(session.ledgers().patterns.total_moves(), 1);
}

#[test]
fn test_streak_and_rewards_across_rounds() {
    let config = EngineConfig {
        battle: rps_engine::BattleConfig {
            max_hp: 100,
            damage_per_round: 10,
        },
        ..EngineConfig::default()
    };
    let mut session = Session::new(config, 5).unwrap();
    session.start_match();

    for _ in 0..3 {
        play_round(&mut session, win);
    }
    let ledgers = session.ledgers();
    assert_eq!(ledgers.streak.current_streak(), 3);
    assert_eq!(ledgers.streak.current_multiplier(), 3);
    // 20*1 + 20*2 + 20*3
    assert_eq!(ledgers.rank.current_points(), 120);
    // 100 start + (10+10) + (10+20) + (10+30)
    assert_eq!(ledgers.rewards.gold(), 190);

    assert_eq!(play_round(&mut session, draw), RoundOutcome::Draw);
    assert_eq!(session.ledgers().streak.current_streak(), 3);
    assert_eq!(session.ledgers().rank.current_points(), 125);

    assert_eq!(play_round(&mut session, lose), RoundOutcome::Lose);
    assert_eq!(session.ledgers().streak.current_streak(), 0);
    assert_eq!(session.ledgers().rank.current_points(), 110);
    assert_eq!(session.ledgers().rewards.gold(), 190);
}

#[test]
fn test_restart_keeps_progression() {
    let mut session = session(6);
    session.start_match();
    play_round(&mut session, win);
    play_round(&mut session, win);

    session.restart();

    assert_eq!(session.phase(), RoundPhase::Analysis);
    assert_eq!(session.ledgers().battle.current_round(), 1);
    assert_eq!(session.ledgers().battle.opponent_hp(), 30);
    assert_eq!(session.ledgers().streak.current_streak(), 2);
    assert_eq!(session.ledgers().rank.current_points(), 60);
    assert_eq!(session.ledgers().patterns.total_moves(), 2);
    assert_eq!(session.machine().last_outcome(), None);

    session.reset_progress();
    assert_eq!(session.ledgers().streak.current_streak(), 0);
    assert_eq!(session.ledgers().rank.current_points(), 0);
    assert_eq!(session.ledgers().rewards.gold(), 100);
    assert_eq!(session.ledgers().patterns.total_moves(), 0);
}

#[test]
fn test_double_knockout_mid_round_is_defeat() {
    let mut session = session(7);
    let log = session.record_events();
    session.start_match();
    to_selecting(&mut session);

    assert_eq!(
        session.ledgers_mut().battle.set_hp(0, 0),
        Some(MatchOutcome::Defeat)
    );
    session.submit_move(Move::Rock);
    assert_eq!(session.machine().last_outcome(), None);
    assert_eq!(session.advance(LONG), RoundPhase::MatchEnd);
    assert_eq!(session.match_outcome(), Some(MatchOutcome::Defeat));

    let ended: Vec<_> = log
        .drain()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::Match(MatchEvent::MatchEnded { .. })))
        .collect();
    assert_eq!(ended.len(), 1);
}

#[test]
fn test_same_seed_replays_identically() {
    fn run(seed: u64) -> Vec<SessionEvent> {
        let mut session = session(seed);
        let log = session.record_events();
        session.start_match();
        for _ in 0..5000 {
            if session.advance(Duration::from_millis(250)) == RoundPhase::MatchEnd {
                break;
            }
        }
        log.drain()
    }

    let a = run(99);
    let b = run(99);
    assert_eq!(a, b);
    assert!(a
        .iter()
        .any(|e| matches!(e, SessionEvent::Match(MatchEvent::MatchEnded { .. }))));
}

#[test]
fn test_cycling_opponent_is_predictable() {
    let config = EngineConfig {
        opponent: OpponentStrategy::Cycling,
        ..EngineConfig::default()
    };
    let mut session = Session::new(config, 8).unwrap();
    session.start_match();

    to_selecting(&mut session);
    let first = session.machine().opponent_move();
    session.submit_move(draw(first));

    to_selecting(&mut session);
    assert_eq!(session.machine().opponent_move(), first.counter());
}

#[test]
fn test_three_win_rank_scenario_stays_bronze() {
    let mut session = session(9);
    session.start_match();
    for _ in 0..3 {
        play_round(&mut session, win);
    }
    assert_eq!(session.ledgers().rank.current_tier(), rps_engine::RankTier::Bronze);
    assert_eq!(session.snapshot().points_to_next_tier, 380);
}

use cargo_push::core::{
    resolve_timeout, threshold_winner, ActionError, DieFace, Direction, EndReason,
    LocalTransition, Match, MatchRules, PeerError, Phase, RemoteApplied, Side, TickOutcome,
    Verdict, Winner,
};

fn face(v: u8) -> DieFace {
    DieFace::new(v).unwrap()
}

fn long_rules() -> MatchRules {
    MatchRules {
        turn_clock_ticks: 1_000,
        move_clock_ticks: 5,
    }
}

/// Local turn: roll `value` and push `lane`.
fn local_turn(m: &mut Match, value: u8, lane: usize) -> LocalTransition {
    m.roll_dice(face(value)).unwrap();
    m.apply_move(lane).unwrap()
}

/// Remote turn announced by a player-2 peer, then the settle gate.
fn remote_turn(m: &mut Match, seq: &mut u64, value: u8, lane: u8) {
    assert_eq!(m.apply_remote_roll(value), Ok(RemoteApplied::Applied));
    assert_eq!(
        m.apply_remote_move(*seq, lane, value, false),
        Ok(RemoteApplied::Applied)
    );
    *seq += 1;
    m.settle();
}

#[test]
fn goal_lane_wins_outright() {
    let lanes = [30, 10, -5];
    assert_eq!(threshold_winner(&lanes), Some((0, Direction::Positive)));
    assert_eq!(resolve_timeout(&[5, -5, 0]), Verdict::Draw);
}

#[test]
fn reaching_the_goal_ends_the_match_for_local() {
    let mut m = Match::new(Direction::Positive, Side::Local, long_rules());
    let mut seq = 0;
    let plan: [(u8, usize); 8] = [(5, 1), (5, 1), (5, 0), (5, 0), (5, 0), (5, 0), (5, 0), (5, 0)];
    for (i, (value, lane)) in plan.iter().enumerate() {
        local_turn(&mut m, *value, *lane);
        if m.is_over() {
            break;
        }
        if i < 5 {
            remote_turn(&mut m, &mut seq, 1, 2);
        } else {
            m.apply_remote_turn_change(false).unwrap();
        }
    }
    let outcome = *m.outcome().expect("match should be over");
    assert_eq!(outcome.lanes, [30, 10, -5]);
    assert_eq!(outcome.winner, Winner::Local);
    assert_eq!(outcome.reason, EndReason::Threshold { lane: 0 });
    assert_eq!(m.phase(), Phase::Resolved);
    assert_eq!(m.roll_dice(face(1)), Err(ActionError::MatchOver));
}

#[test]
fn remote_reaching_its_goal_wins_for_remote() {
    let mut m = Match::new(Direction::Positive, Side::Remote, long_rules());
    let mut seq = 0;
    for value in [6, 6, 5] {
        remote_turn(&mut m, &mut seq, value, 1);
    }
    local_turn(&mut m, 1, 0);
    for value in [6, 6, 1] {
        remote_turn(&mut m, &mut seq, value, 1);
    }
    assert_eq!(m.lanes(), [1, -30, 0]);
    let outcome = m.outcome().unwrap();
    assert_eq!(outcome.winner, Winner::Remote);
    assert_eq!(outcome.reason, EndReason::Threshold { lane: 1 });
}

#[test]
fn expired_clock_with_mirrored_lanes_is_a_draw() {
    let rules = MatchRules {
        turn_clock_ticks: 3,
        move_clock_ticks: 10,
    };
    let mut m = Match::new(Direction::Positive, Side::Local, rules);
    let mut seq = 0;
    local_turn(&mut m, 5, 0);
    remote_turn(&mut m, &mut seq, 5, 1);
    assert_eq!(m.lanes(), [5, -5, 0]);
    assert_eq!(m.phase(), Phase::Rolling(Side::Local));

    assert_eq!(m.tick(), TickOutcome::Idle);
    assert_eq!(m.tick(), TickOutcome::Idle);
    match m.tick() {
        TickOutcome::Resolved(outcome) => {
            assert_eq!(outcome.winner, Winner::Draw);
            assert_eq!(outcome.reason, EndReason::ClockExpired(Side::Local));
            assert_eq!(outcome.lanes, [5, -5, 0]);
        }
        other => panic!("expected resolution, got {:?}", other),
    }
}

#[test]
fn turn_clocks_are_cumulative() {
    let rules = MatchRules {
        turn_clock_ticks: 4,
        move_clock_ticks: 10,
    };
    let mut m = Match::new(Direction::Negative, Side::Local, rules);
    m.roll_dice(face(2)).unwrap();
    m.tick();
    m.tick();
    m.apply_move(0).unwrap();
    assert_eq!(m.clock(Side::Local), 2);
    assert_eq!(m.phase(), Phase::Rolling(Side::Remote));
    m.tick();
    assert_eq!(m.clock(Side::Remote), 3);
    assert_eq!(m.clock(Side::Local), 2);
    m.apply_remote_roll(3).unwrap();
    m.apply_remote_move(0, 1, 3, true).unwrap();
    m.settle();
    m.tick();
    match m.tick() {
        TickOutcome::Resolved(outcome) => {
            // [-2, 3, 0]: one lane each, positive displacement is larger
            assert_eq!(outcome.winner, Winner::Remote);
            assert_eq!(outcome.reason, EndReason::ClockExpired(Side::Local));
        }
        other => panic!("expected resolution, got {:?}", other),
    }
}

#[test]
fn six_keeps_the_turn_and_non_six_resets_only_that_side() {
    let mut m = Match::new(Direction::Positive, Side::Local, long_rules());
    let t = local_turn(&mut m, 6, 2);
    assert!(matches!(t, LocalTransition::Moved { lanes: [0, 0, 6], .. }));
    assert_eq!(m.phase(), Phase::Rolling(Side::Local));
    assert_eq!(m.pending(Side::Local), None);
    assert_eq!(m.consecutive_sixes(Side::Local), 1);

    local_turn(&mut m, 2, 2);
    assert_eq!(m.consecutive_sixes(Side::Local), 0);
    assert_eq!(m.phase(), Phase::Rolling(Side::Remote));

    // the remote side keeps its own count
    m.apply_remote_roll(6).unwrap();
    m.apply_remote_move(0, 0, 6, false).unwrap();
    assert_eq!(m.phase(), Phase::Settling(Side::Remote));
    assert_eq!(m.consecutive_sixes(Side::Remote), 1);
    assert_eq!(m.consecutive_sixes(Side::Local), 0);
}

#[test]
fn third_consecutive_six_voids_the_roll() {
    let mut m = Match::new(Direction::Positive, Side::Local, long_rules());
    local_turn(&mut m, 6, 0);
    local_turn(&mut m, 6, 0);
    assert_eq!(m.lanes(), [12, 0, 0]);
    assert_eq!(m.roll_dice(DieFace::SIX), Ok(LocalTransition::TurnPassed));
    assert_eq!(m.lanes(), [12, 0, 0]);
    assert_eq!(m.phase(), Phase::Rolling(Side::Remote));
    assert_eq!(m.consecutive_sixes(Side::Local), 0);
    assert_eq!(m.apply_move(0), Err(ActionError::NotYourTurn));
}

#[test]
fn move_clock_expiry_passes_the_turn_only() {
    let rules = MatchRules {
        turn_clock_ticks: 100,
        move_clock_ticks: 2,
    };
    let mut m = Match::new(Direction::Positive, Side::Local, rules);
    m.roll_dice(face(4)).unwrap();
    assert_eq!(m.move_clock(), Some(2));
    assert_eq!(m.tick(), TickOutcome::Idle);
    assert_eq!(m.tick(), TickOutcome::MoveForfeited);
    assert_eq!(m.pending(Side::Local), None);
    assert_eq!(m.phase(), Phase::Rolling(Side::Remote));
    assert!(!m.is_over());
    assert_eq!(m.clock(Side::Local), 98);
}

#[test]
fn settling_gate_blocks_local_roll() {
    let mut m = Match::new(Direction::Negative, Side::Remote, long_rules());
    m.apply_remote_roll(3).unwrap();
    m.apply_remote_move(0, 0, 3, true).unwrap();
    assert_eq!(m.phase(), Phase::Settling(Side::Local));
    assert!(!m.awaiting_local_input());
    assert_eq!(m.roll_dice(face(1)), Err(ActionError::Settling));
    assert_eq!(m.settle(), Some(Side::Local));
    assert!(m.awaiting_local_input());
    assert!(m.roll_dice(face(1)).is_ok());
}

#[test]
fn remote_roll_completes_remote_settle() {
    let mut m = Match::new(Direction::Negative, Side::Remote, long_rules());
    m.apply_remote_roll(6).unwrap();
    m.apply_remote_move(0, 0, 6, true).unwrap();
    assert_eq!(m.phase(), Phase::Settling(Side::Remote));
    assert_eq!(m.apply_remote_roll(2), Ok(RemoteApplied::Applied));
    assert_eq!(m.phase(), Phase::Moving(Side::Remote, face(2)));
}

#[test]
fn remote_actions_out_of_turn_are_rejected() {
    let mut m = Match::new(Direction::Positive, Side::Local, long_rules());
    assert_eq!(m.apply_remote_roll(3), Err(PeerError::OutOfTurn));
    assert_eq!(m.apply_remote_move(0, 0, 3, false), Err(PeerError::OutOfTurn));
    assert_eq!(m.apply_remote_roll(9), Err(PeerError::InvalidFace(9)));
    assert_eq!(m.lanes(), [0, 0, 0]);
    assert_eq!(m.phase(), Phase::Rolling(Side::Local));
}

#[test]
fn peer_loss_resolves_on_the_current_snapshot() {
    let mut m = Match::new(Direction::Negative, Side::Local, long_rules());
    local_turn(&mut m, 4, 0);
    local_turn_after_pass(&mut m, 3, 1);
    let outcome = m.force_timeout().unwrap();
    assert_eq!(outcome.lanes, [-4, -3, 0]);
    assert_eq!(outcome.winner, Winner::Local);
    assert_eq!(outcome.reason, EndReason::PeerLost);
    assert_eq!(m.tick(), TickOutcome::Idle);
}

fn local_turn_after_pass(m: &mut Match, value: u8, lane: usize) {
    m.apply_remote_turn_change(false).unwrap();
    local_turn(m, value, lane);
}

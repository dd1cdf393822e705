use cargo_push::core::{
    resolve_timeout, tally, threshold_winner, Applied, DieFace, Direction, LaneLedger, Match,
    MatchRules, MoveId, Phase, RollOutcome, Side, TurnMachine, Verdict, MAX_DISTANCE, NUM_LANES,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn lane_strategy() -> impl Strategy<Value = [i8; NUM_LANES]> {
    prop::array::uniform3(-29i8..=29)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn positions_stay_on_the_track(
        moves in prop::collection::vec((0..NUM_LANES, -6i8..=6, any::<bool>()), 0..200)
    ) {
        let mut ledger = LaneLedger::new();
        let mut seqs = [0u64; 2];
        for (lane, delta, local) in moves {
            let side = if local { Side::Local } else { Side::Remote };
            let idx = if local { 0 } else { 1 };
            let id = MoveId::new(side, seqs[idx]);
            seqs[idx] += 1;
            let applied = ledger.apply_delta(id, lane, delta).unwrap();
            prop_assert!(matches!(applied, Applied::Moved(_)));
            for pos in ledger.snapshot() {
                prop_assert!((-MAX_DISTANCE..=MAX_DISTANCE).contains(&pos));
            }
        }
    }

    #[test]
    fn replayed_move_id_is_applied_once(lane in 0..NUM_LANES, delta in -6i8..=6, seq in any::<u64>()) {
        let mut ledger = LaneLedger::new();
        let id = MoveId::new(Side::Remote, seq);
        let first = ledger.apply_delta(id, lane, delta).unwrap();
        let second = ledger.apply_delta(id, lane, delta).unwrap();
        prop_assert_eq!(second, Applied::Duplicate(first.lanes()));
        prop_assert_eq!(ledger.snapshot(), first.lanes());
    }

    #[test]
    fn goal_lane_wins_regardless_of_others(others in lane_strategy(), lane in 0..NUM_LANES, positive in any::<bool>()) {
        let mut lanes = others;
        let direction = if positive { Direction::Positive } else { Direction::Negative };
        lanes[lane] = direction.goal();
        prop_assert_eq!(threshold_winner(&lanes), Some((lane, direction)));
    }

    #[test]
    fn timeout_verdict_follows_tie_break_order(lanes in lane_strategy()) {
        let t = tally(&lanes);
        let expected = if t.positive_lanes != t.negative_lanes {
            if t.positive_lanes > t.negative_lanes {
                Verdict::Winner(Direction::Positive)
            } else {
                Verdict::Winner(Direction::Negative)
            }
        } else if t.positive_distance != t.negative_distance {
            if t.positive_distance > t.negative_distance {
                Verdict::Winner(Direction::Positive)
            } else {
                Verdict::Winner(Direction::Negative)
            }
        } else {
            Verdict::Draw
        };
        prop_assert_eq!(resolve_timeout(&lanes), expected);
    }

    #[test]
    fn third_six_never_moves_a_lane(seed in any::<u64>(), first_local in any::<bool>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let first = if first_local { Side::Local } else { Side::Remote };
        let mut m = Match::new(Direction::Positive, Side::Local, MatchRules::default());
        // a few ordinary local turns first
        for _ in 0..3 {
            let face = loop {
                let f = DieFace::roll(&mut rng);
                if !f.is_six() {
                    break f;
                }
            };
            m.roll_dice(face).unwrap();
            m.apply_move(0).unwrap();
            m.apply_remote_turn_change(false).unwrap();
        }
        let mut t = TurnMachine::new(first);
        t.roll(first, DieFace::SIX).unwrap();
        t.complete_move(first, DieFace::SIX);
        t.roll(first, DieFace::SIX).unwrap();
        t.complete_move(first, DieFace::SIX);
        prop_assert_eq!(t.roll(first, DieFace::SIX), Ok(RollOutcome::Penalty));
        prop_assert_eq!(t.phase(), Phase::Rolling(first.opponent()));

        let before = m.lanes();
        for _ in 0..2 {
            m.roll_dice(DieFace::SIX).unwrap();
            m.apply_move(1).unwrap();
        }
        let after_two = m.lanes();
        prop_assert_eq!(after_two[1], before[1] + 12);
        m.roll_dice(DieFace::SIX).unwrap();
        prop_assert_eq!(m.lanes(), after_two);
        prop_assert_eq!(m.phase(), Phase::Rolling(Side::Remote));
        prop_assert_eq!(m.pending(Side::Local), None);
    }
}

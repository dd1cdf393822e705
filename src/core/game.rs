use super::{
    clock::Countdown,
    common::{ActionError, Direction, PeerError, Side},
    config::{
        DRAW_SCORE, LOSS_SCORE, MOVE_CLOCK_TICKS, NUM_LANES, TURN_CLOCK_TICKS, WIN_SCORE,
    },
    dice::DieFace,
    ledger::{Applied, LaneLedger, Lanes, MoveId},
    resolver::{self, Verdict},
    turn::{Phase, RollOutcome, TurnMachine},
};

/// Clock lengths, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    pub turn_clock_ticks: u32,
    pub move_clock_ticks: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            turn_clock_ticks: TURN_CLOCK_TICKS,
            move_clock_ticks: MOVE_CLOCK_TICKS,
        }
    }
}

/// Winner of a finished match, from the local point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Winner {
    Local,
    Remote,
    Draw,
}

impl Winner {
    /// Score earned by the local player.
    pub fn score(self) -> u32 {
        match self {
            Winner::Local => WIN_SCORE,
            Winner::Remote => LOSS_SCORE,
            Winner::Draw => DRAW_SCORE,
        }
    }

    /// Finishing place of the local player. A draw shares first place.
    pub fn rank(self) -> u8 {
        match self {
            Winner::Remote => 2,
            Winner::Local | Winner::Draw => 1,
        }
    }
}

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A lane reached a goal.
    Threshold { lane: usize },
    /// The given side's turn clock ran out.
    ClockExpired(Side),
    /// The peer left or the connection was lost.
    PeerLost,
}

/// Final result. Created once, never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Winner,
    pub lanes: Lanes,
    pub reason: EndReason,
}

/// A local state transition. Each one is announced to the peer as exactly
/// one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTransition {
    DiceRolled(DieFace),
    Moved {
        lane: usize,
        face: DieFace,
        lanes: Lanes,
    },
    /// The local turn ended without a move (penalty or move clock).
    TurnPassed,
}

/// How an inbound remote action was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteApplied {
    Applied,
    Duplicate,
}

/// What a clock tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    /// The local move clock ran out; the pending roll was forfeited.
    MoveForfeited,
    Resolved(MatchOutcome),
}

/// Read-only summary handed to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchView {
    pub lanes: Lanes,
    pub direction: Direction,
    pub phase: Phase,
    pub local_clock: u32,
    pub remote_clock: u32,
    pub move_clock: Option<u32>,
}

impl MatchView {
    pub fn pending(&self) -> Option<DieFace> {
        match self.phase {
            Phase::Moving(Side::Local, face) => Some(face),
            _ => None,
        }
    }
}

/// One peer's view of a Cargo Push match.
///
/// Lane positions are absolute: `+30` is player 1's goal on both peers. The
/// local push direction is fixed at construction and used for every local
/// delta.
#[derive(Debug, Clone)]
pub struct Match {
    rules: MatchRules,
    direction: Direction,
    ledger: LaneLedger,
    turn: TurnMachine,
    turn_clocks: [Countdown; 2],
    move_clock: Option<Countdown>,
    local_moves: u64,
    ticks: u64,
    outcome: Option<MatchOutcome>,
}

impl Match {
    /// Start a match. `first` is the side that rolls first.
    pub fn new(direction: Direction, first: Side, rules: MatchRules) -> Self {
        Self {
            rules,
            direction,
            ledger: LaneLedger::new(),
            turn: TurnMachine::new(first),
            turn_clocks: [Countdown::new(rules.turn_clock_ticks); 2],
            move_clock: None,
            local_moves: 0,
            ticks: 0,
            outcome: None,
        }
    }

    pub fn lanes(&self) -> Lanes {
        self.ledger.snapshot()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn pending(&self, side: Side) -> Option<DieFace> {
        self.turn.pending(side)
    }

    pub fn consecutive_sixes(&self, side: Side) -> u8 {
        self.turn.consecutive_sixes(side)
    }

    pub fn clock(&self, side: Side) -> u32 {
        self.turn_clocks[side.index()].remaining()
    }

    pub fn move_clock(&self) -> Option<u32> {
        self.move_clock.map(|c| c.remaining())
    }

    /// Ticks elapsed since the match started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the local player may roll or choose a lane right now.
    pub fn awaiting_local_input(&self) -> bool {
        matches!(
            self.turn.phase(),
            Phase::Rolling(Side::Local) | Phase::Moving(Side::Local, _)
        )
    }

    pub fn view(&self) -> MatchView {
        MatchView {
            lanes: self.lanes(),
            direction: self.direction,
            phase: self.phase(),
            local_clock: self.clock(Side::Local),
            remote_clock: self.clock(Side::Remote),
            move_clock: self.move_clock(),
        }
    }

    fn winner_for(&self, direction: Direction) -> Winner {
        if direction == self.direction {
            Winner::Local
        } else {
            Winner::Remote
        }
    }

    fn finish(&mut self, winner: Winner, reason: EndReason) -> Option<MatchOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        let outcome = MatchOutcome {
            winner,
            lanes: self.lanes(),
            reason,
        };
        self.outcome = Some(outcome);
        self.turn.resolve();
        self.move_clock = None;
        Some(outcome)
    }

    fn finish_by_timeout(&mut self, reason: EndReason) -> Option<MatchOutcome> {
        let winner = match resolver::resolve_timeout(&self.lanes()) {
            Verdict::Winner(d) => self.winner_for(d),
            Verdict::Draw => Winner::Draw,
        };
        self.finish(winner, reason)
    }

    /// Roll for the local side.
    pub fn roll_dice(&mut self, face: DieFace) -> Result<LocalTransition, ActionError> {
        match self.turn.roll(Side::Local, face)? {
            RollOutcome::Pending(face) => {
                self.move_clock = Some(Countdown::new(self.rules.move_clock_ticks));
                Ok(LocalTransition::DiceRolled(face))
            }
            RollOutcome::Penalty => {
                self.move_clock = None;
                Ok(LocalTransition::TurnPassed)
            }
        }
    }

    /// Push `lane` with the pending local roll.
    pub fn apply_move(&mut self, lane: usize) -> Result<LocalTransition, ActionError> {
        let face = self.turn.pending_for_move(Side::Local)?;
        if lane >= NUM_LANES {
            return Err(ActionError::InvalidLane(lane));
        }
        let id = MoveId::new(Side::Local, self.local_moves);
        let lanes = match self
            .ledger
            .apply_delta(id, lane, self.direction.delta(face.value()))
        {
            Ok(applied) => applied.lanes(),
            Err(_) => return Err(ActionError::InvalidLane(lane)),
        };
        self.local_moves += 1;
        self.move_clock = None;
        if lanes[lane] == self.direction.goal() {
            self.finish(Winner::Local, EndReason::Threshold { lane });
        } else {
            self.turn.complete_move(Side::Local, face);
        }
        Ok(LocalTransition::Moved { lane, face, lanes })
    }

    /// Advance every running clock by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Idle;
        }
        self.ticks += 1;
        if let Some(side) = self.turn.active() {
            if self.turn_clocks[side.index()].tick() {
                if let Some(outcome) = self.finish_by_timeout(EndReason::ClockExpired(side)) {
                    return TickOutcome::Resolved(outcome);
                }
            }
        }
        if let Phase::Moving(Side::Local, _) = self.turn.phase() {
            if let Some(clock) = self.move_clock.as_mut() {
                if clock.tick() {
                    self.move_clock = None;
                    self.turn.hand_over(Side::Local);
                    return TickOutcome::MoveForfeited;
                }
            }
        }
        TickOutcome::Idle
    }

    /// Resolve on the current snapshot, as when the peer disappears. Returns
    /// `None` if the match already had an outcome.
    pub fn force_timeout(&mut self) -> Option<MatchOutcome> {
        self.finish_by_timeout(EndReason::PeerLost)
    }

    /// Let the side that is waiting behind a settling remote move act.
    pub fn settle(&mut self) -> Option<Side> {
        self.turn.finish_settle()
    }

    /// The peer announced a roll.
    pub fn apply_remote_roll(&mut self, value: u8) -> Result<RemoteApplied, PeerError> {
        if self.is_over() {
            return Err(PeerError::MatchOver);
        }
        let face = DieFace::new(value).ok_or(PeerError::InvalidFace(value))?;
        match self.turn.phase() {
            Phase::Moving(Side::Remote, pending) if pending == face => {
                return Ok(RemoteApplied::Duplicate)
            }
            Phase::Settling(Side::Remote) => {
                self.turn.finish_settle();
            }
            _ => {}
        }
        self.turn
            .roll(Side::Remote, face)
            .map_err(|_| PeerError::OutOfTurn)?;
        Ok(RemoteApplied::Applied)
    }

    /// The peer moved. `seq` identifies the move among the peer's messages;
    /// `is_player1` is the sender's own seat and decides the delta sign.
    pub fn apply_remote_move(
        &mut self,
        seq: u64,
        lane: u8,
        value: u8,
        is_player1: bool,
    ) -> Result<RemoteApplied, PeerError> {
        if self.is_over() {
            return Err(PeerError::MatchOver);
        }
        let face = DieFace::new(value).ok_or(PeerError::InvalidFace(value))?;
        if lane as usize >= NUM_LANES {
            return Err(PeerError::InvalidLane(lane));
        }
        let id = MoveId::new(Side::Remote, seq);
        if self.ledger.is_applied(id) {
            return Ok(RemoteApplied::Duplicate);
        }
        match self.turn.phase() {
            Phase::Moving(Side::Remote, pending) if pending != face => {
                return Err(PeerError::DiceMismatch {
                    announced: pending.value(),
                    moved: value,
                })
            }
            Phase::Moving(Side::Remote, _) => {}
            // the dice_roll was lost; the move implies it
            Phase::Rolling(Side::Remote) | Phase::Settling(Side::Remote) => {}
            _ => return Err(PeerError::OutOfTurn),
        }
        let sender = Direction::for_seat(is_player1);
        let lanes = match self
            .ledger
            .apply_delta(id, lane as usize, sender.delta(face.value()))
        {
            Ok(Applied::Moved(lanes)) => lanes,
            Ok(Applied::Duplicate(_)) => return Ok(RemoteApplied::Duplicate),
            Err(_) => return Err(PeerError::InvalidLane(lane)),
        };
        // absolute goal, whatever seat the sender claimed
        if let Some((lane, reached)) = resolver::threshold_winner(&lanes) {
            let winner = self.winner_for(reached);
            self.finish(winner, EndReason::Threshold { lane });
        } else {
            self.turn.complete_move_settling(Side::Remote, face);
        }
        Ok(RemoteApplied::Applied)
    }

    /// The peer changed the turn. `is_my_turn` is from the sender's view.
    pub fn apply_remote_turn_change(
        &mut self,
        is_my_turn: bool,
    ) -> Result<RemoteApplied, PeerError> {
        if self.is_over() {
            return Err(PeerError::MatchOver);
        }
        let target = if is_my_turn { Side::Remote } else { Side::Local };
        if self.turn.active() == Some(target) {
            return Ok(RemoteApplied::Duplicate);
        }
        match target {
            Side::Local => {
                self.turn.hand_over(Side::Remote);
                Ok(RemoteApplied::Applied)
            }
            Side::Remote => Err(PeerError::OutOfTurn),
        }
    }
}

//! Authoritative lane positions for one peer's view of a match.

use super::common::{LedgerError, Side};
use super::config::{MAX_DISTANCE, NUM_LANES};

/// Snapshot of every lane position, in `-30..=30`.
pub type Lanes = [i8; NUM_LANES];

/// Identifier of one resolved move: the acting side and its move sequence.
///
/// Sequences are strictly increasing per side, so a ledger only has to
/// remember the highest applied sequence of each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveId {
    pub side: Side,
    pub seq: u64,
}

impl MoveId {
    pub fn new(side: Side, seq: u64) -> Self {
        Self { side, seq }
    }
}

/// Result of [`LaneLedger::apply_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The move was written; carries the new snapshot.
    Moved(Lanes),
    /// The move id was already consumed; nothing changed.
    Duplicate(Lanes),
}

impl Applied {
    pub fn lanes(&self) -> Lanes {
        match self {
            Applied::Moved(l) | Applied::Duplicate(l) => *l,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneLedger {
    lanes: Lanes,
    last_applied: [Option<u64>; 2],
}

impl Default for LaneLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LaneLedger {
    pub fn new() -> Self {
        Self {
            lanes: [0; NUM_LANES],
            last_applied: [None; 2],
        }
    }

    pub fn snapshot(&self) -> Lanes {
        self.lanes
    }

    pub fn position(&self, lane: usize) -> Option<i8> {
        self.lanes.get(lane).copied()
    }

    /// Whether `id` (or a later move of the same side) was already applied.
    pub fn is_applied(&self, id: MoveId) -> bool {
        matches!(self.last_applied[id.side.index()], Some(last) if id.seq <= last)
    }

    /// Move `lane` by `delta`, clamped to the track. Each id is written at
    /// most once.
    pub fn apply_delta(
        &mut self,
        id: MoveId,
        lane: usize,
        delta: i8,
    ) -> Result<Applied, LedgerError> {
        if lane >= NUM_LANES {
            return Err(LedgerError::InvalidLane(lane));
        }
        if self.is_applied(id) {
            return Ok(Applied::Duplicate(self.lanes));
        }
        let moved = (self.lanes[lane] as i16 + delta as i16)
            .clamp(-(MAX_DISTANCE as i16), MAX_DISTANCE as i16);
        self.lanes[lane] = moved as i8;
        self.last_applied[id.side.index()] = Some(id.seq);
        Ok(Applied::Moved(self.lanes))
    }
}

/// Number of independent lanes in a match.
pub const NUM_LANES: usize = 3;

/// Distance from the centre line to either goal. Reaching it ends the match.
pub const MAX_DISTANCE: i8 = 30;

/// Highest face of the die.
pub const DIE_FACES: u8 = 6;

/// Consecutive sixes that void the roll and end the turn.
pub const MAX_CONSECUTIVE_SIXES: u8 = 3;

/// Ticks on each side's cumulative turn clock.
pub const TURN_CLOCK_TICKS: u32 = 30;

/// Ticks allowed between a roll and choosing its lane.
pub const MOVE_CLOCK_TICKS: u32 = 5;

/// Score awarded for winning a match.
pub const WIN_SCORE: u32 = 500;

/// Score awarded for losing a match.
pub const LOSS_SCORE: u32 = 100;

/// A draw awards nothing.
pub const DRAW_SCORE: u32 = 0;

/// Game type reported to the results endpoint.
pub const GAME_TYPE: &str = "cargo_push";

/// Human readable lane labels, top to bottom.
pub const LANE_LABELS: [&str; NUM_LANES] = ["Top lane", "Middle lane", "Bottom lane"];

use super::{common::Direction, dice::DieFace, ledger::Lanes};

/// Pick a lane for an AI roll.
///
/// Takes a lane that reaches the goal with this roll if there is one.
/// Otherwise pushes back the lane the opponent has advanced furthest; ties go
/// to the lowest index.
pub fn choose_lane(lanes: &Lanes, direction: Direction, face: DieFace) -> usize {
    let goal = direction.goal() as i16;
    let step = direction.delta(face.value()) as i16;
    if let Some(lane) = lanes
        .iter()
        .position(|&pos| (pos as i16 + step) * direction.sign() as i16 >= goal.abs())
    {
        return lane;
    }
    // progress of the opponent in each lane, larger is more dangerous
    let threat = |pos: i8| -(pos as i16) * direction.sign() as i16;
    let mut best = 0;
    for (lane, &pos) in lanes.iter().enumerate().skip(1) {
        if threat(pos) > threat(lanes[best]) {
            best = lane;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(v: u8) -> DieFace {
        DieFace::new(v).unwrap()
    }

    #[test]
    fn finishes_when_possible() {
        assert_eq!(choose_lane(&[-20, 26, 0], Direction::Positive, face(4)), 1);
        assert_eq!(choose_lane(&[10, 0, -27], Direction::Negative, face(3)), 2);
    }

    #[test]
    fn defends_most_advanced_opponent_lane() {
        // player 2 pushes down the lane player 1 leads most
        assert_eq!(choose_lane(&[3, 12, 12], Direction::Negative, face(2)), 1);
        assert_eq!(choose_lane(&[3, -12, 0], Direction::Positive, face(2)), 1);
        assert_eq!(choose_lane(&[0, 0, 0], Direction::Positive, face(2)), 0);
    }
}

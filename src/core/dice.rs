use rand::Rng;

use super::config::DIE_FACES;

/// A single die face, always in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DieFace(u8);

impl DieFace {
    pub const SIX: DieFace = DieFace(DIE_FACES);

    /// Validate a raw value. Returns `None` outside `1..=6`.
    pub fn new(value: u8) -> Option<Self> {
        if (1..=DIE_FACES).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Roll a uniformly distributed face.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(1..=DIE_FACES))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_six(self) -> bool {
        self.0 == DIE_FACES
    }
}

impl core::fmt::Display for DieFace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Numerical Recipes linear congruential generator.

/// `seed = seed * 1664525 + 1013904223 mod 2^32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear {
    state: u32,
}

impl Linear {
    const MULTIPLIER: u32 = 1_664_525;
    const INCREMENT: u32 = 1_013_904_223;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }
}

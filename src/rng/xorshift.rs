//! Marsaglia xorshift32.

/// Triple (13, 17, 5). Zero is a fixed point, so a zero seed is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xorshift {
    state: u32,
}

impl Xorshift {
    const ZERO_SEED: u32 = 0x6D2B_79F5;

    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { Self::ZERO_SEED } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

//! MT19937.

/// 32-bit Mersenne Twister with the standard 624-word state and tempering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mersenne {
    state: Box<[u32; Self::N]>,
    index: usize,
}

impl Mersenne {
    const N: usize = 624;
    const M: usize = 397;
    const MATRIX_A: u32 = 0x9908_B0DF;
    const UPPER: u32 = 0x8000_0000;
    const LOWER: u32 = 0x7FFF_FFFF;

    pub fn new(seed: u32) -> Self {
        let mut state = Box::new([0u32; Self::N]);
        state[0] = seed;
        for i in 1..Self::N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self {
            state,
            index: Self::N,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        if self.index >= Self::N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;
        y ^= y >> 11;
        y ^= (y << 7) & 0x9D2C_5680;
        y ^= (y << 15) & 0xEFC6_0000;
        y ^= y >> 18;
        y
    }

    fn twist(&mut self) {
        for i in 0..Self::N {
            let y = (self.state[i] & Self::UPPER) | (self.state[(i + 1) % Self::N] & Self::LOWER);
            let mag = if y & 1 == 0 { 0 } else { Self::MATRIX_A };
            self.state[i] = self.state[(i + Self::M) % Self::N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sequence() {
        // first outputs of the reference implementation for the default seed
        let mut mt = Mersenne::new(5489);
        assert_eq!(mt.next_u32(), 3_499_211_612);
        assert_eq!(mt.next_u32(), 581_869_302);
        assert_eq!(mt.next_u32(), 3_890_346_734);
    }

    #[test]
    fn survives_twist_boundary() {
        let mut a = Mersenne::new(7);
        let mut b = Mersenne::new(7);
        for _ in 0..2_000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }
}

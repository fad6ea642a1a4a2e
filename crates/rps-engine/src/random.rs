//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible sessions: the same seed and the same
//! player inputs replay the same match. Uses xorshift64*.

use crate::moves::Move;

/// Seeded random number generator
///
/// Deterministic: same seed = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        // xorshift has a fixed point at zero
        let state = (seed ^ 0x6a09e667f3bcc909).wrapping_mul(0x517cc1b727220a95) | 1;

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Derive an independent stream, e.g. one per match of a session
    pub fn fork(&self, stream: u32) -> Self {
        let mut new_state = self.state;
        new_state ^= (stream as u64).wrapping_mul(0x9e3779b97f4a7c15);

        let mut rng = Self { state: new_state | 1 };
        rng.next_u64();
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// 0..=99, for percentage rolls
    pub fn next_percent(&mut self) -> u8 {
        self.next_range(100) as u8
    }

    /// Value in `[0, max)` by multiply-shift; 0 when `max` is 0
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Draw one of Rock, Paper, Scissors uniformly
    pub fn next_move(&mut self) -> Move {
        Move::PLAYABLE[self.next_range(Move::PLAYABLE.len() as u32) as usize]
    }
}

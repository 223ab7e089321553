//! Deterministic RNG for gameplay randomness.
//!
//! A simple LCG (Numerical Recipes constants) is plenty for ghost coin
//! flips and heading picks, and keeps ghost behavior reproducible from a
//! seed under test.

use crate::types::Direction;

/// Simple LCG (Linear Congruential Generator) RNG.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32.
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max).
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// A fair coin flip.
    pub fn coin(&mut self) -> bool {
        // The low bit of an LCG alternates; use a high bit instead.
        self.next_u32() & 0x8000_0000 != 0
    }

    /// Pick one of the four cardinal directions uniformly.
    pub fn pick_direction(&mut self) -> Direction {
        Direction::ALL[self.next_range(4) as usize]
    }
}

//! Lightweight xorshift32 PRNG for layout generation

use std::time::{SystemTime, UNIX_EPOCH};

pub struct FormationRng {
    seed: u32,
    state: u32,
}

impl FormationRng {
    pub fn new(seed: u32) -> Self {
        let seed = if seed == 0 { 1 } else { seed };
        Self { seed, state: seed }
    }

    /// Seed this generator started from; feed it back to `new` to replay a layout
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Seed from the system clock; use `new` when a run must be repeatable
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(0x9E37_79B9);
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly, so 1.0 is unreachable
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an angle in [0, 2π)
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * std::f32::consts::TAU
    }
}

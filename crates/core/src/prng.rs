//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! Every random draw in faultline (fault-plane placement, particle spawn
//! state) goes through an explicitly seeded [`Xorshift64`], so a terrain built
//! from the same seed and parameters is bit-identical across runs and
//! platforms.

use std::f64::consts::TAU;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG (shifts 13, 7, 17).
///
/// A seed of 0 is replaced with a non-zero fallback to avoid the all-zeros
/// fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the upper 53 bits of `next_u64()` for full mantissa precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed angle in [0, 2π).
    pub fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    /// Returns a direction drawn uniformly from the unit sphere.
    ///
    /// Samples `z` uniformly in [-1, 1) and an azimuth in [0, 2π); by
    /// Archimedes' hat-box theorem this is uniform over the sphere surface.
    pub fn next_unit_vector(&mut self) -> DVec3 {
        let z = self.next_range(-1.0, 1.0);
        let phi = self.next_angle();
        let r = (1.0 - z * z).max(0.0).sqrt();
        DVec3::new(r * phi.cos(), r * phi.sin(), z)
    }
}

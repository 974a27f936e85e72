//! Randomized fault-plane displacement.
//!
//! Each pass splits the plane with a random line and moves every vertex up or
//! down by a fixed amount depending on its side. Summing many independent
//! ±delta contributions yields smooth, fractal-looking relief. No clamping or
//! renormalization is applied.

use faultline_core::Xorshift64;
use glam::{DVec2, DVec3};

use crate::heightfield::{Bounds, Heightfield};

/// A 2D line through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultPlane {
    pub point: DVec2,
    pub normal: DVec2,
}

impl FaultPlane {
    /// Draws a point uniformly inside `bounds` and a direction angle
    /// uniformly in [0, 2π).
    pub fn random(bounds: &Bounds, rng: &mut Xorshift64) -> Self {
        let x = rng.next_range(bounds.min_x, bounds.max_x);
        let y = rng.next_range(bounds.min_y, bounds.max_y);
        debug_assert!(bounds.contains(x, y));
        let theta = rng.next_angle();
        Self {
            point: DVec2::new(x, y),
            normal: DVec2::from_angle(theta),
        }
    }

    /// Signed side indicator `(v - p) · n` over the vertex's planar coordinates.
    pub fn side(&self, v: DVec3) -> f64 {
        (v.truncate() - self.point).dot(self.normal)
    }

    /// Raises vertices strictly on the positive side by `delta` and lowers the rest.
    pub fn displace(&self, hf: &mut Heightfield, delta: f64) {
        for v in hf.vertices.iter_mut() {
            if self.side(*v) > 0.0 {
                v.z += delta;
            } else {
                v.z -= delta;
            }
        }
        hf.normals_stale = true;
        hf.colors = None;
    }
}

/// Applies `iterations` random fault planes of magnitude `delta`.
///
/// Marks normals stale and discards any elevation colors, both of which are
/// derived from the elevations this changes. `iterations == 0` leaves the
/// heightfield untouched.
pub fn apply_fault_planes(
    hf: &mut Heightfield,
    iterations: usize,
    delta: f64,
    rng: &mut Xorshift64,
) {
    let bounds = hf.bounds();
    for _ in 0..iterations {
        FaultPlane::random(&bounds, rng).displace(hf, delta);
    }
    log::info!("terrain: applied {iterations} fault planes (delta {delta})");
}

//! Pure-computation RGBA8 rasterisation of engine state.
//!
//! This module is always available (no feature gate) so that the `png`
//! snapshot path and any embedding host share the same conversion.

use faultline_core::Srgb;
use faultline_particles::ParticleSystem;
use faultline_terrain::Heightfield;

/// Background behind the particle discs.
const BACKDROP: Srgb = Srgb::from_rgb8(16, 16, 24);

/// An RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// One pixel per vertex, viewed from above with +y at the top.
///
/// Uses the vertex colors when present, otherwise a grey ramp over the
/// elevation range (mid-grey for flat terrain). Each pixel is darkened by the
/// z component of its normal, so steep slopes read darker.
pub fn heightfield_to_rgba(hf: &Heightfield) -> Raster {
    let side = hf.side();
    let (lo, hi) = hf.elevation_range();
    let span = hi - lo;
    let base = |k: usize| match hf.colors() {
        Some(colors) => colors[k],
        None => {
            let t = if span > 0.0 {
                (hf.vertices()[k].z - lo) / span
            } else {
                0.5
            };
            Srgb { r: t, g: t, b: t }
        }
    };

    let rgba = (0..side)
        .rev()
        .flat_map(|i| (0..side).map(move |j| i * side + j))
        .flat_map(|k| base(k).scaled(hf.normals()[k].z.max(0.0)).to_rgba8())
        .collect();
    Raster {
        width: side,
        height: side,
        rgba,
    }
}

/// Top-down `(x, z)` projection of every sphere as a filled disc.
///
/// The container maps onto a `size × size` square with `-z` at the top.
/// Lower particles are drawn first so the highest one wins where discs
/// overlap.
pub fn particles_to_rgba(system: &ParticleSystem, size: usize) -> Raster {
    let mut rgba: Vec<u8> = std::iter::repeat(BACKDROP.to_rgba8())
        .take(size * size)
        .flatten()
        .collect();
    let extent = 2.0 * system.params().box_size;
    let scale = size as f64 / extent;

    let mut order: Vec<_> = system.particles().iter().collect();
    order.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

    for p in order {
        let cx = (p.position.x + extent / 2.0) * scale;
        let cy = (p.position.z + extent / 2.0) * scale;
        let r = p.radius() * scale;
        let pixel = p.color().to_rgba8();

        let row_lo = (cy - r).floor().max(0.0) as usize;
        let row_hi = ((cy + r).ceil().max(0.0) as usize).min(size);
        let col_lo = (cx - r).floor().max(0.0) as usize;
        let col_hi = ((cx + r).ceil().max(0.0) as usize).min(size);
        for row in row_lo..row_hi {
            for col in col_lo..col_hi {
                let dx = col as f64 + 0.5 - cx;
                let dy = row as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    let at = (row * size + col) * 4;
                    rgba[at..at + 4].copy_from_slice(&pixel);
                }
            }
        }
    }

    Raster {
        width: size,
        height: size,
        rgba,
    }
}

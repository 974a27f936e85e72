//! Per-vertex normal estimation from the six grid neighbours.

use glam::DVec3;

use crate::heightfield::Heightfield;

/// Neighbour offsets `(di, dj)` in fixed cyclic order:
/// `(i,j-1), (i+1,j-1), (i+1,j), (i,j+1), (i-1,j+1), (i-1,j)`.
///
/// These are exactly the vertices sharing a triangle with `(i, j)` under the
/// grid's anti-diagonal split.
const NEIGHBOURS: [(isize, isize); 6] = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 1), (-1, 0)];

/// Normal assigned when no adjacent neighbour pair exists or the sum vanishes.
pub const DEGENERATE_NORMAL: DVec3 = DVec3::Z;

/// Recomputes every vertex normal from the current elevations.
///
/// For each pair of cyclically adjacent neighbours that both exist (the 5→0
/// wrap included), the edge vectors from the centre vertex are crossed and
/// summed; the sum is normalized. The ring order runs clockwise seen from
/// +z, so each pair is crossed as `later × earlier` to agree with the
/// counter-clockwise face winding (a flat grid yields `(0, 0, 1)`).
///
/// Deterministic and idempotent for unchanged vertices.
pub fn compute_vertex_normals(hf: &mut Heightfield) {
    let side = hf.side();
    let mut normals = vec![DEGENERATE_NORMAL; hf.vertex_count()];
    for i in 0..side {
        for j in 0..side {
            normals[i * side + j] = vertex_normal(hf, i, j);
        }
    }
    hf.normals = normals;
    hf.normals_stale = false;
    log::info!("terrain: computed {} vertex normals", hf.vertex_count());
}

/// Normal at vertex `(i, j)`; see [`compute_vertex_normals`].
pub fn vertex_normal(hf: &Heightfield, i: usize, j: usize) -> DVec3 {
    let Some(centre) = hf.vertex(i, j) else {
        return DEGENERATE_NORMAL;
    };

    let ring: [Option<DVec3>; 6] = NEIGHBOURS.map(|(di, dj)| {
        let ni = i.checked_add_signed(di)?;
        let nj = j.checked_add_signed(dj)?;
        hf.vertex(ni, nj).map(|v| v - centre)
    });

    let sum: DVec3 = (0..6)
        .filter_map(|k| match (ring[k], ring[(k + 1) % 6]) {
            (Some(earlier), Some(later)) => Some(later.cross(earlier)),
            _ => None,
        })
        .sum();

    sum.try_normalize().unwrap_or(DEGENERATE_NORMAL)
}

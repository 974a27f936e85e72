//! Regular triangulated grid over a rectangle.
//!
//! Vertex `(i, j)` lives at linear index `i * (div + 1) + j`, with `j`
//! stepping along x and `i` stepping along y. Every buffer is allocated once
//! at its final size and filled by closed-form index formulas.

use faultline_core::{SceneError, Srgb};
use glam::DVec3;

/// Planar extent of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Requires finite coordinates with `min < max` on both axes.
    pub fn validate(&self) -> Result<(), SceneError> {
        let all_finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(SceneError::invalid(format!(
                "bounds must be finite, got {self:?}"
            )));
        }
        if self.min_x >= self.max_x {
            return Err(SceneError::invalid(format!(
                "min_x ({}) must be less than max_x ({})",
                self.min_x, self.max_x
            )));
        }
        if self.min_y >= self.max_y {
            return Err(SceneError::invalid(format!(
                "min_y ({}) must be less than max_y ({})",
                self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True if `(x, y)` lies inside the closed rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Which primitive set the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Filled triangles from the face list.
    Filled,
    /// Line segments from the edge list.
    Wireframe,
}

/// A triangulated terrain grid with per-vertex normals and optional colors.
///
/// Faces and edges are fixed at construction. Vertex elevations change only
/// through fault-plane passes, after which normals are stale until
/// [`compute_vertex_normals`](crate::normals::compute_vertex_normals) runs.
#[derive(Debug, Clone)]
pub struct Heightfield {
    pub(crate) div: usize,
    pub(crate) bounds: Bounds,
    pub(crate) vertices: Vec<DVec3>,
    pub(crate) normals: Vec<DVec3>,
    pub(crate) colors: Option<Vec<Srgb>>,
    faces: Vec<[u32; 3]>,
    edges: Vec<[u32; 2]>,
    pub(crate) normals_stale: bool,
}

impl Heightfield {
    /// Builds a flat `(div + 1) x (div + 1)` lattice spanning `bounds`.
    ///
    /// Each cell `(i, j)` is split along the diagonal from `(i, j + 1)` to
    /// `(i + 1, j)` into `{(i,j), (i,j+1), (i+1,j)}` and
    /// `{(i,j+1), (i+1,j+1), (i+1,j)}`. Every face contributes its three
    /// edges in order; shared edges appear twice. Normals start as `(0, 0, 1)`.
    ///
    /// Returns `SceneError::InvalidParameter` for `div == 0`, invalid bounds,
    /// or a vertex count that does not fit a `u32` index buffer.
    pub fn generate(div: usize, bounds: Bounds) -> Result<Self, SceneError> {
        if div == 0 {
            return Err(SceneError::invalid("div must be at least 1, got 0"));
        }
        bounds.validate()?;
        let side = div
            .checked_add(1)
            .ok_or_else(|| SceneError::invalid(format!("div {div} is too large")))?;
        let vertex_count = side
            .checked_mul(side)
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or_else(|| {
                SceneError::invalid(format!("div {div} exceeds 32-bit index range"))
            })?;
        let face_count = 2 * div * div;

        let dx = bounds.width() / div as f64;
        let dy = bounds.height() / div as f64;

        let mut vertices = vec![DVec3::ZERO; vertex_count];
        for i in 0..side {
            for j in 0..side {
                vertices[i * side + j] = DVec3::new(
                    bounds.min_x + dx * j as f64,
                    bounds.min_y + dy * i as f64,
                    0.0,
                );
            }
        }

        let mut faces = vec![[0u32; 3]; face_count];
        for i in 0..div {
            for j in 0..div {
                let v = (i * side + j) as u32;
                let right = v + 1;
                let up = v + side as u32;
                let up_right = up + 1;
                let cell = 2 * (i * div + j);
                faces[cell] = [v, right, up];
                faces[cell + 1] = [right, up_right, up];
            }
        }

        let mut edges = vec![[0u32; 2]; face_count * 3];
        for (f, &[a, b, c]) in faces.iter().enumerate() {
            edges[3 * f] = [a, b];
            edges[3 * f + 1] = [b, c];
            edges[3 * f + 2] = [c, a];
        }

        Ok(Self {
            div,
            bounds,
            vertices,
            normals: vec![DVec3::Z; vertex_count],
            colors: None,
            faces,
            edges,
            normals_stale: false,
        })
    }

    /// Number of grid cells per side.
    pub fn div(&self) -> usize {
        self.div
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Vertices per side, `div + 1`.
    pub fn side(&self) -> usize {
        self.div + 1
    }

    /// Row-major linear index of vertex `(i, j)`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.side() + j
    }

    /// Vertex `(i, j)`, or `None` when either index is past the grid edge.
    pub fn vertex(&self, i: usize, j: usize) -> Option<DVec3> {
        let side = self.side();
        (i < side && j < side).then(|| self.vertices[i * side + j])
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    pub fn colors(&self) -> Option<&[Srgb]> {
        self.colors.as_deref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// False after a displacement pass until normals are recomputed.
    pub fn normals_are_current(&self) -> bool {
        !self.normals_stale
    }

    /// Flat index buffer for the given draw mode.
    pub fn indices(&self, mode: RenderMode) -> &[u32] {
        match mode {
            RenderMode::Filled => self.faces.as_flattened(),
            RenderMode::Wireframe => self.edges.as_flattened(),
        }
    }

    /// Lowest and highest vertex elevation.
    pub fn elevation_range(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            })
    }
}

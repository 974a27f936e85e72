#![deny(unsafe_code)]
//! Procedural terrain by randomized fault-plane displacement.
//!
//! Builds a regular triangulated grid, perturbs its elevations with many
//! random half-plane splits, then estimates per-vertex normals and optional
//! elevation-band colors. The resulting [`Heightfield`] is immutable once
//! built and can be read concurrently by a renderer, which uploads vertices,
//! normals and colors as attributes and faces or edges as index buffers.

pub mod elevation;
pub mod fault;
pub mod heightfield;
pub mod normals;

use faultline_core::error::SceneError;
use faultline_core::params::{
    param_bool, param_count, param_f64, param_f64_list, param_string_list,
};
use faultline_core::prng::Xorshift64;
use faultline_core::Engine;
use serde_json::{json, Value};

pub use elevation::{assign_elevation_colors, ElevationBands};
pub use fault::{apply_fault_planes, FaultPlane};
pub use heightfield::{Bounds, Heightfield, RenderMode};
pub use normals::compute_vertex_normals;

/// Default grid cells per side.
const DEFAULT_DIV: usize = 64;
/// Default half-extent of the square grid.
const DEFAULT_HALF_EXTENT: f64 = 0.5;
/// Default number of fault-plane passes.
const DEFAULT_ITERATIONS: usize = 100;
/// Default elevation change per pass.
const DEFAULT_DELTA: f64 = 0.005;

/// Parameters for terrain generation.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainParams {
    pub div: usize,
    pub bounds: Bounds,
    pub iterations: usize,
    pub delta: f64,
    /// Whether to derive elevation-band vertex colors.
    pub colors: bool,
    pub bands: ElevationBands,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            div: DEFAULT_DIV,
            bounds: Bounds::new(
                -DEFAULT_HALF_EXTENT,
                DEFAULT_HALF_EXTENT,
                -DEFAULT_HALF_EXTENT,
                DEFAULT_HALF_EXTENT,
            ),
            iterations: DEFAULT_ITERATIONS,
            delta: DEFAULT_DELTA,
            colors: true,
            bands: ElevationBands::default(),
        }
    }
}

impl TerrainParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// A `div` or `iterations` that is present but not a valid integer (zero
    /// `div`, negative, fractional or non-numeric) is an error rather than a
    /// silent default.
    pub fn from_json(params: &Value) -> Result<Self, SceneError> {
        let defaults = Self::default();
        let div = param_count(params, "div", DEFAULT_DIV, 1)?;

        let b = defaults.bounds;
        let bounds = Bounds::new(
            param_f64(params, "min_x", b.min_x),
            param_f64(params, "max_x", b.max_x),
            param_f64(params, "min_y", b.min_y),
            param_f64(params, "max_y", b.max_y),
        );

        let thresholds = param_f64_list(params, "thresholds", &defaults.bands.thresholds);
        let palette = param_string_list(params, "palette");
        let bands = ElevationBands::from_parts(&thresholds, palette.as_deref())?;

        let parsed = Self {
            div,
            bounds,
            iterations: param_count(params, "iterations", DEFAULT_ITERATIONS, 0)?,
            delta: param_f64(params, "delta", DEFAULT_DELTA),
            colors: param_bool(params, "colors", true),
            bands,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.div == 0 {
            return Err(SceneError::invalid("div must be at least 1, got 0"));
        }
        self.bounds.validate()?;
        if !self.delta.is_finite() {
            return Err(SceneError::invalid(format!(
                "delta must be finite, got {}",
                self.delta
            )));
        }
        self.bands.validate()
    }
}

/// Terrain engine: one heightfield generated at construction.
///
/// Generation runs the full pipeline once: grid, fault planes, normals, then
/// colors. The heightfield is static afterwards, so [`Engine::step`] does
/// nothing.
pub struct Terrain {
    heightfield: Heightfield,
    params: TerrainParams,
    seed: u64,
}

impl Terrain {
    /// Generates terrain deterministically from `seed`.
    ///
    /// Returns `SceneError::InvalidParameter` before allocating anything if
    /// the parameters are invalid.
    pub fn new(seed: u64, params: TerrainParams) -> Result<Self, SceneError> {
        params.validate()?;
        let mut heightfield = Heightfield::generate(params.div, params.bounds)?;
        log::info!(
            "terrain: generated {} vertices, {} faces, {} edges",
            heightfield.vertex_count(),
            heightfield.face_count(),
            heightfield.edges().len()
        );

        let mut rng = Xorshift64::new(seed);
        apply_fault_planes(&mut heightfield, params.iterations, params.delta, &mut rng);
        compute_vertex_normals(&mut heightfield);
        if params.colors {
            assign_elevation_colors(&mut heightfield, &params.bands);
        }

        Ok(Self {
            heightfield,
            params,
            seed,
        })
    }

    /// Creates terrain from a JSON params object.
    pub fn from_json(seed: u64, json_params: &Value) -> Result<Self, SceneError> {
        Self::new(seed, TerrainParams::from_json(json_params)?)
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Engine for Terrain {
    fn step(&mut self, _dt: f64) -> Result<(), SceneError> {
        Ok(())
    }

    fn params(&self) -> Value {
        let b = self.params.bounds;
        json!({
            "div": self.params.div,
            "min_x": b.min_x,
            "max_x": b.max_x,
            "min_y": b.min_y,
            "max_y": b.max_y,
            "iterations": self.params.iterations,
            "delta": self.params.delta,
            "colors": self.params.colors,
            "thresholds": self.params.bands.thresholds,
            "palette": self.params.bands.palette,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "div": {
                "type": "integer",
                "default": DEFAULT_DIV,
                "min": 1,
                "description": "Grid cells per side; (div+1)^2 vertices, 2*div^2 triangles"
            },
            "min_x": {
                "type": "number",
                "default": -DEFAULT_HALF_EXTENT,
                "description": "Lower x edge of the grid"
            },
            "max_x": {
                "type": "number",
                "default": DEFAULT_HALF_EXTENT,
                "description": "Upper x edge of the grid; must exceed min_x"
            },
            "min_y": {
                "type": "number",
                "default": -DEFAULT_HALF_EXTENT,
                "description": "Lower y edge of the grid"
            },
            "max_y": {
                "type": "number",
                "default": DEFAULT_HALF_EXTENT,
                "description": "Upper y edge of the grid; must exceed min_y"
            },
            "iterations": {
                "type": "integer",
                "default": DEFAULT_ITERATIONS,
                "min": 0,
                "description": "Number of random fault planes"
            },
            "delta": {
                "type": "number",
                "default": DEFAULT_DELTA,
                "description": "Elevation raised or lowered per fault plane"
            },
            "colors": {
                "type": "boolean",
                "default": true,
                "description": "Derive elevation-band vertex colors"
            },
            "thresholds": {
                "type": "array",
                "default": elevation::DEFAULT_THRESHOLDS,
                "description": "Four strictly descending elevation band boundaries"
            },
            "palette": {
                "type": "array",
                "default": ElevationBands::default().palette,
                "description": "Five hex colors, highest band first"
            }
        })
    }

    fn summary(&self) -> Value {
        let hf = &self.heightfield;
        let (lo, hi) = hf.elevation_range();
        json!({
            "engine": "terrain",
            "seed": self.seed,
            "vertices": hf.vertex_count(),
            "faces": hf.face_count(),
            "edges": hf.edges().len(),
            "min_elevation": lo,
            "max_elevation": hi,
        })
    }
}

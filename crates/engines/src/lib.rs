#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides CPU-side
//! snapshot rendering.
//!
//! This crate sits between `faultline-core` (which defines the `Engine` trait)
//! and the producer crates (`faultline-terrain`, `faultline-particles`), so the
//! CLI and any other host share one dispatch path.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use faultline_core::{Engine, SceneError, Seed};
use faultline_particles::ParticleSystem;
use faultline_terrain::Terrain;
use serde_json::Value;

use crate::pixel::Raster;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["terrain", "particles"];

/// Enumeration of every geometry producer.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction.
pub enum EngineKind {
    /// Fault-plane heightfield.
    Terrain(Terrain),
    /// Spheres settling in a box.
    Particles(ParticleSystem),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// Returns `SceneError::UnknownEngine` if the name is not recognized.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, SceneError> {
        match name {
            "terrain" => Ok(EngineKind::Terrain(Terrain::from_json(seed, params)?)),
            "particles" => Ok(EngineKind::Particles(ParticleSystem::from_json(
                seed, params,
            )?)),
            _ => Err(SceneError::UnknownEngine(name.to_string())),
        }
    }

    /// Builds the engine a [`Seed`] names and runs its recorded ticks.
    pub fn replay(seed: &Seed) -> Result<Self, SceneError> {
        seed.validate()?;
        let mut engine = Self::from_name(&seed.engine, seed.seed, &seed.params)?;
        engine.run(seed.steps, seed.dt)?;
        Ok(engine)
    }

    /// Steps the engine `steps` times with a fixed `dt`.
    pub fn run(&mut self, steps: usize, dt: f64) -> Result<(), SceneError> {
        (0..steps).try_for_each(|_| self.step(dt))
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Engine name as accepted by [`EngineKind::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Terrain(_) => "terrain",
            EngineKind::Particles(_) => "particles",
        }
    }

    /// CPU raster of the current state.
    ///
    /// Terrain yields one pixel per vertex and ignores `size`; particles are
    /// drawn into a `size × size` square.
    pub fn raster(&self, size: usize) -> Raster {
        match self {
            EngineKind::Terrain(e) => pixel::heightfield_to_rgba(e.heightfield()),
            EngineKind::Particles(e) => pixel::particles_to_rgba(e, size),
        }
    }
}

impl Engine for EngineKind {
    fn step(&mut self, dt: f64) -> Result<(), SceneError> {
        match self {
            EngineKind::Terrain(e) => e.step(dt),
            EngineKind::Particles(e) => Engine::step(e, dt),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Terrain(e) => e.params(),
            EngineKind::Particles(e) => Engine::params(e),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Terrain(e) => e.param_schema(),
            EngineKind::Particles(e) => e.param_schema(),
        }
    }

    fn summary(&self) -> Value {
        match self {
            EngineKind::Terrain(e) => e.summary(),
            EngineKind::Particles(e) => e.summary(),
        }
    }
}

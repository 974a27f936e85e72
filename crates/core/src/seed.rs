//! Reproducible description of a faultline run.
//!
//! A [`Seed`] captures everything needed to recreate a scene: engine name,
//! parameters, PRNG seed, number of ticks and the fixed tick length.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};

/// Fixed tick length used when a seed file omits `dt` (one 60 Hz frame).
pub const DEFAULT_DT: f64 = 1.0 / 60.0;

fn default_dt() -> f64 {
    DEFAULT_DT
}

/// Reproducible description of a scene.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// geometry: terrain is deterministic given the PRNG seed, and particle
/// stepping is deterministic given state and `dt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub steps: usize,
    #[serde(default = "default_dt")]
    pub dt: f64,
}

impl Seed {
    /// Creates a new Seed with default params (`{}`), zero steps and a 60 Hz tick.
    pub fn new(engine: &str, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            steps: 0,
            dt: DEFAULT_DT,
        }
    }

    /// Rejects a negative or non-finite tick length and a non-object params value.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(SceneError::invalid(format!(
                "dt must be finite and non-negative, got {}",
                self.dt
            )));
        }
        if !self.params.is_object() {
            return Err(SceneError::invalid("params must be a JSON object"));
        }
        Ok(())
    }
}

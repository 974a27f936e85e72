//! The `Engine` trait implemented by every faultline data producer.
//!
//! The trait is object-safe so a host can hold a `Box<dyn Engine>` and switch
//! between the terrain generator and the particle session at runtime.

use crate::error::SceneError;
use serde_json::Value;

/// A producer of geometric or physical data for an external renderer.
///
/// The host owns the engine and drives it from its frame loop: it measures
/// elapsed wall-clock time and calls [`Engine::step`] once per tick.
pub trait Engine {
    /// Advance by `dt` seconds of real time.
    ///
    /// Engines whose output is fixed after construction treat this as a no-op.
    fn step(&mut self, dt: f64) -> Result<(), SceneError>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter: type, default, range, description.
    fn param_schema(&self) -> Value;

    /// Small statistics object describing the current output.
    fn summary(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal engine used to verify trait object safety.
    struct Counter {
        elapsed: f64,
        ticks: usize,
    }

    impl Engine for Counter {
        fn step(&mut self, dt: f64) -> Result<(), SceneError> {
            if dt < 0.0 {
                return Err(SceneError::invalid("negative dt"));
            }
            self.elapsed += dt;
            self.ticks += 1;
            Ok(())
        }

        fn params(&self) -> Value {
            json!({})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }

        fn summary(&self) -> Value {
            json!({"ticks": self.ticks, "elapsed": self.elapsed})
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let mut engine: Box<dyn Engine> = Box::new(Counter {
            elapsed: 0.0,
            ticks: 0,
        });
        engine.step(0.5).unwrap();
        engine.step(0.25).unwrap();
        assert_eq!(engine.summary()["ticks"], 2);
        assert_eq!(engine.summary()["elapsed"], 0.75);
    }

    #[test]
    fn step_errors_propagate_through_dyn() {
        let mut counter = Counter {
            elapsed: 0.0,
            ticks: 0,
        };
        let engine: &mut dyn Engine = &mut counter;
        assert!(engine.step(-1.0).is_err());
        assert_eq!(engine.summary()["ticks"], 0);
    }
}

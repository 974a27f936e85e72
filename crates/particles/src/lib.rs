#![deny(unsafe_code)]
//! Spheres falling under gravity inside a closed cube.
//!
//! Each [`Particle`] is integrated with semi-implicit Euler, loses speed to
//! exponential drag, bounces off the six walls with a restitution factor and
//! finally comes to rest on the floor. A [`ParticleSystem`] owns the
//! parameters, the PRNG and the particle list for one session; hosts drive it
//! with a fixed `dt` or with the clamped wall-clock delta of a [`FrameClock`].

pub mod clock;
pub mod particle;

use faultline_core::params::{param_count, param_f64};
use faultline_core::{Engine, SceneError, Xorshift64};
use serde_json::{json, Value};

pub use clock::FrameClock;
pub use particle::{CollisionBounds, Particle, ParticleState, StepOutcome};

const DEFAULT_BOX_SIZE: f64 = 1.0;
const DEFAULT_GRAVITY: f64 = -15.0;
const DEFAULT_DRAG: f64 = 0.9;
const DEFAULT_WALL_HARDNESS: f64 = 0.8;
const DEFAULT_STOP_THRESHOLD: f64 = 0.25;
const DEFAULT_MIN_RADIUS: f64 = 0.05;
const DEFAULT_MAX_RADIUS: f64 = 0.2;
const DEFAULT_MAX_SPEED: f64 = 1.0;
const DEFAULT_COUNT: usize = 10;
const DEFAULT_MAX_FRAME_DT: f64 = 0.25;

/// Physical constants and spawn ranges for a particle session.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleParams {
    /// Half-extent of the cube; walls sit at `±box_size` on every axis.
    pub box_size: f64,
    /// Vertical acceleration (negative is down).
    pub gravity: f64,
    /// Fraction of velocity retained per second.
    pub drag: f64,
    /// Restitution applied to the reflected velocity component.
    pub wall_hardness: f64,
    /// Speed below which a particle on the floor settles.
    pub stop_threshold: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Initial speed of spawned particles.
    pub max_speed: f64,
    /// Particles spawned when the session starts.
    pub count: usize,
    pub collision: CollisionBounds,
    /// Upper bound on a single wall-clock frame delta.
    pub max_frame_dt: f64,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            gravity: DEFAULT_GRAVITY,
            drag: DEFAULT_DRAG,
            wall_hardness: DEFAULT_WALL_HARDNESS,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            max_speed: DEFAULT_MAX_SPEED,
            count: DEFAULT_COUNT,
            collision: CollisionBounds::default(),
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
        }
    }
}

impl ParticleParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// An unrecognised `collision` name, or a `count` that is not a
    /// non-negative integer, is an error.
    pub fn from_json(params: &Value) -> Result<Self, SceneError> {
        let collision = match params.get("collision").and_then(Value::as_str) {
            None => CollisionBounds::default(),
            Some(name) => CollisionBounds::from_name(name).ok_or_else(|| {
                SceneError::invalid(format!(
                    "collision must be \"radius_adjusted\" or \"centre\", got {name:?}"
                ))
            })?,
        };
        let parsed = Self {
            box_size: param_f64(params, "box_size", DEFAULT_BOX_SIZE),
            gravity: param_f64(params, "gravity", DEFAULT_GRAVITY),
            drag: param_f64(params, "drag", DEFAULT_DRAG),
            wall_hardness: param_f64(params, "wall_hardness", DEFAULT_WALL_HARDNESS),
            stop_threshold: param_f64(params, "stop_threshold", DEFAULT_STOP_THRESHOLD),
            min_radius: param_f64(params, "min_radius", DEFAULT_MIN_RADIUS),
            max_radius: param_f64(params, "max_radius", DEFAULT_MAX_RADIUS),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            count: param_count(params, "count", DEFAULT_COUNT, 0)?,
            collision,
            max_frame_dt: param_f64(params, "max_frame_dt", DEFAULT_MAX_FRAME_DT),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let finite = [
            ("box_size", self.box_size),
            ("gravity", self.gravity),
            ("drag", self.drag),
            ("wall_hardness", self.wall_hardness),
            ("stop_threshold", self.stop_threshold),
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("max_speed", self.max_speed),
            ("max_frame_dt", self.max_frame_dt),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SceneError::invalid(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.box_size <= 0.0 {
            return Err(SceneError::invalid(format!(
                "box_size must be positive, got {}",
                self.box_size
            )));
        }
        if self.min_radius <= 0.0 || self.min_radius > self.max_radius {
            return Err(SceneError::invalid(format!(
                "radius range must satisfy 0 < min_radius <= max_radius, got [{}, {}]",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_radius >= self.box_size {
            return Err(SceneError::invalid(format!(
                "max_radius {} must be smaller than box_size {}",
                self.max_radius, self.box_size
            )));
        }
        if self.drag <= 0.0 || self.drag > 1.0 {
            return Err(SceneError::invalid(format!(
                "drag must be in (0, 1], got {}",
                self.drag
            )));
        }
        if !(0.0..=1.0).contains(&self.wall_hardness) {
            return Err(SceneError::invalid(format!(
                "wall_hardness must be in [0, 1], got {}",
                self.wall_hardness
            )));
        }
        if self.stop_threshold <= 0.0 {
            return Err(SceneError::invalid(format!(
                "stop_threshold must be positive, got {}",
                self.stop_threshold
            )));
        }
        if self.max_speed < 0.0 {
            return Err(SceneError::invalid(format!(
                "max_speed must be non-negative, got {}",
                self.max_speed
            )));
        }
        if self.max_frame_dt <= 0.0 {
            return Err(SceneError::invalid(format!(
                "max_frame_dt must be positive, got {}",
                self.max_frame_dt
            )));
        }
        Ok(())
    }
}

/// One particle session: parameters, PRNG, particles and elapsed time.
///
/// Particles are independent of each other; there are no inter-particle
/// collisions.
pub struct ParticleSystem {
    params: ParticleParams,
    rng: Xorshift64,
    particles: Vec<Particle>,
    elapsed: f64,
    seed: u64,
}

impl ParticleSystem {
    /// Starts a session with `params.count` particles spawned from `seed`.
    pub fn new(seed: u64, params: ParticleParams) -> Result<Self, SceneError> {
        params.validate()?;
        let mut system = Self {
            rng: Xorshift64::new(seed),
            particles: Vec::with_capacity(params.count),
            params,
            elapsed: 0.0,
            seed,
        };
        system.spawn(system.params.count);
        Ok(system)
    }

    /// Creates a session from a JSON params object.
    pub fn from_json(seed: u64, json_params: &Value) -> Result<Self, SceneError> {
        Self::new(seed, ParticleParams::from_json(json_params)?)
    }

    /// Adds `n` freshly spawned particles stamped with the current session time.
    pub fn spawn(&mut self, n: usize) {
        for _ in 0..n {
            let mut particle = Particle::spawn(&self.params, &mut self.rng);
            particle.last_update = self.elapsed;
            self.particles.push(particle);
        }
        log::info!(
            "particles: spawned {n}, {} in session",
            self.particles.len()
        );
    }

    /// Advances every moving particle by `dt` seconds.
    ///
    /// Settled particles are skipped and keep their `last_update`. A negative
    /// or non-finite `dt` is rejected without touching any particle.
    pub fn step(&mut self, dt: f64) -> Result<(), SceneError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SceneError::invalid(format!(
                "dt must be finite and non-negative, got {dt}"
            )));
        }
        let now = self.elapsed + dt;
        for (index, particle) in self.particles.iter_mut().enumerate() {
            if !particle.is_moving() {
                continue;
            }
            let outcome = particle.step(dt, &self.params);
            particle.last_update = now;
            if outcome.collided() {
                log::debug!(
                    "particles: #{index} hit wall on axes {:?}",
                    outcome.collisions
                );
            }
            if outcome.settled {
                log::debug!("particles: #{index} settled at t={now:.3}");
            }
        }
        self.elapsed = now;
        Ok(())
    }

    /// A wall-clock source clamped to this session's `max_frame_dt`.
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.params.max_frame_dt)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Session time accumulated over all steps.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn moving_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_moving()).count()
    }

    pub fn settled_count(&self) -> usize {
        self.particles.len() - self.moving_count()
    }
}

impl Engine for ParticleSystem {
    fn step(&mut self, dt: f64) -> Result<(), SceneError> {
        ParticleSystem::step(self, dt)
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "box_size": p.box_size,
            "gravity": p.gravity,
            "drag": p.drag,
            "wall_hardness": p.wall_hardness,
            "stop_threshold": p.stop_threshold,
            "min_radius": p.min_radius,
            "max_radius": p.max_radius,
            "max_speed": p.max_speed,
            "count": p.count,
            "collision": p.collision.name(),
            "max_frame_dt": p.max_frame_dt,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "box_size": {
                "type": "number",
                "default": DEFAULT_BOX_SIZE,
                "description": "Half-extent of the containing cube"
            },
            "gravity": {
                "type": "number",
                "default": DEFAULT_GRAVITY,
                "description": "Vertical acceleration; negative pulls toward the floor"
            },
            "drag": {
                "type": "number",
                "default": DEFAULT_DRAG,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of velocity retained per second"
            },
            "wall_hardness": {
                "type": "number",
                "default": DEFAULT_WALL_HARDNESS,
                "min": 0.0,
                "max": 1.0,
                "description": "Restitution of the reflected velocity on wall contact"
            },
            "stop_threshold": {
                "type": "number",
                "default": DEFAULT_STOP_THRESHOLD,
                "description": "Per-axis speed below which a particle on the floor settles"
            },
            "min_radius": {
                "type": "number",
                "default": DEFAULT_MIN_RADIUS,
                "description": "Smallest spawned sphere radius"
            },
            "max_radius": {
                "type": "number",
                "default": DEFAULT_MAX_RADIUS,
                "description": "Largest spawned sphere radius; must be below box_size"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "description": "Initial speed of spawned particles"
            },
            "count": {
                "type": "integer",
                "default": DEFAULT_COUNT,
                "min": 0,
                "description": "Particles spawned at session start"
            },
            "collision": {
                "type": "string",
                "default": CollisionBounds::default().name(),
                "options": ["radius_adjusted", "centre"],
                "description": "Clamp sphere surfaces or only centres to the walls"
            },
            "max_frame_dt": {
                "type": "number",
                "default": DEFAULT_MAX_FRAME_DT,
                "description": "Largest wall-clock frame delta a FrameClock reports"
            }
        })
    }

    fn summary(&self) -> Value {
        json!({
            "engine": "particles",
            "seed": self.seed,
            "particles": self.particles.len(),
            "moving": self.moving_count(),
            "settled": self.settled_count(),
            "elapsed": self.elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    // ---- Params ----

    #[test]
    fn default_params_are_valid() {
        assert!(ParticleParams::default().validate().is_ok());
    }

    #[test]
    fn from_json_uses_defaults_for_empty_json() {
        let params = ParticleParams::from_json(&json!({})).unwrap();
        assert_eq!(params, ParticleParams::default());
    }

    #[test]
    fn from_json_extracts_custom_values() {
        let params = ParticleParams::from_json(&json!({
            "gravity": -9.8,
            "count": 3,
            "collision": "centre",
            "wall_hardness": 0.5,
        }))
        .unwrap();
        assert!((params.gravity + 9.8).abs() < f64::EPSILON);
        assert_eq!(params.count, 3);
        assert_eq!(params.collision, CollisionBounds::Centre);
        assert!((params.wall_hardness - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn from_json_rejects_unknown_collision() {
        let err = ParticleParams::from_json(&json!({"collision": "sticky"})).unwrap_err();
        assert!(err.to_string().contains("collision"), "got: {err}");
    }

    #[test]
    fn from_json_rejects_malformed_count() {
        for count in [json!(-2), json!(1.5), json!("ten")] {
            let result = ParticleParams::from_json(&json!({ "count": count }));
            assert!(
                matches!(result, Err(SceneError::InvalidParameter(_))),
                "count {count} accepted"
            );
        }
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let cases = [
            ParticleParams {
                min_radius: 0.3,
                max_radius: 0.2,
                ..ParticleParams::default()
            },
            ParticleParams {
                max_radius: 1.0,
                ..ParticleParams::default()
            },
            ParticleParams {
                drag: 0.0,
                ..ParticleParams::default()
            },
            ParticleParams {
                drag: 1.5,
                ..ParticleParams::default()
            },
            ParticleParams {
                wall_hardness: -0.1,
                ..ParticleParams::default()
            },
            ParticleParams {
                box_size: 0.0,
                ..ParticleParams::default()
            },
            ParticleParams {
                stop_threshold: 0.0,
                ..ParticleParams::default()
            },
            ParticleParams {
                gravity: f64::NAN,
                ..ParticleParams::default()
            },
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(SceneError::InvalidParameter(_))),
                "accepted {params:?}"
            );
        }
    }

    #[test]
    fn params_round_trip_through_json() {
        let params = ParticleParams {
            count: 4,
            collision: CollisionBounds::Centre,
            ..ParticleParams::default()
        };
        let system = ParticleSystem::new(1, params.clone()).unwrap();
        let reparsed = ParticleParams::from_json(&Engine::params(&system)).unwrap();
        assert_eq!(reparsed, params);
    }

    #[test]
    fn param_schema_lists_every_param() {
        let system = ParticleSystem::new(1, ParticleParams::default()).unwrap();
        let schema = system.param_schema();
        for key in Engine::params(&system).as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    // ---- Session ----

    #[test]
    fn new_spawns_configured_count() {
        let system = ParticleSystem::new(7, ParticleParams::default()).unwrap();
        assert_eq!(system.particles().len(), DEFAULT_COUNT);
        assert_eq!(system.moving_count(), DEFAULT_COUNT);
        assert_eq!(system.settled_count(), 0);
        assert_eq!(system.elapsed(), 0.0);
    }

    #[test]
    fn invalid_params_are_rejected_before_spawning() {
        let params = ParticleParams {
            drag: 2.0,
            ..ParticleParams::default()
        };
        assert!(ParticleSystem::new(1, params).is_err());
    }

    #[test]
    fn spawn_appends_and_stamps_current_time() {
        let mut system = ParticleSystem::new(3, ParticleParams::default()).unwrap();
        for _ in 0..6 {
            system.step(DT).unwrap();
        }
        system.spawn(2);
        assert_eq!(system.particles().len(), DEFAULT_COUNT + 2);
        let last = system.particles().last().unwrap();
        assert!((last.last_update - 6.0 * DT).abs() < 1e-12);
    }

    #[test]
    fn step_accumulates_elapsed_and_stamps_moving_particles() {
        let mut system = ParticleSystem::new(3, ParticleParams::default()).unwrap();
        system.step(0.01).unwrap();
        system.step(0.02).unwrap();
        assert!((system.elapsed() - 0.03).abs() < 1e-12);
        for p in system.particles() {
            assert!((p.last_update - 0.03).abs() < 1e-12);
        }
    }

    #[test]
    fn step_rejects_negative_and_non_finite_dt() {
        let mut system = ParticleSystem::new(3, ParticleParams::default()).unwrap();
        let before = system.particles().to_vec();
        for dt in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(system.step(dt).is_err());
        }
        assert_eq!(system.particles(), before.as_slice());
        assert_eq!(system.elapsed(), 0.0);
    }

    #[test]
    fn every_particle_eventually_settles_on_the_floor() {
        let mut system = ParticleSystem::new(11, ParticleParams::default()).unwrap();
        let mut ticks = 0;
        while system.moving_count() > 0 && ticks < 5_000 {
            system.step(DT).unwrap();
            ticks += 1;
        }
        assert_eq!(system.settled_count(), DEFAULT_COUNT, "after {ticks} ticks");
        for p in system.particles() {
            let floor = -(system.params().box_size - p.radius());
            assert_eq!(p.position.y, floor);
            assert_eq!(p.velocity, glam::DVec3::ZERO);
        }
    }

    #[test]
    fn settled_particles_keep_their_last_update() {
        let mut system = ParticleSystem::new(11, ParticleParams::default()).unwrap();
        while system.moving_count() > 0 {
            system.step(DT).unwrap();
        }
        let stamps: Vec<f64> = system.particles().iter().map(|p| p.last_update).collect();
        system.step(DT).unwrap();
        let after: Vec<f64> = system.particles().iter().map(|p| p.last_update).collect();
        assert_eq!(stamps, after);
    }

    #[test]
    fn frame_clock_uses_session_limit() {
        let params = ParticleParams {
            max_frame_dt: 0.1,
            ..ParticleParams::default()
        };
        let system = ParticleSystem::new(5, params).unwrap();
        let mut clock = system.frame_clock();
        let t0 = std::time::Instant::now();
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 + std::time::Duration::from_secs(1)), 0.1);
    }

    // ---- Determinism ----

    #[test]
    fn same_seed_same_trajectories() {
        let mut a = ParticleSystem::new(99, ParticleParams::default()).unwrap();
        let mut b = ParticleSystem::new(99, ParticleParams::default()).unwrap();
        for _ in 0..120 {
            a.step(DT).unwrap();
            b.step(DT).unwrap();
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn different_seed_different_spawns() {
        let a = ParticleSystem::new(1, ParticleParams::default()).unwrap();
        let b = ParticleSystem::new(2, ParticleParams::default()).unwrap();
        assert_ne!(a.particles(), b.particles());
    }

    // ---- Engine trait ----

    #[test]
    fn summary_reports_counts() {
        let mut system = ParticleSystem::new(5, ParticleParams::default()).unwrap();
        Engine::step(&mut system, DT).unwrap();
        let s = system.summary();
        assert_eq!(s["engine"], "particles");
        assert_eq!(s["particles"], DEFAULT_COUNT);
        assert_eq!(s["moving"], DEFAULT_COUNT);
        assert_eq!(s["settled"], 0);
    }

    #[test]
    fn system_is_object_safe() {
        let system = ParticleSystem::new(5, ParticleParams::default()).unwrap();
        let boxed: Box<dyn Engine> = Box::new(system);
        assert_eq!(boxed.summary()["seed"], 5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn particles_stay_inside_the_box(
                seed: u64,
                count in 1_usize..20,
                dt in 0.001_f64..0.1,
                centre in proptest::bool::ANY,
            ) {
                let params = ParticleParams {
                    count,
                    collision: if centre { CollisionBounds::Centre } else { CollisionBounds::RadiusAdjusted },
                    ..ParticleParams::default()
                };
                let mut system = ParticleSystem::new(seed, params).unwrap();
                for _ in 0..200 {
                    system.step(dt).unwrap();
                    for p in system.particles() {
                        let limit = system.params().collision.limit(system.params().box_size, p.radius());
                        prop_assert!(p.position.abs().max_element() <= limit);
                    }
                }
            }

            #[test]
            fn settled_count_never_decreases(seed: u64) {
                let mut system = ParticleSystem::new(seed, ParticleParams::default()).unwrap();
                let mut settled = 0;
                for _ in 0..600 {
                    system.step(DT).unwrap();
                    prop_assert!(system.settled_count() >= settled);
                    settled = system.settled_count();
                }
            }
        }
    }
}

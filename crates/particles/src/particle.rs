//! A single spherical particle and its integration step.

use faultline_core::{Srgb, Xorshift64};
use glam::DVec3;
use serde::Serialize;

use crate::ParticleParams;

/// Which boundary the particle centre is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionBounds {
    /// `±(box_size - radius)`: the whole sphere stays inside the box.
    #[default]
    RadiusAdjusted,
    /// `±box_size`: the centre stays inside and the sphere may clip the walls.
    Centre,
}

impl CollisionBounds {
    /// Half-extent available to the centre of a sphere of `radius`.
    pub fn limit(self, box_size: f64, radius: f64) -> f64 {
        match self {
            CollisionBounds::RadiusAdjusted => box_size - radius,
            CollisionBounds::Centre => box_size,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CollisionBounds::RadiusAdjusted => "radius_adjusted",
            CollisionBounds::Centre => "centre",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "radius_adjusted" => Some(CollisionBounds::RadiusAdjusted),
            "centre" | "center" => Some(CollisionBounds::Centre),
            _ => None,
        }
    }
}

/// Lifecycle of a particle. `Settled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleState {
    Moving,
    Settled,
}

/// What happened during one [`Particle::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Per-axis (x, y, z) wall hits.
    pub collisions: [bool; 3],
    /// True if the centre ended the step on the floor.
    pub floor_contact: bool,
    /// True if this step moved the particle to `Settled`.
    pub settled: bool,
}

impl StepOutcome {
    pub fn collided(&self) -> bool {
        self.collisions.iter().any(|&c| c)
    }
}

/// A sphere bouncing inside an axis-aligned cube of half-extent `box_size`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub position: DVec3,
    pub velocity: DVec3,
    pub acceleration: DVec3,
    radius: f64,
    color: Srgb,
    state: ParticleState,
    /// Session time (seconds) of the last integration applied.
    pub last_update: f64,
}

impl Particle {
    /// Builds a moving particle with explicit state.
    ///
    /// `acceleration` is set to `(0, params.gravity, 0)`.
    pub fn new(
        position: DVec3,
        velocity: DVec3,
        radius: f64,
        color: Srgb,
        params: &ParticleParams,
    ) -> Self {
        Self {
            position,
            velocity,
            acceleration: DVec3::new(0.0, params.gravity, 0.0),
            radius,
            color,
            state: ParticleState::Moving,
            last_update: 0.0,
        }
    }

    /// Draws a random particle: radius uniform in `[min_radius, max_radius]`,
    /// position uniform over the region its centre may occupy, velocity of
    /// magnitude `max_speed` in a uniformly random direction, random color.
    pub fn spawn(params: &ParticleParams, rng: &mut Xorshift64) -> Self {
        let radius = rng.next_range(params.min_radius, params.max_radius);
        let limit = params.collision.limit(params.box_size, radius);
        let position = DVec3::new(
            rng.next_range(-limit, limit),
            rng.next_range(-limit, limit),
            rng.next_range(-limit, limit),
        );
        let velocity = rng.next_unit_vector() * params.max_speed;
        let color = Srgb::random(rng);
        Self::new(position, velocity, radius, color, params)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Srgb {
        self.color
    }

    pub fn state(&self) -> ParticleState {
        self.state
    }

    pub fn is_moving(&self) -> bool {
        self.state == ParticleState::Moving
    }

    /// Advances the particle by `dt` seconds.
    ///
    /// In order: velocity decays by `drag^dt` and gains `acceleration * dt`;
    /// position advances by the new velocity; each axis past the boundary is
    /// clamped to it with its velocity reflected and scaled by
    /// `wall_hardness`; finally, if the particle rests on the floor with every
    /// velocity component below `stop_threshold`, its velocity is zeroed and
    /// it becomes `Settled`. Settled particles are left untouched.
    pub fn step(&mut self, dt: f64, params: &ParticleParams) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.state == ParticleState::Settled {
            return outcome;
        }

        self.velocity = self.velocity * params.drag.powf(dt) + self.acceleration * dt;
        self.position += self.velocity * dt;

        let limit = params.collision.limit(params.box_size, self.radius);
        for axis in 0..3 {
            let p = self.position[axis];
            if p > limit || p < -limit {
                self.position[axis] = if p > limit { limit } else { -limit };
                self.velocity[axis] *= -params.wall_hardness;
                outcome.collisions[axis] = true;
            }
        }

        outcome.floor_contact = self.position.y <= -limit;
        if outcome.floor_contact && self.velocity.abs().max_element() < params.stop_threshold {
            self.velocity = DVec3::ZERO;
            self.state = ParticleState::Settled;
            outcome.settled = true;
        }
        outcome
    }
}

#![deny(unsafe_code)]
//! Core types and traits for the faultline geometry producers.
//!
//! Provides the `Engine` trait, the `SceneError` taxonomy, the `Xorshift64`
//! PRNG that every random draw flows through, the reproducible `Seed` run
//! description, the `Srgb` color type, and JSON parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod params;
pub mod prng;
pub mod seed;

pub use color::Srgb;
pub use engine::Engine;
pub use error::SceneError;
pub use prng::Xorshift64;
pub use seed::Seed;

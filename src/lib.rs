// src/lib.rs
//! Octahedral tilting of perovskite structures, expressed as Euler angles
//! per metal-centered octahedron.

pub mod config;
pub mod model;
pub mod physics;
pub mod utils;

pub use config::{ConfigError, TiltingConfig};
pub use model::{Atom, SiteRole, Structure};
pub use physics::tilting::{compute_tilting, Tilting, TiltingAnalysis, TiltingEngine, TiltingError};

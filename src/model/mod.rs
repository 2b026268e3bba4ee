//src/model/mod.rs
pub mod structure;
pub mod elements;
pub mod symmetry;

// Re-exports for cleaner imports
pub use structure::{Atom, Structure};
pub use elements::SiteRole;
pub use symmetry::{refine, AsGiven, MoyoPrimitive, SymmetryPrimitive};

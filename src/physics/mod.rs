// src/physics/mod.rs

pub mod tilting;

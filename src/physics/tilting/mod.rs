// src/physics/tilting/mod.rs
// Octahedral tilting in perovskites as ZYZ Euler angles per octahedron

pub mod aggregate;
pub mod euler;
pub mod octahedra;
pub mod planes;


use crate::config::TiltingConfig;
use crate::model::structure::Structure;
use crate::model::symmetry::{self, MoyoPrimitive, SymmetryPrimitive};
use octahedra::{Octahedron, VirtualAtomSet};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// [alpha, beta, gamma] in degrees
pub type Tilting = [f64; 3];

#[derive(Debug, thiserror::Error)]
pub enum TiltingError {
    #[error("Cell refinement error: {0}")]
    CellRefinement(String),
    #[error("Cannot extract valid octahedra: not enough corner atoms found")]
    NoOctahedraFound,
}

/// Everything produced by one tilting run
#[derive(Debug, Clone)]
pub struct TiltingAnalysis {
    /// Final angles per octahedron (1-based center index), rounded and deduplicated
    pub angles: BTreeMap<usize, Tilting>,
    /// Unrounded triples of every candidate plane, for every octahedron
    pub precise: BTreeMap<usize, Vec<Tilting>>,
    pub octahedra: Vec<Octahedron>,
    /// Refined, Z-oriented cell the indices refer to
    pub refined: Structure,
}

pub struct TiltingEngine {
    config: TiltingConfig,
    primitive: Box<dyn SymmetryPrimitive>,
}

impl Default for TiltingEngine {
    fn default() -> Self {
        Self::new(TiltingConfig::default())
    }
}

impl TiltingEngine {
    pub fn new(config: TiltingConfig) -> Self {
        Self::with_primitive(config, Box::new(MoyoPrimitive))
    }

    pub fn with_primitive(config: TiltingConfig, primitive: Box<dyn SymmetryPrimitive>) -> Self {
        Self { config, primitive }
    }

    pub fn config(&self) -> &TiltingConfig {
        &self.config
    }

    /// Runs the whole pipeline: refine, detect, select planes, extract, aggregate.
    pub fn analyze(&self, structure: &Structure) -> Result<TiltingAnalysis, TiltingError> {
        let cfg = &self.config;

        let refined = symmetry::refine(
            structure,
            self.primitive.as_ref(),
            cfg.symprec,
            cfg.angle_tolerance,
        )
        .map_err(TiltingError::CellRefinement)?;

        // Owned by this call only; the extractor may nudge Z values in place
        let mut atoms = VirtualAtomSet::build(&refined, cfg);
        let octahedra = octahedra::detect(&refined, &atoms, cfg)?;

        let mut precise = BTreeMap::new();
        let mut raw = BTreeMap::new();

        for oct in &octahedra {
            let id = oct.center + 1;
            let planes = planes::select_planes(oct, &atoms, cfg.z_difference);
            if planes.is_empty() {
                log::warn!("No tilt plane for octahedron #{}, skipped", id);
                continue;
            }

            let candidates: Vec<Tilting> = planes
                .iter()
                .map(|plane| {
                    let t = euler::extract(plane, &mut atoms, cfg.max_tilting_degree);
                    log::debug!("Octahedron #{} plane {:?}: {:?}", id, plane.0, t);
                    t
                })
                .collect();

            if let Some(t) = aggregate::aggregate(id, &candidates) {
                raw.insert(id, t);
            }
            precise.insert(id, candidates);
        }

        let angles = aggregate::deduplicate(&raw);
        log::info!(
            "Tilting: {} octahedra found, {} unique result(s)",
            octahedra.len(),
            angles.len()
        );

        Ok(TiltingAnalysis {
            angles,
            precise,
            octahedra,
            refined,
        })
    }

    pub fn compute(&self, structure: &Structure) -> Result<BTreeMap<usize, Tilting>, TiltingError> {
        self.analyze(structure).map(|a| a.angles)
    }

    /// Independent structures in parallel; a failure does not affect the others.
    pub fn analyze_many(&self, structures: &[Structure]) -> Vec<Result<TiltingAnalysis, TiltingError>> {
        structures.par_iter().map(|s| self.analyze(s)).collect()
    }

    pub fn compute_many(
        &self,
        structures: &[Structure],
    ) -> Vec<Result<BTreeMap<usize, Tilting>, TiltingError>> {
        structures.par_iter().map(|s| self.compute(s)).collect()
    }
}

/// Tilting with default settings and moyo cell refinement.
pub fn compute_tilting(structure: &Structure) -> Result<BTreeMap<usize, Tilting>, TiltingError> {
    TiltingEngine::default().compute(structure)
}

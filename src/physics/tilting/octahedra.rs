// src/physics/tilting/octahedra.rs
// Periodic replication of corner atoms and center/corner grouping

use super::TiltingError;
use crate::config::TiltingConfig;
use crate::model::elements::SiteRole;
use crate::model::structure::Structure;
use crate::utils::geometry::calculate_distance;
use crate::utils::linalg::frac_to_cart;

/// In-plane lattice offsets applied to every corner-capable atom
pub const SHIFTS_AB: [[f64; 3]; 8] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [-1.0, 1.0, 0.0],
];

/// Out-of-plane offsets, only for bulk (3D periodic) cells
pub const SHIFTS_C: [[f64; 3]; 2] = [[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]];

/// Working copy of the structure's atoms followed by periodic images of
/// the corner-capable ones. Index `i < structure.atoms.len()` is the
/// original atom `i`.
#[derive(Debug, Clone)]
pub struct VirtualAtomSet {
    elements: Vec<String>,
    positions: Vec<[f64; 3]>,
}

impl VirtualAtomSet {
    pub fn build(structure: &Structure, config: &TiltingConfig) -> Self {
        let mut set = Self {
            elements: structure.atoms.iter().map(|a| a.element.clone()).collect(),
            positions: structure.atoms.iter().map(|a| a.position).collect(),
        };

        let shifts: Vec<[f64; 3]> = if structure.periodicity == 3 {
            SHIFTS_AB.iter().chain(SHIFTS_C.iter()).copied().collect()
        } else {
            SHIFTS_AB.to_vec()
        };

        for atom in &structure.atoms {
            if !config.is_corner(&atom.element) {
                continue;
            }
            for shift in &shifts {
                let t = frac_to_cart(*shift, structure.lattice);
                set.push(
                    &atom.element,
                    [
                        atom.position[0] + t[0],
                        atom.position[1] + t[1],
                        atom.position[2] + t[2],
                    ],
                );
            }
        }

        set
    }

    fn push(&mut self, element: &str, position: [f64; 3]) -> usize {
        self.elements.push(element.to_string());
        self.positions.push(position);
        self.positions.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn element(&self, idx: usize) -> &str {
        &self.elements[idx]
    }

    pub fn position(&self, idx: usize) -> [f64; 3] {
        self.positions[idx]
    }

    pub fn z(&self, idx: usize) -> f64 {
        self.positions[idx][2]
    }

    /// Moves an atom along Z. Only used by the degenerate-plane guard.
    pub fn set_z(&mut self, idx: usize, z: f64) {
        self.positions[idx][2] = z;
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        calculate_distance(self.positions[i], self.positions[j])
    }
}

/// A center atom with its 5 or 6 corners (indices into the VirtualAtomSet)
#[derive(Debug, Clone, PartialEq)]
pub struct Octahedron {
    pub center: usize,
    pub corners: Vec<usize>,
}

/// Collects octahedra around every center-capable atom of `structure`.
pub fn detect(
    structure: &Structure,
    virtual_atoms: &VirtualAtomSet,
    config: &TiltingConfig,
) -> Result<Vec<Octahedron>, TiltingError> {
    let mut octahedra = Vec::new();

    for (n, atom) in structure.atoms.iter().enumerate() {
        // species listed as both still act as corners of other centers
        if config.role_of(&atom.element) != Some(SiteRole::Center) {
            continue;
        }

        let corners: Vec<usize> = (0..virtual_atoms.len())
            .filter(|&m| m != n && config.is_corner(virtual_atoms.element(m)))
            .filter(|&m| virtual_atoms.distance(n, m) <= config.bond_length_limit)
            .collect();

        let accepted = match structure.periodicity {
            3 => corners.len() == 6,
            2 => corners.len() == 5 || corners.len() == 6,
            _ => false,
        };

        if accepted {
            log::debug!("Octahedron around {} #{}: corners {:?}", atom.element, n + 1, corners);
            octahedra.push(Octahedron { center: n, corners });
        } else {
            log::debug!(
                "{} #{} has {} corners within {} Å, skipped",
                atom.element,
                n + 1,
                corners.len(),
                config.bond_length_limit
            );
        }
    }

    if octahedra.is_empty() {
        return Err(TiltingError::NoOctahedraFound);
    }
    Ok(octahedra)
}

// src/model/symmetry.rs

use crate::model::{Atom, Structure};
use crate::utils::linalg::{axis_onto_z, cart_to_frac, lattice_matrix, rotate};
use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::Vector3;

/// Minimal margin (Angstroms) by which c must exceed a and b to count as longest
const AXIS_LENGTH_MARGIN: f64 = 1e-6;

/// Black-box cell refinement: raw structure in, conventional cell out.
pub trait SymmetryPrimitive: Send + Sync {
    fn refine_cell(
        &self,
        structure: &Structure,
        symprec: f64,
        angle_tolerance: f64,
    ) -> Result<Structure, String>;
}

/// Standardization through moyo (spglib-compatible setting)
#[derive(Debug, Clone, Copy, Default)]
pub struct MoyoPrimitive;

/// Structure is already a refined conventional cell; returned untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsGiven;

impl SymmetryPrimitive for AsGiven {
    fn refine_cell(&self, structure: &Structure, _: f64, _: f64) -> Result<Structure, String> {
        if structure.atoms.is_empty() {
            return Err("Structure contains no atoms".to_string());
        }
        Ok(structure.clone())
    }
}

impl SymmetryPrimitive for MoyoPrimitive {
    fn refine_cell(
        &self,
        structure: &Structure,
        symprec: f64,
        angle_tolerance: f64,
    ) -> Result<Structure, String> {
        if structure.atoms.is_empty() {
            return Err("Structure contains no atoms".to_string());
        }

        // 1. Cartesian -> Fractional, species -> 1-based type ids
        let mut positions = Vec::with_capacity(structure.atoms.len());
        let mut numbers = Vec::with_capacity(structure.atoms.len());
        let mut unique_elements: Vec<String> = Vec::new();

        for atom in &structure.atoms {
            let frac = cart_to_frac(atom.position, structure.lattice)
                .ok_or("Invalid lattice (determinant is zero)")?;
            positions.push(Vector3::from(frac));

            let id = match unique_elements.iter().position(|e| *e == atom.element) {
                Some(i) => i,
                None => {
                    unique_elements.push(atom.element.clone());
                    unique_elements.len() - 1
                }
            };
            numbers.push(id as i32 + 1);
        }

        // moyo expects lattice vectors as columns
        let basis = lattice_matrix(structure.lattice).transpose();
        let cell = Cell::new(Lattice::new(basis), positions, numbers);

        // 2. Run moyo with standardization of the cell
        let dataset = MoyoDataset::new(
            &cell,
            symprec,
            AngleTolerance::Radian(angle_tolerance.to_radians()),
            Setting::Spglib,
            true,
        )
        .map_err(|e| format!("Moyo symmetry search failed: {:?}", e))?;

        log::debug!("Refined cell: space group {}", dataset.number);

        // 3. Back to Cartesian. basis.column(i) is the i-th lattice vector
        let std_cell = dataset.std_cell;
        let basis = std_cell.lattice.basis;
        let mut lattice = [[0.0; 3]; 3];
        for (i, row) in lattice.iter_mut().enumerate() {
            let col = basis.column(i);
            *row = [col[0], col[1], col[2]];
        }

        let mut atoms = Vec::with_capacity(std_cell.positions.len());
        for (pos_frac, &type_id) in std_cell.positions.iter().zip(std_cell.numbers.iter()) {
            let element = usize::try_from(type_id - 1)
                .ok()
                .and_then(|i| unique_elements.get(i))
                .cloned()
                .ok_or_else(|| format!("Unknown species id {} in refined cell", type_id))?;
            let cart = basis * pos_frac;
            atoms.push(Atom {
                element,
                position: [cart.x, cart.y, cart.z],
            });
        }

        Ok(Structure {
            lattice,
            atoms,
            periodicity: structure.periodicity,
        })
    }
}

/// Refine the cell and make the longest lattice vector point along Z.
pub fn refine(
    structure: &Structure,
    primitive: &dyn SymmetryPrimitive,
    symprec: f64,
    angle_tolerance: f64,
) -> Result<Structure, String> {
    let mut refined = primitive.refine_cell(structure, symprec, angle_tolerance)?;
    if let Some(axis) = orient_longest_axis_along_z(&mut refined) {
        log::debug!("Cell rotated: axis {} moved onto z", ["x", "y"][axis]);
    }
    Ok(refined)
}

/// Rotates lattice and atoms so that the longest of a, b lies along Z when
/// c is not the strictly longest vector. Returns the Cartesian axis moved.
pub fn orient_longest_axis_along_z(structure: &mut Structure) -> Option<usize> {
    let l = structure.lattice_lengths();
    if l[2] - l[0] > AXIS_LENGTH_MARGIN && l[2] - l[1] > AXIS_LENGTH_MARGIN {
        return None;
    }

    let axis = if l[0] >= l[1] { 0 } else { 1 };
    let rotation = axis_onto_z(axis);

    for row in structure.lattice.iter_mut() {
        *row = rotate(&rotation, *row);
    }
    for atom in structure.atoms.iter_mut() {
        atom.position = rotate(&rotation, atom.position);
    }
    Some(axis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srtio3(a: f64) -> Structure {
        Structure::new(
            [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]],
            vec![
                Atom::new("Ti", [0.0, 0.0, 0.0]),
                Atom::new("Sr", [a / 2.0, a / 2.0, a / 2.0]),
                Atom::new("O", [a / 2.0, 0.0, 0.0]),
                Atom::new("O", [0.0, a / 2.0, 0.0]),
                Atom::new("O", [0.0, 0.0, a / 2.0]),
            ],
            3,
        )
    }

    #[test]
    fn test_c_longest_untouched() {
        let mut s = srtio3(3.9);
        s.lattice[2] = [0.0, 0.0, 7.8];
        let before = s.clone();
        assert_eq!(orient_longest_axis_along_z(&mut s), None);
        assert_eq!(s, before);
    }

    #[test]
    fn test_cubic_cell_rotates_x_onto_z() {
        let mut s = srtio3(3.9);
        assert_eq!(orient_longest_axis_along_z(&mut s), Some(0));
        assert_eq!(s.lattice[0], [0.0, 0.0, 3.9]);
        assert_eq!(s.lattice[2], [-3.9, 0.0, 0.0]);
        // O on +x now sits on +z
        assert_eq!(s.atoms[2].position, [0.0, 0.0, 1.95]);
    }

    #[test]
    fn test_b_longest_rotates_y_onto_z() {
        let mut s = srtio3(3.9);
        s.lattice[1] = [0.0, 7.8, 0.0];
        assert_eq!(orient_longest_axis_along_z(&mut s), Some(1));
        assert_eq!(s.lattice[1], [0.0, 0.0, 7.8]);
        assert_eq!(s.lattice[2], [0.0, -3.9, 0.0]);
        assert_eq!(s.atoms[3].position, [0.0, 0.0, 1.95]);
    }

    #[test]
    fn test_as_given_rejects_empty() {
        let s = Structure::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], vec![], 3);
        assert!(AsGiven.refine_cell(&s, 1e-4, 4.0).is_err());
        assert!(refine(&s, &MoyoPrimitive, 1e-4, 4.0).is_err());
    }

    #[test]
    fn test_moyo_keeps_cubic_perovskite() {
        let s = srtio3(3.905);
        let refined = refine(&s, &MoyoPrimitive, 1e-4, 4.0).unwrap();
        assert_eq!(refined.atoms.len(), 5);
        assert_eq!(refined.periodicity, 3);
        let l = refined.lattice_lengths();
        for len in l {
            assert!((len - 3.905).abs() < 1e-6);
        }
        assert_eq!(refined.atoms.iter().filter(|a| a.element == "O").count(), 3);
    }

    #[test]
    fn test_moyo_singular_lattice() {
        let mut s = srtio3(3.9);
        s.lattice[1] = [3.9, 0.0, 0.0];
        assert!(MoyoPrimitive.refine_cell(&s, 1e-4, 4.0).is_err());
    }
}

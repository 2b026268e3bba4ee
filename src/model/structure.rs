// src/model/structure.rs

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: &str, position: [f64; 3]) -> Self {
        Self {
            element: element.to_string(),
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
    // Number of periodic directions: 3 for bulk, 2 for slabs
    #[serde(default = "default_periodicity")]
    pub periodicity: u8,
}

fn default_periodicity() -> u8 {
    3
}

impl Structure {
    pub fn new(lattice: [[f64; 3]; 3], atoms: Vec<Atom>, periodicity: u8) -> Self {
        Self {
            lattice,
            atoms,
            periodicity,
        }
    }

    /// Lengths of the a, b, c lattice vectors (Angstroms)
    pub fn lattice_lengths(&self) -> [f64; 3] {
        let len = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        [
            len(self.lattice[0]),
            len(self.lattice[1]),
            len(self.lattice[2]),
        ]
    }

    /// Formula string in alphabetical order, e.g. "O3SrTi"
    pub fn formula(&self) -> String {
        let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(el, count)| {
                if count > 1 {
                    format!("{}{}", el, count)
                } else {
                    el.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodicity_defaults_to_bulk() {
        let json = r#"{
            "lattice": [[3.9, 0.0, 0.0], [0.0, 3.9, 0.0], [0.0, 0.0, 3.9]],
            "atoms": [{"element": "Ti", "position": [0.0, 0.0, 0.0]}]
        }"#;
        let s: Structure = serde_json::from_str(json).unwrap();
        assert_eq!(s.periodicity, 3);
        assert_eq!(s.atoms[0].element, "Ti");
    }

    #[test]
    fn test_formula_and_lengths() {
        let s = Structure::new(
            [[3.0, 4.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 7.0]],
            vec![
                Atom::new("Sr", [0.0; 3]),
                Atom::new("Ti", [0.5; 3]),
                Atom::new("O", [0.5, 0.0, 0.0]),
                Atom::new("O", [0.0, 0.5, 0.0]),
                Atom::new("O", [0.0, 0.0, 0.5]),
            ],
            3,
        );
        assert_eq!(s.formula(), "O3SrTi");
        let l = s.lattice_lengths();
        assert!((l[0] - 5.0).abs() < 1e-12);
        assert!((l[1] - 2.0).abs() < 1e-12);
        assert!((l[2] - 7.0).abs() < 1e-12);
    }
}

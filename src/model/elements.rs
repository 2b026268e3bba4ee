// src/model/elements.rs

/// B-site species able to sit in the center of a corner-sharing octahedron
pub const CENTER_SPECIES: &[&str] = &[
    // --- 3d ---
    "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga",
    // --- 4d ---
    "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb",
    // --- 5d ---
    "Hf", "Ta", "W", "Re",
    // --- Others seen on the B site ---
    "Se", "La", "Pr",
];

/// X-site species forming the octahedron corners
pub const CORNER_SPECIES: &[&str] = &["O", "F"];

/// Role an atom plays when octahedra are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteRole {
    Center,
    Corner,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_disjoint() {
        for c in CORNER_SPECIES {
            assert!(!CENTER_SPECIES.contains(c));
        }
        assert!(CENTER_SPECIES.contains(&"Ti"));
        assert!(CENTER_SPECIES.contains(&"Hf"));
    }
}

// src/utils/report.rs

use crate::physics::tilting::{Tilting, TiltingAnalysis};

fn format_angles(t: &Tilting) -> String {
    format!("{:?}, {:?}, {:?}", t[0], t[1], t[2])
}

/// Short text result: one "alpha, beta, gamma (index)" line per kept octahedron
pub fn tilting_summary(analysis: &TiltingAnalysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("Formula: {}\n", analysis.refined.formula()));
    out.push_str(&format!(
        "Octahedra found: {} ({} unique)\n",
        analysis.octahedra.len(),
        analysis.angles.len()
    ));

    for (idx, t) in &analysis.angles {
        if t.iter().all(|a| *a == 0.0) {
            out.push_str(&format!("{}\n", format_angles(t)));
        } else {
            out.push_str(&format!("{} ({})\n", format_angles(t), idx));
        }
    }
    out
}

/// Fixed-width table of the kept octahedra
pub fn tilting_table(analysis: &TiltingAnalysis) -> String {
    let mut out = String::new();
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<8} {:>9} {:>9} {:>9} {:>7}\n",
        "Index", "Element", "Alpha", "Beta", "Gamma", "Planes"
    ));
    out.push_str("--------------------------------------------------\n");

    for (idx, t) in &analysis.angles {
        let element = analysis
            .refined
            .atoms
            .get(idx - 1)
            .map(|a| a.element.as_str())
            .unwrap_or("?");
        let planes = analysis.precise.get(idx).map_or(0, |c| c.len());
        out.push_str(&format!(
            "{:<8} {:<8} {:>9.2} {:>9.2} {:>9.2} {:>7}\n",
            idx, element, t[0], t[1], t[2], planes
        ));
    }

    if analysis.angles.len() < analysis.octahedra.len() {
        out.push_str(&format!(
            "{} equivalent octahedra omitted.\n",
            analysis.octahedra.len() - analysis.angles.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structure::{Atom, Structure};
    use crate::physics::tilting::octahedra::Octahedron;
    use std::collections::BTreeMap;

    fn analysis() -> TiltingAnalysis {
        let refined = Structure::new(
            [[8.0, 0.0, 0.0], [0.0, 8.0, 0.0], [0.0, 0.0, 8.0]],
            vec![
                Atom::new("Ti", [0.0, 0.0, 0.0]),
                Atom::new("O", [1.95, 0.0, 0.0]),
                Atom::new("Nb", [4.0, 0.0, 0.0]),
            ],
            3,
        );
        let mut angles = BTreeMap::new();
        angles.insert(1, [0.0, 0.0, 0.0]);
        angles.insert(3, [12.5, 7.25, 3.0]);
        let mut precise = BTreeMap::new();
        precise.insert(1, vec![[0.0, 4.2e-9, 0.0]]);
        precise.insert(3, vec![[12.499, 7.2501, 3.0], [20.0, 20.0, 20.0]]);
        let octahedra = vec![
            Octahedron { center: 0, corners: vec![] },
            Octahedron { center: 2, corners: vec![] },
            Octahedron { center: 5, corners: vec![] },
        ];
        TiltingAnalysis {
            angles,
            precise,
            octahedra,
            refined,
        }
    }

    #[test]
    fn test_summary_lines() {
        let text = tilting_summary(&analysis());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Formula: NbOTi");
        assert_eq!(lines[1], "Octahedra found: 3 (2 unique)");
        assert_eq!(lines[2], "0.0, 0.0, 0.0");
        assert_eq!(lines[3], "12.5, 7.25, 3.0 (3)");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_table_rows() {
        let text = tilting_table(&analysis());
        let rows: Vec<&str> = text.lines().skip(3).collect();
        assert!(rows[0].starts_with("1        Ti"));
        assert!(rows[0].trim_end().ends_with('1'));
        assert!(rows[1].starts_with("3        Nb"));
        assert!(rows[1].contains("12.50"));
        assert!(rows[1].contains("7.25"));
        assert!(rows[1].trim_end().ends_with('2'));
        assert_eq!(rows[2], "1 equivalent octahedra omitted.");
    }
}

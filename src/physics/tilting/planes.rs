// src/physics/tilting/planes.rs
// Candidate equatorial planes of an octahedron from its corner distance map

use super::octahedra::{Octahedron, VirtualAtomSet};

/// Minimal distance gap (Å) telling an apex corner from an in-plane one
const APEX_GAP: f64 = 0.5;

/// Four corner indices forming one candidate equatorial plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltPlane(pub [usize; 4]);

/// Distances from `from` to each of `to`, ascending; ties keep input order
fn distance_map(atoms: &VirtualAtomSet, from: usize, to: &[usize]) -> Vec<(usize, f64)> {
    let mut map: Vec<(usize, f64)> = to.iter().map(|&i| (i, atoms.distance(from, i))).collect();
    map.sort_by(|a, b| a.1.total_cmp(&b.1));
    map
}

/// Derives 1-3 candidate tilt planes for the octahedron.
///
/// The first listed corner is the reference. With 4 other corners
/// (surface-truncated octahedron) there is a single plane; with 5 others
/// three mutually orthogonal planes are proposed. Planes lying flat in Z
/// (consecutive members closer than `z_difference`) are preferred; when
/// none qualifies the unfiltered list is kept.
pub fn select_planes(
    octahedron: &Octahedron,
    atoms: &VirtualAtomSet,
    z_difference: f64,
) -> Vec<TiltPlane> {
    let sequence = &octahedron.corners;
    if sequence.is_empty() {
        return Vec::new();
    }
    let reference = sequence[0];
    let dm = distance_map(atoms, reference, &sequence[1..]);
    let sorted: Vec<usize> = dm.iter().map(|(i, _)| *i).collect();

    let mut planes = Vec::new();

    match dm.len() {
        4 => {
            if dm[3].1 - dm[2].1 < APEX_GAP {
                // reference is the apex, the other four share its distance
                planes.push(TiltPlane([sorted[0], sorted[1], sorted[2], sorted[3]]));
            } else {
                // reference lies in the plane, its opposite corner is the farthest;
                // repeat the test from the nearest remaining corner
                let next = distance_map(atoms, sorted[0], &[sorted[1], sorted[2]]);
                let last_pair = if next[1].1 - next[0].1 < APEX_GAP {
                    [next[0].0, next[1].0]
                } else {
                    [sorted[0], next[1].0]
                };
                planes.push(TiltPlane([reference, sorted[3], last_pair[0], last_pair[1]]));
            }
        }
        5 => {
            let first = [sorted[0], sorted[1], sorted[2], sorted[3]];
            planes.push(TiltPlane(first));

            let in_first = distance_map(atoms, first[0], &first[1..]);
            let opposite = sorted[4];

            planes.push(TiltPlane([reference, opposite, first[0], in_first[2].0]));
            planes.push(TiltPlane([reference, opposite, in_first[0].0, in_first[1].0]));
        }
        _ => {}
    }

    let flat: Vec<TiltPlane> = planes
        .iter()
        .filter(|p| is_flat(p, atoms, z_difference))
        .copied()
        .collect();

    if flat.is_empty() {
        if !planes.is_empty() {
            log::warn!(
                "No flat tilt plane around atom #{}; keeping all {} candidates",
                octahedron.center + 1,
                planes.len()
            );
        }
        planes
    } else {
        flat
    }
}

fn is_flat(plane: &TiltPlane, atoms: &VirtualAtomSet, z_difference: f64) -> bool {
    plane
        .0
        .windows(2)
        .all(|w| (atoms.z(w[0]) - atoms.z(w[1])).abs() < z_difference)
}

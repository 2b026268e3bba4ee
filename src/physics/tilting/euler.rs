// src/physics/tilting/euler.rs
// ZYZ Euler angles of one tilt plane
//
// Reference: Surf. Sci. 602, 3674 (2008), doi:10.1016/j.susc.2008.10.002

use super::octahedra::VirtualAtomSet;
use super::planes::TiltPlane;
use crate::utils::geometry::{calculate_angle, calculate_distance, cross, neg, sub, Point3};

/// Z values closer than this (Å) count as one flat layer
const FLAT_Z_TOLERANCE: f64 = 1e-9;
/// Z offset (Å) applied to a flat plane so the frame does not collapse
const Z_NUDGE: f64 = 1e-10;
/// Replaces a vanishing Z coefficient of the plane equation
const PLANE_C_FLOOR: f64 = 1e-10;
/// An angle this close (degrees) to a checkpoint snaps to zero
const SNAP_TOLERANCE: f64 = 1e-6;

const CHECKPOINTS: [f64; 8] = [45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 360.0];

/// Construction points of a single plane evaluation, addressed by index.
/// Dropped as a whole once the angles are known.
#[derive(Debug, Default)]
struct ScratchArena {
    points: Vec<Point3>,
}

impl ScratchArena {
    fn push(&mut self, p: Point3) -> usize {
        self.points.push(p);
        self.points.len() - 1
    }

    fn get(&self, idx: usize) -> Point3 {
        self.points[idx]
    }
}

/// Extracts [alpha, beta, gamma] (degrees, folded, not rounded) for `plane`.
///
/// A perfectly flat plane gets its members nudged by ±1e-10 Å in Z; the
/// nudge stays in `atoms`.
pub fn extract(plane: &TiltPlane, atoms: &mut VirtualAtomSet, max_tilting_degree: f64) -> [f64; 3] {
    let [p1, a, b, c] = plane.0;

    // nearest -> p4, middle -> p2, farthest (opposite corner) -> p3
    let mut others = [a, b, c].map(|i| (i, atoms.distance(p1, i)));
    others.sort_by(|x, y| x.1.total_cmp(&y.1));
    let (p4, p2, p3) = (others[0].0, others[1].0, others[2].0);

    let z_ref = atoms.z(p1);
    if [p2, p3, p4]
        .iter()
        .all(|&i| (atoms.z(i) - z_ref).abs() <= FLAT_Z_TOLERANCE)
    {
        atoms.set_z(p1, z_ref + Z_NUDGE);
        atoms.set_z(p2, z_ref + Z_NUDGE);
        atoms.set_z(p3, z_ref - Z_NUDGE);
        atoms.set_z(p4, z_ref - Z_NUDGE);
    }

    let mut arena = ScratchArena::default();

    // diagonals 1-3 and 2-4 moved into the origin
    let first_axis = arena.push(sub(atoms.position(p1), atoms.position(p3)));
    let second_axis = arena.push(sub(atoms.position(p2), atoms.position(p4)));
    let origin = arena.push([0.0, 0.0, 0.0]);
    let inverted = neg(arena.get(first_axis));
    let inverted = arena.push(inverted);

    let first = bisector_point(&arena, first_axis, origin, second_axis);
    let second = bisector_point(&arena, second_axis, origin, inverted);
    let (first, second) = canonical_bisectors(first, second);
    let first = arena.push(first);
    let second = arena.push(second);

    // the normal plays the role of the tilted Z axis
    let tilt_z = cross(arena.get(first), arena.get(second));
    let tilt_z = arena.push(tilt_z);

    let b1 = arena.get(first);
    let b2 = arena.get(second);
    let n = arena.get(tilt_z);

    let alpha = b2[2].atan2(b1[2]).to_degrees();
    let beta = (n[0] * n[0] + n[1] * n[1]).sqrt().atan2(n[2]).to_degrees();
    let gamma = n[1].atan2(-n[0]).to_degrees();

    log::trace!("plane {:?}: raw angles [{}, {}, {}]", plane.0, alpha, beta, gamma);

    [alpha, beta, gamma].map(|angle| fold_angle(angle, max_tilting_degree))
}

/// Point where the bisector of angle A-O-B meets segment AB, with Z taken
/// from the plane through A, O and B.
fn bisector_point(arena: &ScratchArena, a: usize, o: usize, b: usize) -> Point3 {
    let [xa, ya, za] = arena.get(a);
    let [xo, yo, zo] = arena.get(o);
    let [xb, yb, zb] = arena.get(b);

    let m = calculate_distance(arena.get(o), arena.get(a));
    let n = calculate_distance(arena.get(o), arena.get(b));

    // bisector length
    let half_angle = calculate_angle(arena.get(a), arena.get(o), arena.get(b)).to_radians() / 2.0;
    let l = 2.0 * m * n * half_angle.cos() / (m + n);
    let v = (n * n - n * l * l / m).sqrt();
    let u = m * v / n;

    // plane A*x + B*y + C*z + D = 0
    let pa = ya * (zo - zb) + yo * (zb - za) + yb * (za - zo);
    let pb = za * (xo - xb) + zo * (xb - xa) + zb * (xa - xo);
    let mut pc = xa * (yo - yb) + xo * (yb - ya) + xb * (ya - yo);
    if pc == 0.0 {
        pc = PLANE_C_FLOOR;
    }
    let pd = -(xa * (yo * zb - yb * zo) + xo * (yb * za - ya * zb) + xb * (ya * zo - yo * za));

    let x = (xa + u * xb / v) / (1.0 + u / v);
    let y = (ya + u * yb / v) / (1.0 + u / v);
    let z = -((pa * x + pb * y + pd) / pc);
    [x, y, z]
}

/// Fixes sign and order of the two bisectors. The branch sequence defines
/// the published angle convention and must stay as is.
fn canonical_bisectors(mut first: Point3, mut second: Point3) -> (Point3, Point3) {
    let mut swap = !(first[0] < 0.0 && second[0] < 0.0);
    if first[0] < 0.0 {
        first = neg(first);
    }
    if second[0] < 0.0 {
        second = neg(second);
    }
    if swap {
        std::mem::swap(&mut first, &mut second);
    }

    swap = false;
    if first[0] < second[0] && first[1] < 0.0 {
        first = neg(first);
        swap = true;
    }
    if first[0] < second[0] && first[1] > 0.0 {
        swap = true;
    }
    if first[0] > second[0] && second[1] < 0.0 {
        second = neg(second);
    }
    if swap {
        std::mem::swap(&mut first, &mut second);
    }

    (first, second)
}

/// Folds an angle into [0, max] around the nearest multiple of 45°.
///
/// NaN (a degenerate plane) is passed through, never folded into range.
pub fn fold_angle(angle: f64, max_tilting_degree: f64) -> f64 {
    if angle.is_nan() {
        log::warn!("Undefined tilting angle (degenerate plane), left as NaN");
        return angle;
    }
    let angle = angle.abs();
    if CHECKPOINTS.iter().any(|c| (angle - c).abs() < SNAP_TOLERANCE) {
        return 0.0;
    }
    if angle <= max_tilting_degree {
        return angle;
    }
    for c in CHECKPOINTS {
        if c - max_tilting_degree < angle && angle < c + max_tilting_degree {
            return (angle - c).abs();
        }
    }
    // between two windows: distance to the closest checkpoint, capped
    let nearest = std::iter::once(0.0)
        .chain(CHECKPOINTS)
        .map(|c| (angle - c).abs())
        .fold(f64::INFINITY, f64::min);
    nearest.min(max_tilting_degree)
}

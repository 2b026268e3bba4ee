// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Lattice vectors as a row matrix [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
pub fn lattice_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::new(
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  )
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Arguments
/// * `frac` - Fractional coordinates (any value, offsets included)
/// * `lattice` - Lattice vectors as row matrix
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let cart_vec = lattice_matrix(lattice).transpose() * Vector3::from(frac);
  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// Returns None if the lattice is singular.
///
/// # Formula
/// ```text
/// Fractional = (Lattice^T)^-1 × Cartesian
/// ```
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv_lat = lattice_matrix(lattice).transpose().try_inverse()?;
  let frac_vec = inv_lat * Vector3::from(cart);
  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// Exact 90° rotation taking the Cartesian axis `axis` (0 = x, 1 = y) onto z.
///
/// Built from integer entries so that coordinates which share a value keep
/// sharing it bit-for-bit after the rotation.
pub fn axis_onto_z(axis: usize) -> Matrix3<f64> {
  match axis {
    // about -y: (x, y, z) -> (-z, y, x)
    0 => Matrix3::new(
      0.0, 0.0, -1.0,
      0.0, 1.0, 0.0,
      1.0, 0.0, 0.0,
    ),
    // about +x: (x, y, z) -> (x, -z, y)
    1 => Matrix3::new(
      1.0, 0.0, 0.0,
      0.0, 0.0, -1.0,
      0.0, 1.0, 0.0,
    ),
    _ => Matrix3::identity(),
  }
}

pub fn rotate(rotation: &Matrix3<f64>, v: [f64; 3]) -> [f64; 3] {
  let r = rotation * Vector3::from(v);
  [r.x, r.y, r.z]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cubic_lattice() {
    let lattice = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];
    let cart = frac_to_cart([0.5, 0.5, 0.5], lattice);

    assert!((cart[0] - 2.5).abs() < 1e-10);
    assert!((cart[1] - 2.5).abs() < 1e-10);
    assert!((cart[2] - 2.5).abs() < 1e-10);
  }

  #[test]
  fn test_roundtrip() {
    // Non-orthogonal lattice
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let frac_orig = [0.333, 0.667, 0.25];
    let cart = frac_to_cart(frac_orig, lattice);
    let frac_back = cart_to_frac(cart, lattice).unwrap();

    for i in 0..3 {
      assert!((frac_back[i] - frac_orig[i]).abs() < 1e-10);
    }
  }

  #[test]
  fn test_singular_lattice() {
    let lattice = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 5.0]];
    assert!(cart_to_frac([1.0, 1.0, 1.0], lattice).is_none());
  }

  #[test]
  fn test_axis_onto_z_is_exact() {
    let rx = axis_onto_z(0);
    assert_eq!(rotate(&rx, [1.0, 0.0, 0.0]), [0.0, 0.0, 1.0]);
    assert_eq!(rotate(&rx, [0.0, 0.0, 1.95]), [-1.95, 0.0, 0.0]);
    assert!((rx.determinant() - 1.0).abs() < 1e-15);

    let ry = axis_onto_z(1);
    assert_eq!(rotate(&ry, [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    assert_eq!(rotate(&ry, [0.0, 0.0, 2.0]), [0.0, -2.0, 0.0]);
    assert!((ry.determinant() - 1.0).abs() < 1e-15);
  }
}

// src/physics/tilting/aggregate.rs

use std::collections::BTreeMap;

/// Rounds to 2 decimals from the exact decimal expansion of `x`, so that
/// 2.675 (stored as 2.67499..) gives 2.67
pub fn round2(x: f64) -> f64 {
    format!("{:.2}", x).parse().unwrap_or(x)
}

/// Least distorted candidate: minimal alpha + beta + gamma, first one on ties
pub fn minimal_tilting(candidates: &[[f64; 3]]) -> Option<[f64; 3]> {
    candidates.iter().copied().reduce(|best, t| {
        if best.iter().sum::<f64>() <= t.iter().sum::<f64>() {
            best
        } else {
            t
        }
    })
}

/// Reduces the per-plane triples of one octahedron to one rounded triple.
pub fn aggregate(octahedron_id: usize, candidates: &[[f64; 3]]) -> Option<[f64; 3]> {
    let best = minimal_tilting(candidates)?;
    let rounded = best.map(round2);
    log::debug!(
        "Octahedron #{}: {} candidate plane(s), kept {:?}",
        octahedron_id,
        candidates.len(),
        rounded
    );
    Some(rounded)
}

/// Drops an entry when a lower-indexed octahedron carries the very same
/// triple. Entries are scanned from the highest index down; an entry is
/// removed if any entry after it in that order matches.
pub fn deduplicate(angles: &BTreeMap<usize, [f64; 3]>) -> BTreeMap<usize, [f64; 3]> {
    let descending: Vec<(usize, [f64; 3])> = angles.iter().rev().map(|(k, v)| (*k, *v)).collect();

    descending
        .iter()
        .enumerate()
        .filter(|(pos, (_, triple))| !descending[pos + 1..].iter().any(|(_, other)| other == triple))
        .map(|(_, entry)| *entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.499999999999986), 12.5);
        assert_eq!(round2(7.250000000000025), 7.25);
        assert_eq!(round2(4.1e-9), 0.0);
        assert_eq!(round2(18.98321), 18.98);
        // no half-up on a value stored just below the midpoint
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(8.000000000000014), 8.0);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn test_minimal_sum_wins() {
        let c = [[10.0, 1.0, 1.0], [2.0, 2.0, 2.0], [0.5, 20.0, 0.0]];
        assert_eq!(minimal_tilting(&c), Some([2.0, 2.0, 2.0]));
        assert_eq!(minimal_tilting(&[]), None);
    }

    #[test]
    fn test_first_wins_on_tie() {
        let c = [[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]];
        assert_eq!(minimal_tilting(&c), Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_aggregate_rounds() {
        let c = [[12.504, 7.2449, 3.0], [20.0, 20.0, 20.0]];
        assert_eq!(aggregate(1, &c), Some([12.5, 7.24, 3.0]));
        assert_eq!(aggregate(1, &[]), None);
    }

    #[test]
    fn test_deduplicate_keeps_lowest_index() {
        let mut angles = BTreeMap::new();
        angles.insert(1, [1.0, 2.0, 3.0]);
        angles.insert(5, [4.0, 5.0, 6.0]);
        angles.insert(9, [1.0, 2.0, 3.0]);
        angles.insert(13, [1.0, 2.0, 3.0]);

        let unique = deduplicate(&angles);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[&1], [1.0, 2.0, 3.0]);
        assert_eq!(unique[&5], [4.0, 5.0, 6.0]);
        assert!(!unique.contains_key(&9));
        assert!(!unique.contains_key(&13));
    }

    #[test]
    fn test_deduplicate_distinct_untouched() {
        let mut angles = BTreeMap::new();
        angles.insert(2, [0.0, 0.0, 0.0]);
        angles.insert(3, [0.0, 0.0, 0.01]);
        assert_eq!(deduplicate(&angles), angles);
    }
}

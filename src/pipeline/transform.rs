//! Per-group coordinate transforms.
//!
//! A group of G symbols becomes G lattice points. Three invertible transforms
//! are applied in a keyed order that depends only on `(key, group_index)`, so
//! the decoder recomputes it without any engine state. Transform parameters
//! are drawn from the same per-group seed with a per-transform suffix.

use crate::error::{CubigmaError, Result};
use crate::lattice::Coordinate;
use crate::random::DeterministicRng;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    CyclicPermute,
    Invert,
    Transpose,
}

impl TransformKind {
    pub const ALL: [TransformKind; 3] = [
        TransformKind::CyclicPermute,
        TransformKind::Invert,
        TransformKind::Transpose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformKind::CyclicPermute => "cyclic",
            TransformKind::Invert => "invert",
            TransformKind::Transpose => "transpose",
        }
    }
}

/// `"{key}|{group_index}"`
pub fn group_seed(key: &str, group_index: u64) -> String {
    format!("{}|{}", key, group_index)
}

/// Keyed order of the three transforms for one group
pub fn select_transform_order(key: &str, group_index: u64) -> [TransformKind; 3] {
    let mut order = TransformKind::ALL;
    DeterministicRng::from_seed_str(&group_seed(key, group_index)).shuffle(&mut order);
    order
}

/// Rotate the flattened axis values of the whole group.
///
/// The `3G` values `b0 r0 c0 b1 r1 c1 ...` are rotated right by a keyed amount
/// (left when `forward` is false) and regrouped, so each output point takes
/// its axis values from neighbouring input points.
pub fn cyclic_permute(
    points: &[Coordinate],
    _side: usize,
    forward: bool,
    seed: &str,
) -> Vec<Coordinate> {
    let mut values: Vec<usize> = points.iter().flat_map(|p| p.to_array()).collect();
    if values.len() < 2 {
        return points.to_vec();
    }
    let amount = DeterministicRng::tagged(seed, TransformKind::CyclicPermute.name())
        .random_int(1, values.len() - 1);
    if forward {
        values.rotate_right(amount);
    } else {
        values.rotate_left(amount);
    }
    values
        .chunks_exact(3)
        .map(|v| Coordinate::new(v[0], v[1], v[2]))
        .collect()
}

/// Reflect a keyed, non-empty subset of axes through the centre (`c -> side-1-c`).
///
/// Self-inverse; `forward` has no effect.
pub fn invert(
    points: &[Coordinate],
    side: usize,
    _forward: bool,
    seed: &str,
) -> Vec<Coordinate> {
    let mask = DeterministicRng::tagged(seed, TransformKind::Invert.name()).random_int(1, 7);
    points
        .iter()
        .map(|p| {
            let mut values = p.to_array();
            for (axis, value) in values.iter_mut().enumerate() {
                if mask & (1 << axis) != 0 {
                    *value = side - 1 - *value;
                }
            }
            Coordinate::from_array(values)
        })
        .collect()
}

/// Swap two keyed axes in every point. Self-inverse.
pub fn transpose(
    points: &[Coordinate],
    _side: usize,
    _forward: bool,
    seed: &str,
) -> Vec<Coordinate> {
    let mut rng = DeterministicRng::tagged(seed, TransformKind::Transpose.name());
    let first = rng.random_int(0, 2);
    let second = (first + rng.random_int(1, 2)) % 3;
    points
        .iter()
        .map(|p| {
            let mut values = p.to_array();
            values.swap(first, second);
            Coordinate::from_array(values)
        })
        .collect()
}

fn apply(
    kind: TransformKind,
    points: &[Coordinate],
    side: usize,
    forward: bool,
    seed: &str,
) -> Vec<Coordinate> {
    match kind {
        TransformKind::CyclicPermute => cyclic_permute(points, side, forward, seed),
        TransformKind::Invert => invert(points, side, forward, seed),
        TransformKind::Transpose => transpose(points, side, forward, seed),
    }
}

/// Run the group's transforms forward, or undo them when `forward` is false
pub fn get_encrypted_coordinates(
    points: &[Coordinate],
    side: usize,
    key: &str,
    group_index: u64,
    forward: bool,
) -> Result<Vec<Coordinate>> {
    if let Some(p) = points
        .iter()
        .find(|p| p.to_array().iter().any(|&v| v >= side))
    {
        return Err(CubigmaError::InvalidParameter(format!(
            "coordinate {:?} outside cube of side {}",
            p, side
        )));
    }

    let order = select_transform_order(key, group_index);
    let seed = group_seed(key, group_index);
    trace!(
        "group {} transforms {:?} ({})",
        group_index,
        order.map(TransformKind::name),
        if forward { "forward" } else { "inverse" }
    );

    let mut current = points.to_vec();
    if forward {
        for kind in order {
            current = apply(kind, &current, side, true, &seed);
        }
    } else {
        for kind in order.into_iter().rev() {
            current = apply(kind, &current, side, false, &seed);
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0, 1, 2),
            Coordinate::new(3, 0, 1),
            Coordinate::new(2, 2, 3),
        ]
    }

    #[test]
    fn test_order_is_pure() {
        for n in 0..20 {
            assert_eq!(
                select_transform_order("key", n),
                select_transform_order("key", n)
            );
        }
    }

    #[test]
    fn test_order_is_permutation_and_varies() {
        let mut distinct = std::collections::HashSet::new();
        for n in 0..40 {
            let order = select_transform_order("key", n);
            for kind in TransformKind::ALL {
                assert!(order.contains(&kind));
            }
            distinct.insert(order);
        }
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_each_transform_inverts() {
        let pts = points();
        for seed in ["a", "b", "c", "d"] {
            let there = cyclic_permute(&pts, 4, true, seed);
            assert_ne!(there, pts);
            assert_eq!(cyclic_permute(&there, 4, false, seed), pts);

            let there = invert(&pts, 4, true, seed);
            assert_ne!(there, pts);
            assert_eq!(invert(&there, 4, false, seed), pts);

            let there = transpose(&pts, 4, true, seed);
            assert_eq!(transpose(&there, 4, false, seed), pts);
        }
    }

    #[test]
    fn test_invert_stays_in_bounds() {
        let corner = vec![Coordinate::new(0, 0, 0), Coordinate::new(3, 3, 3)];
        for seed in ["x", "y", "z"] {
            for p in invert(&corner, 4, true, seed) {
                assert!(p.to_array().iter().all(|&v| v < 4));
            }
        }
    }

    #[test]
    fn test_cyclic_preserves_value_multiset() {
        let pts = points();
        let mut before: Vec<usize> = pts.iter().flat_map(|p| p.to_array()).collect();
        let mut after: Vec<usize> = cyclic_permute(&pts, 4, true, "k")
            .iter()
            .flat_map(|p| p.to_array())
            .collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let pts = vec![Coordinate::new(0, 0, 4)];
        assert!(get_encrypted_coordinates(&pts, 4, "k", 0, true).is_err());
    }

    #[test]
    fn test_quartet_groups_roundtrip() {
        let pts = vec![
            Coordinate::new(0, 1, 2),
            Coordinate::new(3, 0, 1),
            Coordinate::new(2, 2, 3),
            Coordinate::new(1, 3, 0),
        ];
        let there = get_encrypted_coordinates(&pts, 4, "quartet", 9, true).unwrap();
        assert_eq!(get_encrypted_coordinates(&there, 4, "quartet", 9, false).unwrap(), pts);
    }

    fn coordinate(side: usize) -> impl Strategy<Value = Coordinate> {
        (0..side, 0..side, 0..side).prop_map(|(b, r, c)| Coordinate::new(b, r, c))
    }

    proptest! {
        #[test]
        fn prop_forward_then_inverse_is_identity(
            side in 2usize..9,
            seed in any::<u64>(),
            group_index in any::<u64>(),
        ) {
            let mut rng = DeterministicRng::tagged("points", seed);
            let pts: Vec<Coordinate> = (0..3)
                .map(|_| Coordinate::new(
                    rng.random_int(0, side - 1),
                    rng.random_int(0, side - 1),
                    rng.random_int(0, side - 1),
                ))
                .collect();
            let key = format!("key-{}", seed);
            let there = get_encrypted_coordinates(&pts, side, &key, group_index, true).unwrap();
            prop_assert!(there.iter().all(|p| p.to_array().iter().all(|&v| v < side)));
            let back = get_encrypted_coordinates(&there, side, &key, group_index, false).unwrap();
            prop_assert_eq!(back, pts);
        }

        #[test]
        fn prop_distinct_groups_stay_distinct(
            a in proptest::collection::vec(coordinate(5), 3),
            b in proptest::collection::vec(coordinate(5), 3),
        ) {
            prop_assume!(a != b);
            let ea = get_encrypted_coordinates(&a, 5, "k", 3, true).unwrap();
            let eb = get_encrypted_coordinates(&b, 5, "k", 3, true).unwrap();
            prop_assert_ne!(ea, eb);
        }
    }
}

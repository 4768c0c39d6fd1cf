use crate::error::{CubigmaError, Result};
use crate::lattice::{Axis, Lattice, Rotation};
use crate::random::DeterministicRng;
use log::trace;

/// One slice rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDecision {
    pub axis: Axis,
    pub rotation: Rotation,
    pub slice: usize,
}

/// Keyed choice of axis, direction and slice for the step after `group_index`
pub fn step_decision(key: &str, group_index: u64, side: usize) -> StepDecision {
    let mut rng = DeterministicRng::from_seed_str(&format!("{}|step|{}", key, group_index));
    let axis = Axis::ALL[rng.random_int(0, 2)];
    let rotation = if rng.random_int(0, 1) == 1 {
        Rotation::Clockwise
    } else {
        Rotation::CounterClockwise
    };
    let slice = rng.random_int(0, side.saturating_sub(1));
    StepDecision {
        axis,
        rotation,
        slice,
    }
}

/// Rotate one slice of `lattice` in place
pub fn step(lattice: &mut Lattice, key: &str, group_index: u64) -> Result<StepDecision> {
    let dims = lattice.dims();
    if !dims.is_cube() {
        return Err(CubigmaError::validation("lattice", "stepping needs a cubic lattice"));
    }
    let decision = step_decision(key, group_index, dims.num_blocks);
    trace!(
        "step after group {}: {:?} slice {} {:?}",
        group_index,
        decision.axis,
        decision.slice,
        decision.rotation
    );
    lattice.rotate_slice(decision.axis, decision.slice, decision.rotation)?;
    Ok(decision)
}

/// Odometer cadence: the rotor at `position` steps every `interval * (position + 1)` groups
pub fn should_step(position: usize, group_index: u64, interval: usize) -> bool {
    let period = (interval.max(1) * (position + 1)) as u64;
    (group_index + 1) % period == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Dimensions;
    use crate::symbols::Alphabet;

    fn cube() -> Lattice {
        Lattice::build(&Alphabet::standard(64).unwrap(), Dimensions::cube(4)).unwrap()
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut a = cube();
        let mut b = cube();
        for i in 0..10 {
            assert_eq!(step(&mut a, "key", i).unwrap(), step(&mut b, "key", i).unwrap());
        }
        assert_eq!(a, b);
        assert_ne!(a, cube());
    }

    #[test]
    fn test_step_preserves_bijection() {
        let mut lattice = cube();
        for i in 0..25 {
            step(&mut lattice, "key", i).unwrap();
        }
        for symbol in cube().symbols() {
            let coord = lattice.coordinate_of(symbol).unwrap();
            assert_eq!(lattice.symbol_at(coord).unwrap(), symbol);
        }
    }

    #[test]
    fn test_decision_in_range() {
        for i in 0..100 {
            let d = step_decision("range", i, 4);
            assert!(d.slice < 4);
        }
    }

    #[test]
    fn test_step_rejects_non_cube() {
        let alphabet = Alphabet::standard(24).unwrap();
        let mut lattice = Lattice::build(&alphabet, Dimensions::new(2, 3, 4)).unwrap();
        assert!(step(&mut lattice, "key", 0).is_err());
    }

    #[test]
    fn test_cadence() {
        let stepped: Vec<u64> = (0..8).filter(|&i| should_step(0, i, 1)).collect();
        assert_eq!(stepped, (0..8).collect::<Vec<_>>());
        let stepped: Vec<u64> = (0..8).filter(|&i| should_step(1, i, 2)).collect();
        assert_eq!(stepped, vec![3, 7]);
    }
}

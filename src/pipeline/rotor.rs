use crate::config::validate_rotor_selection;
use crate::error::{CubigmaError, Result};
use crate::lattice::Lattice;
use log::debug;

/// Tag distinguishing one rotor's shuffle from every other rotor's
pub fn rotor_tag(index: usize, orig_key_length: usize) -> String {
    format!("rotor{}:{}", index, orig_key_length)
}

/// Derive the selected rotors from the base lattice
///
/// Each rotor is the base lattice reshuffled under a tag built from its rotor
/// index, so a rotor's wiring does not depend on where it sits in
/// `rotors_to_use`. Rotors come back in the requested order.
pub fn generate_rotors(
    key: &str,
    base: &Lattice,
    num_rotors_to_make: usize,
    rotors_to_use: &[usize],
    orig_key_length: usize,
) -> Result<Vec<Lattice>> {
    if key.is_empty() {
        return Err(CubigmaError::validation("key", "must not be empty"));
    }
    if num_rotors_to_make == 0 {
        return Err(CubigmaError::validation("num_rotors_to_make", "must be positive"));
    }
    validate_rotor_selection(rotors_to_use, num_rotors_to_make)?;
    if base.is_empty() {
        return Err(CubigmaError::validation("base_lattice", "empty lattice"));
    }

    let rotors: Vec<Lattice> = rotors_to_use
        .iter()
        .map(|&index| base.shuffle_with_key(key, rotor_tag(index, orig_key_length)))
        .collect();

    for (position, (index, rotor)) in rotors_to_use.iter().zip(&rotors).enumerate() {
        debug!(
            "rotor {} at position {} fingerprint {}",
            index,
            position,
            &rotor.fingerprint()[..16]
        );
    }

    Ok(rotors)
}

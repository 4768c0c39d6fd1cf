//! Session state: rotors, reflector, plugboard and the running group counter.
//!
//! Built once per key. Rotors step in place as groups go through, so encoding
//! and decoding must feed groups in the same order from a freshly built (or
//! cloned, never used) session.

use crate::config::CipherConfig;
use crate::error::{CubigmaError, Result};
use crate::lattice::{Dimensions, Lattice};
use crate::pipeline::{
    generate_rotors, get_encrypted_coordinates, into_groups, should_step, step, Plugboard,
    Reflector,
};
use crate::random::DeterministicRng;
use crate::symbols::Alphabet;
use log::debug;

#[derive(Debug, Clone)]
pub struct Session {
    key: String,
    rotors: Vec<Lattice>,
    reflector: Reflector<String>,
    plugboard: Plugboard,
    group_size: usize,
    step_interval: usize,
    group_index: u64,
}

impl Session {
    /// Derive every component from `key`
    ///
    /// The base lattice and the reflector share one generator seeded from the
    /// key; rotors reseed per rotor index.
    pub fn build(
        key: &str,
        orig_key_length: usize,
        alphabet: &Alphabet,
        config: &CipherConfig,
    ) -> Result<Self> {
        let mut session_rng = DeterministicRng::from_seed_str(key);

        let mut base = Lattice::build(alphabet, Dimensions::cube(config.cube_length))?;
        base.shuffle_with(&mut session_rng);
        debug!("base lattice fingerprint {}", &base.fingerprint()[..16]);

        let rotors = generate_rotors(
            key,
            &base,
            config.num_rotors_to_make,
            &config.rotors_to_use,
            orig_key_length,
        )?;
        let reflector = Reflector::generate(alphabet.symbols().to_vec(), &mut session_rng);
        let plugboard = Plugboard::generate(&config.plugboard)?;

        Self::new(
            key,
            rotors,
            reflector,
            plugboard,
            config.group_size,
            config.step_interval,
        )
    }

    /// Assemble a session from prepared components
    pub fn new(
        key: &str,
        rotors: Vec<Lattice>,
        reflector: Reflector<String>,
        plugboard: Plugboard,
        group_size: usize,
        step_interval: usize,
    ) -> Result<Self> {
        let first = rotors
            .first()
            .ok_or_else(|| CubigmaError::validation("rotors", "no active rotors"))?;
        if !first.dims().is_cube() {
            return Err(CubigmaError::validation("rotors", "lattice must be a cube"));
        }
        for rotor in &rotors[1..] {
            if rotor.dims() != first.dims() || rotor.symbols().iter().any(|s| !first.contains(s))
            {
                return Err(CubigmaError::validation(
                    "rotors",
                    "rotors do not share one alphabet and shape",
                ));
            }
        }
        if reflector.len() != first.len()
            || first.symbols().iter().any(|s| reflector.reflect(s).is_none())
        {
            return Err(CubigmaError::validation(
                "reflector",
                "must cover every lattice symbol",
            ));
        }
        if let Some(symbol) = plugboard.symbols().find(|s| !first.contains(s)) {
            return Err(CubigmaError::validation(
                "plugboard",
                format!("symbol {:?} is not in the alphabet", symbol),
            ));
        }
        if group_size < 2 || group_size > first.len() {
            return Err(CubigmaError::validation(
                "group_size",
                format!("must be between 2 and {}", first.len()),
            ));
        }
        if step_interval == 0 {
            return Err(CubigmaError::validation("step_interval", "must be positive"));
        }

        Ok(Self {
            key: key.to_string(),
            rotors,
            reflector,
            plugboard,
            group_size,
            step_interval,
            group_index: 0,
        })
    }

    /// Groups processed so far
    pub fn group_index(&self) -> u64 {
        self.group_index
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn rotors(&self) -> &[Lattice] {
        &self.rotors
    }

    /// Active rotor a noise group draws its symbols from
    pub fn first_rotor(&self) -> &Lattice {
        &self.rotors[0]
    }

    fn side(&self) -> usize {
        self.rotors[0].dims().num_blocks
    }

    fn plug(&self, group: &[String]) -> Vec<String> {
        group
            .iter()
            .map(|s| self.plugboard.swap(s).to_string())
            .collect()
    }

    fn reflect(&self, group: &[String], forward: bool) -> Result<Vec<String>> {
        group
            .iter()
            .map(|s| {
                let mapped = if forward {
                    self.reflector.reflect(s)
                } else {
                    self.reflector.unreflect(s)
                };
                mapped
                    .cloned()
                    .ok_or_else(|| CubigmaError::SymbolNotFound(s.clone()))
            })
            .collect()
    }

    /// Substitute the group through one rotor: symbols to points, transform, back
    fn rotor_pass(
        &self,
        position: usize,
        group: &[String],
        forward: bool,
    ) -> Result<Vec<String>> {
        let rotor = &self.rotors[position];
        let points = group
            .iter()
            .map(|s| rotor.coordinate_of(s))
            .collect::<Result<Vec<_>>>()?;
        let moved =
            get_encrypted_coordinates(&points, self.side(), &self.key, self.group_index, forward)?;
        moved
            .into_iter()
            .map(|p| rotor.symbol_at(p).map(str::to_string))
            .collect()
    }

    fn check_group(&self, group: &[String]) -> Result<()> {
        if group.len() != self.group_size {
            return Err(CubigmaError::InvalidParameter(format!(
                "group of {} symbols, expected {}",
                group.len(),
                self.group_size
            )));
        }
        Ok(())
    }

    /// Plugboard, rotors forward, reflector, rotors back, plugboard
    pub fn encode_group(&mut self, group: &[String]) -> Result<Vec<String>> {
        self.check_group(group)?;
        let mut current = self.plug(group);
        for position in 0..self.rotors.len() {
            current = self.rotor_pass(position, &current, true)?;
        }
        current = self.reflect(&current, true)?;
        for position in (0..self.rotors.len()).rev() {
            current = self.rotor_pass(position, &current, true)?;
        }
        let encoded = self.plug(&current);
        self.advance()?;
        Ok(encoded)
    }

    /// Exact inverse of [`Session::encode_group`] at the same group index
    pub fn decode_group(&mut self, group: &[String]) -> Result<Vec<String>> {
        self.check_group(group)?;
        let mut current = self.plug(group);
        for position in 0..self.rotors.len() {
            current = self.rotor_pass(position, &current, false)?;
        }
        current = self.reflect(&current, false)?;
        for position in (0..self.rotors.len()).rev() {
            current = self.rotor_pass(position, &current, false)?;
        }
        let decoded = self.plug(&current);
        self.advance()?;
        Ok(decoded)
    }

    /// Step the rotors due after the current group, then move to the next
    fn advance(&mut self) -> Result<()> {
        for position in 0..self.rotors.len() {
            if should_step(position, self.group_index, self.step_interval) {
                let rotor_key = format!("{}|{}", self.key, position);
                step(&mut self.rotors[position], &rotor_key, self.group_index)?;
            }
        }
        self.group_index += 1;
        Ok(())
    }

    /// Encode text that is already whole groups
    pub fn encode_string(&mut self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        for group in into_groups(text, self.group_size)? {
            out.push_str(&self.encode_group(&group)?.concat());
        }
        Ok(out)
    }

    /// Decode into groups, keeping noise and pads
    pub fn decode_groups(&mut self, text: &str) -> Result<Vec<Vec<String>>> {
        into_groups(text, self.group_size)?
            .iter()
            .map(|group| self.decode_group(group))
            .collect()
    }

    /// Decode text, keeping noise and pads
    pub fn decode_string(&mut self, text: &str) -> Result<String> {
        Ok(self.decode_groups(text)?.concat().concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::split_symbols;

    fn config() -> CipherConfig {
        CipherConfig {
            cube_length: 5,
            num_rotors_to_make: 6,
            rotors_to_use: vec![4, 1, 3],
            plugboard: vec!["ab".into(), "xy".into()],
            ..Default::default()
        }
    }

    fn session(key: &str) -> Session {
        let config = config();
        Session::build(key, 9, &Alphabet::standard(config.volume()).unwrap(), &config).unwrap()
    }

    #[test]
    fn test_group_roundtrip() {
        let mut enc = session("key");
        let mut dec = session("key");
        let group = split_symbols("cat");
        let encoded = enc.encode_group(&group).unwrap();
        assert_eq!(encoded.len(), 3);
        assert_eq!(dec.decode_group(&encoded).unwrap(), group);
    }

    #[test]
    fn test_string_roundtrip_with_stepping() {
        let text = "the quick brown fox jumps over the lazy dog!!";
        assert_eq!(split_symbols(text).len() % 3, 0);
        let mut enc = session("key");
        let ciphertext = enc.encode_string(text).unwrap();
        assert_eq!(enc.group_index(), 15);
        assert_ne!(ciphertext, text);

        let mut dec = session("key");
        assert_eq!(dec.decode_string(&ciphertext).unwrap(), text);
    }

    #[test]
    fn test_repeated_groups_encode_differently() {
        let mut enc = session("key");
        let ciphertext = split_symbols(&enc.encode_string("aaaaaaaaaaaaaaaaaa").unwrap());
        let groups: std::collections::HashSet<_> = ciphertext.chunks(3).collect();
        assert!(groups.len() > 1);
    }

    #[test]
    fn test_wrong_key_does_not_decode() {
        let text = "attack at dawn!";
        let ciphertext = session("right").encode_string(text).unwrap();
        assert_ne!(session("wrong").decode_string(&ciphertext).unwrap(), text);
    }

    #[test]
    fn test_stepping_mutates_rotors() {
        let mut enc = session("key");
        let before = enc.rotors()[0].clone();
        enc.encode_string("abc").unwrap();
        assert_ne!(enc.rotors()[0], before);
    }

    #[test]
    fn test_unknown_symbol() {
        let mut enc = session("key");
        let group = vec!["a".to_string(), "b".to_string(), "🦀".to_string()];
        assert!(matches!(
            enc.encode_group(&group),
            Err(CubigmaError::SymbolNotFound(_))
        ));
    }

    #[test]
    fn test_wrong_group_size() {
        let mut enc = session("key");
        assert!(enc.encode_group(&split_symbols("ab")).is_err());
        assert!(matches!(
            enc.decode_string("abcd"),
            Err(CubigmaError::InvalidCiphertext(_))
        ));
    }

    #[test]
    fn test_plugboard_outside_alphabet() {
        let config = CipherConfig {
            plugboard: vec!["a🦀".into()],
            ..config()
        };
        let alphabet = Alphabet::standard(config.volume()).unwrap();
        assert!(matches!(
            Session::build("key", 3, &alphabet, &config),
            Err(CubigmaError::Validation { field: "plugboard", .. })
        ));
    }

    #[test]
    fn test_odd_volume_cube() {
        let config = CipherConfig {
            cube_length: 3,
            num_rotors_to_make: 2,
            rotors_to_use: vec![1, 0],
            ..Default::default()
        };
        let alphabet = Alphabet::standard(27).unwrap();
        let text = "0123456789";
        let prepared = format!("{}··", text);
        let mut enc = Session::build("odd", 3, &alphabet, &config).unwrap();
        let ciphertext = enc.encode_string(&prepared).unwrap();
        let mut dec = Session::build("odd", 3, &alphabet, &config).unwrap();
        assert_eq!(dec.decode_string(&ciphertext).unwrap(), prepared);
    }
}

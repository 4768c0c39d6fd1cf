use crate::error::{CubigmaError, Result};
use crate::key::{DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH};
use crate::symbols::is_single_symbol;
use digest::Digest;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::HashSet;
use std::path::Path;

/// Direction the machine runs in when driven from a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Encrypt,
    Decrypt,
}

impl std::str::FromStr for Mode {
    type Err = CubigmaError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            _ => Err(CubigmaError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Reserved symbols. Plaintext never carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Present in every noise group
    pub noise: String,
    /// Fills the order prefix of a transport chunk around the order digit
    pub order: String,
    /// Drawn at random to complete the last group of a message
    pub pad: Vec<String>,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            noise: "¤".to_string(),
            order: "¶".to_string(),
            pad: vec!["·".to_string(), "¸".to_string(), "º".to_string()],
        }
    }
}

impl Markers {
    pub fn all(&self) -> Vec<&str> {
        let mut all = vec![self.noise.as_str(), self.order.as_str()];
        all.extend(self.pad.iter().map(String::as_str));
        all
    }

    pub fn is_pad(&self, symbol: &str) -> bool {
        self.pad.iter().any(|p| p == symbol)
    }

    fn validate(&self) -> Result<()> {
        if self.pad.is_empty() {
            return Err(CubigmaError::validation("markers", "at least one pad symbol required"));
        }
        let mut seen = HashSet::new();
        for symbol in self.all() {
            if !is_single_symbol(symbol) {
                return Err(CubigmaError::validation(
                    "markers",
                    format!("{:?} is not a single symbol", symbol),
                ));
            }
            if !seen.insert(symbol) {
                return Err(CubigmaError::validation(
                    "markers",
                    format!("{:?} is used more than once", symbol),
                ));
            }
        }
        Ok(())
    }
}

/// Machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Side of the cubic lattice
    pub cube_length: usize,
    pub num_rotors_to_make: usize,
    /// Active rotor sequence, by rotor index
    pub rotors_to_use: Vec<usize>,
    pub mode: Mode,
    /// Emit reorderable chunks instead of one ciphertext
    pub use_steganography: bool,
    /// Two-symbol pair strings
    pub plugboard: Vec<String>,
    /// Symbols per group (3 current, 4 for the quartet layout)
    pub group_size: usize,
    /// Groups between steps of the first active rotor
    pub step_interval: usize,
    /// Chance of a noise group after each real group
    pub noise_ratio: f64,
    /// Transport chunks when steganography is on
    pub chunk_count: usize,
    pub iterations: u32,
    pub key_length: usize,
    pub markers: Markers,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            cube_length: 8,
            num_rotors_to_make: 16,
            rotors_to_use: vec![5, 0, 11],
            mode: Mode::default(),
            use_steganography: false,
            plugboard: Vec::new(),
            group_size: 3,
            step_interval: 1,
            noise_ratio: 0.0,
            chunk_count: 4,
            iterations: DEFAULT_ITERATIONS,
            key_length: DEFAULT_KEY_LENGTH,
            markers: Markers::default(),
        }
    }
}

impl CipherConfig {
    /// Check every field, naming the first offender
    pub fn validate(&self) -> Result<()> {
        if self.cube_length < 2 {
            return Err(CubigmaError::validation("cube_length", "must be at least 2"));
        }
        if self.cube_length.checked_pow(3).is_none() {
            return Err(CubigmaError::validation(
                "cube_length",
                format!("{} cubed overflows the lattice size", self.cube_length),
            ));
        }
        if self.num_rotors_to_make == 0 {
            return Err(CubigmaError::validation("num_rotors_to_make", "must be positive"));
        }
        validate_rotor_selection(&self.rotors_to_use, self.num_rotors_to_make)?;
        if self.group_size < 2 || self.group_size > self.volume() {
            return Err(CubigmaError::validation(
                "group_size",
                format!("must be between 2 and {}", self.volume()),
            ));
        }
        if self.step_interval == 0 {
            return Err(CubigmaError::validation("step_interval", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.noise_ratio) {
            return Err(CubigmaError::validation("noise_ratio", "must be in [0, 1)"));
        }
        if !(1..=10).contains(&self.chunk_count) {
            return Err(CubigmaError::validation("chunk_count", "must be between 1 and 10"));
        }
        if self.iterations == 0 {
            return Err(CubigmaError::validation("iterations", "must be positive"));
        }
        if self.key_length == 0 {
            return Err(CubigmaError::validation("key_length", "must be positive"));
        }
        self.markers.validate()
    }

    /// Lattice cells. Saturates for sides [`CipherConfig::validate`] rejects.
    pub fn volume(&self) -> usize {
        self.cube_length.saturating_pow(3)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::from_bytes(&std::fs::read(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Hex SHA-256 of every setting that shapes the ciphertext (all but `mode`)
    pub fn fingerprint(&self) -> Result<String> {
        let shape = Self {
            mode: Mode::default(),
            ..self.clone()
        };
        Ok(hex::encode(Sha256::digest(serde_json::to_vec(&shape)?)))
    }
}

/// Rotor indices must be non-empty, unique and below `num_rotors_to_make`
pub fn validate_rotor_selection(rotors_to_use: &[usize], num_rotors_to_make: usize) -> Result<()> {
    if rotors_to_use.is_empty() {
        return Err(CubigmaError::validation("rotors_to_use", "no rotors selected"));
    }
    let mut seen = HashSet::new();
    for &index in rotors_to_use {
        if index >= num_rotors_to_make {
            return Err(CubigmaError::validation(
                "rotors_to_use",
                format!("index {} out of range 0..{}", index, num_rotors_to_make),
            ));
        }
        if !seen.insert(index) {
            return Err(CubigmaError::validation(
                "rotors_to_use",
                format!("index {} repeated", index),
            ));
        }
    }
    Ok(())
}

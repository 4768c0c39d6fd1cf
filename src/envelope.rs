use crate::error::{CubigmaError, Result};
use crate::machine::Cubigma;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current envelope format
pub const ENVELOPE_VERSION: u32 = 1;

/// Ciphertext on disk with what decryption needs besides the passphrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    /// Base64 PBKDF2 salt
    pub salt: String,
    pub group_size: usize,
    /// Chunks carry order prefixes and may be in any order
    #[serde(default)]
    pub chunked: bool,
    /// Fingerprint of the configuration and alphabet used to encrypt
    pub config_fingerprint: String,
    pub chunks: Vec<String>,
}

impl Envelope {
    pub fn new(
        salt: String,
        machine: &Cubigma,
        chunked: bool,
        chunks: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            version: ENVELOPE_VERSION,
            salt,
            group_size: machine.config().group_size,
            chunked,
            config_fingerprint: machine.fingerprint()?,
            chunks,
        })
    }

    /// Refuse to decrypt with settings or an alphabet other than the ones
    /// used to encrypt
    pub fn check_machine(&self, machine: &Cubigma) -> Result<()> {
        let config = machine.config();
        if self.group_size != config.group_size {
            return Err(CubigmaError::validation(
                "group_size",
                format!(
                    "envelope uses groups of {}, configuration has {}",
                    self.group_size, config.group_size
                ),
            ));
        }
        if self.config_fingerprint != machine.fingerprint()? {
            return Err(CubigmaError::validation(
                "config",
                "envelope was written with a different configuration or alphabet",
            ));
        }
        Ok(())
    }

    /// Total ciphertext symbols across chunks
    pub fn symbol_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| crate::symbols::user_perceived_length(c))
            .sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let envelope: Self = serde_json::from_str(text)?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(CubigmaError::validation(
                "version",
                format!("unsupported envelope version {}", envelope.version),
            ));
        }
        if envelope.chunks.is_empty() {
            return Err(CubigmaError::InvalidCiphertext("envelope has no chunks".into()));
        }
        Ok(envelope)
    }
}

pub fn read_envelope(path: &Path) -> Result<Envelope> {
    Envelope::from_json(&std::fs::read_to_string(path)?)
}

pub fn write_envelope(path: &Path, envelope: &Envelope) -> Result<()> {
    let mut text = envelope.to_json()?;
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(())
}

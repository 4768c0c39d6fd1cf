//! Passphrase strengthening.
//!
//! PBKDF2-HMAC-SHA256 over the UTF-8 passphrase. Both the derived key and the
//! salt travel base64-encoded; the encoded key is the phrase every keyed seed
//! in the cipher is built from.

use crate::error::{CubigmaError, Result};
use crate::symbols::user_perceived_length;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::Hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

pub const DEFAULT_ITERATIONS: u32 = 200_000;
pub const DEFAULT_KEY_LENGTH: usize = 32;
pub const SALT_SIZE: usize = 16;

/// Strengthened key plus the salt it was derived with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub key_b64: String,
    pub salt_b64: String,
    /// Symbol length of the passphrase the key was derived from
    pub orig_key_length: usize,
}

impl KeyMaterial {
    /// The key phrase handed to session construction
    pub fn key_phrase(&self) -> &str {
        &self.key_b64
    }

    pub fn salt_bytes(&self) -> Result<Vec<u8>> {
        decode_salt(&self.salt_b64)
    }
}

/// Derive `key_length` bytes from `passphrase`.
///
/// When `salt` is `None`, 16 bytes are drawn from the OS entropy source.
pub fn strengthen_key(
    passphrase: &str,
    salt: Option<&[u8]>,
    iterations: u32,
    key_length: usize,
) -> Result<KeyMaterial> {
    if iterations == 0 {
        return Err(CubigmaError::InvalidParameter(
            "iterations must be positive".into(),
        ));
    }
    if key_length == 0 {
        return Err(CubigmaError::InvalidParameter(
            "key_length must be positive".into(),
        ));
    }

    let salt = match salt {
        Some(bytes) => bytes.to_vec(),
        None => generate_salt(),
    };

    let mut key = vec![0u8; key_length];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase.as_bytes(), &salt, iterations, &mut key)
        .map_err(|e| CubigmaError::InvalidParameter(format!("pbkdf2: {}", e)))?;

    Ok(KeyMaterial {
        key_b64: STANDARD.encode(&key),
        salt_b64: STANDARD.encode(&salt),
        orig_key_length: user_perceived_length(passphrase),
    })
}

/// Same as [`strengthen_key`] for a salt that arrives base64-encoded
pub fn strengthen_key_b64(
    passphrase: &str,
    salt_b64: &str,
    iterations: u32,
    key_length: usize,
) -> Result<KeyMaterial> {
    let salt = decode_salt(salt_b64)?;
    strengthen_key(passphrase, Some(&salt), iterations, key_length)
}

fn decode_salt(salt_b64: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(salt_b64.trim())
        .map_err(|e| CubigmaError::TypeMismatch(format!("salt is not base64 bytes: {}", e)))
}

fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

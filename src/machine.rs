//! The cipher machine: sanitize, pad, encode group by group, and the chunked
//! transport layout.
//!
//! Every call builds its own [`Session`] from the key, so a machine can be
//! shared freely; only the session mutates.

use crate::config::CipherConfig;
use crate::error::{CubigmaError, Result};
use crate::key::{strengthen_key, KeyMaterial};
use crate::pipeline::{
    into_groups, noise_group, pad_chunk, prep_string_for_encrypting, read_order_prefix,
    strip_padding,
};
use crate::random::entropy_rng;
use crate::session::Session;
use crate::symbols::{sanitize, Alphabet};
use digest::Digest;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::Sha256;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Cubigma {
    config: CipherConfig,
    alphabet: Alphabet,
}

impl Cubigma {
    /// Validate the configuration against the alphabet
    pub fn new(config: CipherConfig, alphabet: Alphabet) -> Result<Self> {
        config.validate()?;
        if alphabet.len() != config.volume() {
            return Err(CubigmaError::DimensionMismatch {
                symbols: alphabet.len(),
                volume: config.volume(),
            });
        }
        if let Some(marker) = config.markers.all().into_iter().find(|m| !alphabet.contains(m)) {
            return Err(CubigmaError::validation(
                "markers",
                format!("{:?} is not in the alphabet", marker),
            ));
        }
        Ok(Self { config, alphabet })
    }

    /// Machine over the built-in alphabet sized to the configured cube
    pub fn with_standard_alphabet(config: CipherConfig) -> Result<Self> {
        config.validate()?;
        let alphabet = Alphabet::standard(config.volume())?;
        Self::new(config, alphabet)
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Strengthen a passphrase with the configured iterations and key length
    pub fn derive_key(&self, passphrase: &str, salt: Option<&[u8]>) -> Result<KeyMaterial> {
        strengthen_key(
            passphrase,
            salt,
            self.config.iterations,
            self.config.key_length,
        )
    }

    /// Fresh session at group index 0
    pub fn session(&self, key: &KeyMaterial) -> Result<Session> {
        Session::build(
            key.key_phrase(),
            key.orig_key_length,
            &self.alphabet,
            &self.config,
        )
    }

    /// Hex SHA-256 over the configuration fingerprint and the alphabet in order
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.config.fingerprint()?.as_bytes());
        for symbol in self.alphabet.symbols() {
            hasher.update((symbol.len() as u32).to_le_bytes());
            hasher.update(symbol.as_bytes());
        }
        Ok(hex::encode(hasher.finalize()))
    }

    /// Plaintext as it will come back out of decryption
    pub fn sanitize(&self, message: &str) -> String {
        sanitize(message, &self.config.markers.all())
    }

    pub fn encrypt_message(&self, key: &KeyMaterial, plaintext: &str) -> Result<String> {
        self.encrypt_message_with_rng(key, plaintext, &mut entropy_rng())
    }

    /// Encrypt with pad and noise choices drawn from `rng`
    pub fn encrypt_message_with_rng<R: Rng + ?Sized>(
        &self,
        key: &KeyMaterial,
        plaintext: &str,
        rng: &mut R,
    ) -> Result<String> {
        let group_size = self.config.group_size;
        let markers = &self.config.markers;
        let prepared = prep_string_for_encrypting(
            &self.sanitize(plaintext),
            group_size,
            &markers.pad,
            rng,
        )?;

        let mut session = self.session(key)?;
        let mut ciphertext = String::with_capacity(prepared.len());
        let mut noise_groups = 0usize;
        for group in into_groups(&prepared, group_size)? {
            ciphertext.push_str(&session.encode_group(&group)?.concat());
            if self.config.noise_ratio > 0.0 && rng.gen_bool(self.config.noise_ratio) {
                let noise = noise_group(session.first_rotor(), markers, group_size, rng)?;
                ciphertext.push_str(&session.encode_group(&noise)?.concat());
                noise_groups += 1;
            }
        }
        debug!(
            "encrypted {} groups ({} noise)",
            session.group_index(),
            noise_groups
        );
        Ok(ciphertext)
    }

    /// Decode every group, then drop noise groups and pad symbols
    pub fn decrypt_message(&self, key: &KeyMaterial, ciphertext: &str) -> Result<String> {
        let mut session = self.session(key)?;
        let groups = session.decode_groups(ciphertext)?;
        debug!("decrypted {} groups", groups.len());
        Ok(strip_padding(&groups, &self.config.markers))
    }

    pub fn encrypt_chunks(&self, key: &KeyMaterial, plaintext: &str) -> Result<Vec<String>> {
        self.encrypt_chunks_with_rng(key, plaintext, &mut entropy_rng())
    }

    /// Split the prepared message into `chunk_count` order-prefixed chunks of
    /// equal length, each encoded from group index 0, returned shuffled
    pub fn encrypt_chunks_with_rng<R: Rng + ?Sized>(
        &self,
        key: &KeyMaterial,
        plaintext: &str,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let group_size = self.config.group_size;
        let markers = &self.config.markers;
        let prepared = prep_string_for_encrypting(
            &self.sanitize(plaintext),
            group_size,
            &markers.pad,
            rng,
        )?;
        let groups = into_groups(&prepared, group_size)?;
        let split = split_evenly(&groups, self.config.chunk_count);
        let longest = split.iter().map(|c| c.len()).max().unwrap_or(0);
        let target_length = (longest + 1) * group_size;

        let pristine = self.session(key)?;
        let mut chunks = Vec::with_capacity(split.len());
        for (order_number, chunk) in split.iter().enumerate() {
            let text: String = chunk.iter().map(|g| g.concat()).collect();
            let padded = pad_chunk(
                &text,
                target_length,
                order_number,
                pristine.first_rotor(),
                markers,
                group_size,
                rng,
            )?;
            let mut session = pristine.clone();
            chunks.push(session.encode_string(&padded)?);
        }
        debug!(
            "split {} groups into {} chunks of {} groups",
            groups.len(),
            chunks.len(),
            target_length / group_size + 1
        );
        chunks.shuffle(rng);
        Ok(chunks)
    }

    /// Reassemble chunks in any order
    pub fn decrypt_chunks<S: AsRef<str>>(
        &self,
        key: &KeyMaterial,
        chunks: &[S],
    ) -> Result<String> {
        let expected = self.config.chunk_count;
        if chunks.len() != expected {
            return Err(CubigmaError::InvalidCiphertext(format!(
                "{} chunks, expected {}",
                chunks.len(),
                expected
            )));
        }

        let pristine = self.session(key)?;
        let mut ordered: BTreeMap<usize, String> = BTreeMap::new();
        for chunk in chunks {
            let mut session = pristine.clone();
            let groups = session.decode_groups(chunk.as_ref())?;
            let (prefix, body) = groups
                .split_first()
                .ok_or_else(|| CubigmaError::InvalidCiphertext("empty chunk".into()))?;
            let order_number = read_order_prefix(prefix, &self.config.markers)?;
            if order_number >= expected {
                return Err(CubigmaError::InvalidCiphertext(format!(
                    "order number {} outside 0..{}",
                    order_number, expected
                )));
            }
            if ordered
                .insert(order_number, strip_padding(body, &self.config.markers))
                .is_some()
            {
                return Err(CubigmaError::InvalidCiphertext(format!(
                    "order number {} appears twice",
                    order_number
                )));
            }
        }
        Ok(ordered.into_values().collect())
    }
}

/// `count` runs of consecutive items, lengths differing by at most one
fn split_evenly<T: Clone>(items: &[T], count: usize) -> Vec<Vec<T>> {
    let base = items.len() / count;
    let extra = items.len() % count;
    let mut out = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let len = base + usize::from(i < extra);
        out.push(items[start..start + len].to_vec());
        start += len;
    }
    out
}

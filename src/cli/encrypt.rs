use crate::cli::build_machine;
use crate::config::CipherConfig;
use crate::envelope::{write_envelope, Envelope};
use crate::error::Result;
use crate::key::strengthen_key_b64;
use crate::symbols::Alphabet;
use log::info;
use std::path::Path;

/// Options for the encrypt command
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions {
    pub passphrase: String,
    /// Base64 salt; a fresh random salt when absent
    pub salt: Option<String>,
    pub config: CipherConfig,
    /// Custom alphabet; the built-in one when absent
    pub alphabet: Option<Alphabet>,
}

/// Encrypt a text file into an envelope, written to `output_path` when given
pub fn encrypt_file(
    input_path: &Path,
    output_path: Option<&Path>,
    options: &EncryptOptions,
) -> Result<Envelope> {
    let plaintext = std::fs::read_to_string(input_path)?;
    let machine = build_machine(&options.config, options.alphabet.as_ref())?;

    let key = match &options.salt {
        Some(salt) => strengthen_key_b64(
            &options.passphrase,
            salt,
            options.config.iterations,
            options.config.key_length,
        )?,
        None => machine.derive_key(&options.passphrase, None)?,
    };

    let chunked = options.config.use_steganography;
    let chunks = if chunked {
        machine.encrypt_chunks(&key, &plaintext)?
    } else {
        vec![machine.encrypt_message(&key, &plaintext)?]
    };
    let envelope = Envelope::new(key.salt_b64.clone(), &machine, chunked, chunks)?;
    info!(
        "encrypted {} into {} chunk(s), {} symbols",
        input_path.display(),
        envelope.chunks.len(),
        envelope.symbol_count()
    );

    if let Some(path) = output_path {
        write_envelope(path, &envelope)?;
    }
    Ok(envelope)
}

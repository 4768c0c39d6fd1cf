use crate::cli::build_machine;
use crate::config::CipherConfig;
use crate::envelope::read_envelope;
use crate::error::{CubigmaError, Result};
use crate::key::strengthen_key_b64;
use crate::symbols::{user_perceived_length, Alphabet};
use log::info;
use std::path::Path;

/// Options for the decrypt command
#[derive(Debug, Clone, Default)]
pub struct DecryptOptions {
    pub passphrase: String,
    pub config: CipherConfig,
    pub alphabet: Option<Alphabet>,
}

/// Decrypt an envelope into a text file
/// Returns the number of plaintext symbols written
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    options: &DecryptOptions,
) -> Result<usize> {
    let envelope = read_envelope(input_path)?;
    let machine = build_machine(&options.config, options.alphabet.as_ref())?;
    envelope.check_machine(&machine)?;
    let key = strengthen_key_b64(
        &options.passphrase,
        &envelope.salt,
        options.config.iterations,
        options.config.key_length,
    )?;

    let plaintext = if envelope.chunked {
        machine.decrypt_chunks(&key, &envelope.chunks)?
    } else {
        match envelope.chunks.as_slice() {
            [ciphertext] => machine.decrypt_message(&key, ciphertext)?,
            chunks => {
                return Err(CubigmaError::InvalidCiphertext(format!(
                    "{} chunks in an unchunked envelope",
                    chunks.len()
                )))
            }
        }
    };

    std::fs::write(output_path, &plaintext)?;
    let written = user_perceived_length(&plaintext);
    info!("decrypted {} symbols to {}", written, output_path.display());
    Ok(written)
}

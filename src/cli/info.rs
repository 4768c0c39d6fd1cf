use crate::envelope::read_envelope;
use crate::error::Result;
use std::path::Path;

/// Display information about an envelope file
pub fn show_info(path: &Path) -> Result<String> {
    let envelope = read_envelope(path)?;
    let symbols = envelope.symbol_count();

    let mut output = String::new();
    output.push_str("Cubigma Envelope Information\n");
    output.push_str("============================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Version: {}\n", envelope.version));
    output.push_str(&format!("Salt: {}\n", envelope.salt));
    output.push_str(&format!(
        "Config fingerprint: {}\n",
        &envelope.config_fingerprint[..envelope.config_fingerprint.len().min(16)]
    ));
    output.push('\n');

    output.push_str("Ciphertext:\n");
    output.push_str(&format!("  Group size: {}\n", envelope.group_size));
    output.push_str(&format!(
        "  Layout: {}\n",
        if envelope.chunked { "chunked" } else { "single" }
    ));
    output.push_str(&format!("  Chunks: {}\n", envelope.chunks.len()));
    output.push_str(&format!("  Symbols: {}\n", symbols));
    output.push_str(&format!("  Groups: {}\n", symbols / envelope.group_size.max(1)));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::encrypt::{encrypt_file, EncryptOptions};
    use crate::config::CipherConfig;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let envelope = dir.path().join("input.json");
        std::fs::write(&input, "Test data").unwrap();

        let options = EncryptOptions {
            passphrase: "secret".into(),
            salt: Some("Zm9v".into()),
            config: CipherConfig {
                cube_length: 4,
                num_rotors_to_make: 3,
                rotors_to_use: vec![1],
                iterations: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        encrypt_file(&input, Some(&envelope), &options).unwrap();

        let info = show_info(&envelope).unwrap();
        assert!(info.contains("Version: 1"));
        assert!(info.contains("Salt: Zm9v"));
        assert!(info.contains("Group size: 3"));
        assert!(info.contains("Layout: single"));
        assert!(info.contains("Symbols: 9"));
        assert!(info.contains("Groups: 3"));
    }

    #[test]
    fn test_show_info_missing_file() {
        let dir = tempdir().unwrap();
        assert!(show_info(&dir.path().join("nope.json")).is_err());
    }
}

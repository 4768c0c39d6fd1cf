pub mod decrypt;
pub mod encrypt;
pub mod info;

pub use decrypt::*;
pub use encrypt::*;
pub use info::*;

use crate::config::CipherConfig;
use crate::error::Result;
use crate::machine::Cubigma;
use crate::symbols::Alphabet;

/// Machine over the given alphabet, or the built-in one sized to the cube
fn build_machine(config: &CipherConfig, alphabet: Option<&Alphabet>) -> Result<Cubigma> {
    match alphabet {
        Some(alphabet) => Cubigma::new(config.clone(), alphabet.clone()),
        None => Cubigma::with_standard_alphabet(config.clone()),
    }
}

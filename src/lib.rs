//! Cubigma - rotor cipher over a three-dimensional symbol lattice
//!
//! Plaintext is split into user-perceived symbols and enciphered a group at
//! a time. Every symbol of a group is a point in a cube of symbols; the group
//! is moved through a keyed chain of coordinate transforms, once per rotor,
//! on the way in and again on the way out of a reflector.
//!
//! ## Group Pipeline
//!
//! ```text
//! Group → Plugboard → Rotors → Reflector → Rotors (reverse) → Plugboard → Output
//! ```
//!
//! - **Plugboard**: user supplied symbol swaps
//! - **Rotors**: keyed reshuffles of the base lattice; each pass maps symbols
//!   to points, applies cyclic permutation, inversion and transposition in a
//!   per-group order, and maps the points back to symbols
//! - **Reflector**: keyed pairing of the alphabet
//! - **Stepping**: after each group, due rotors rotate one slice a quarter turn
//!
//! ## Example
//!
//! ```no_run
//! use cubigma::{CipherConfig, Cubigma};
//!
//! let machine = Cubigma::with_standard_alphabet(CipherConfig::default()).unwrap();
//! let key = machine.derive_key("my passphrase", None).unwrap();
//!
//! let ciphertext = machine.encrypt_message(&key, "Attack at dawn").unwrap();
//! let plaintext = machine.decrypt_message(&key, &ciphertext).unwrap();
//! assert_eq!(plaintext, "Attack at dawn");
//! ```

pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod key;
pub mod lattice;
pub mod machine;
pub mod pipeline;
pub mod random;
pub mod session;
pub mod symbols;

pub use config::{CipherConfig, Markers, Mode};
pub use envelope::{read_envelope, write_envelope, Envelope};
pub use error::{CubigmaError, Result};
pub use key::{strengthen_key, strengthen_key_b64, KeyMaterial};
pub use lattice::{Coordinate, Dimensions, Lattice};
pub use machine::Cubigma;
pub use session::Session;
pub use symbols::Alphabet;

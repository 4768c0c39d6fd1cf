pub mod padding;
pub mod plugboard;
pub mod reflector;
pub mod rotor;
pub mod step;
pub mod transform;

pub use padding::*;
pub use plugboard::*;
pub use reflector::*;
pub use rotor::*;
pub use step::*;
pub use transform::*;

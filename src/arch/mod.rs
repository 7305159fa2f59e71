pub mod activations;
mod builder;
pub mod layers;
pub mod loss;
mod network;

pub use builder::{DEFAULT_INIT_RANGE, DEFAULT_SEED, NetworkBuilder};
pub use network::Network;

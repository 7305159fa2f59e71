pub mod arch;
pub mod config;
pub mod error;
pub mod initialization;
pub mod optimization;
pub mod scalar;

pub use arch::{Network, NetworkBuilder, activations::ActFn};
pub use error::{ErrKind, MlErr, Result};
pub use scalar::Scalar;

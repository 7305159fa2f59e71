mod cost_fn;
mod loss_fn;
mod mse;
mod ssr;

pub use cost_fn::{CostFn, CostFnPtr};
pub use loss_fn::LossFn;
pub use mse::Mse;
pub use ssr::Ssr;

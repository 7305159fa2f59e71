mod gradient_descent;
mod optimizer;

pub use gradient_descent::{DEFAULT_LEARNING_RATE, GradientDescent, LrDecay};
pub use optimizer::Optimizer;

use ndarray::{ArrayView, ArrayViewMut, Dimension};

use crate::scalar::Scalar;

/// Dictates how a layer's parameters move given their gradient.
pub trait Optimizer<T: Scalar> {
    /// Updates `params` in place using `grad`, which has the same shape.
    fn update_params<D: Dimension>(&self, params: ArrayViewMut<T, D>, grad: ArrayView<T, D>);

    /// The current learning rate.
    fn learning_rate(&self) -> f64;

    /// Called once at the end of every training epoch.
    fn end_epoch(&mut self) {}
}

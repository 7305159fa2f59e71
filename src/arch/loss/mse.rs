use ndarray::{Array2, ArrayView2};

use super::LossFn;
use crate::scalar::Scalar;

/// Mean squared error loss function: the squared residuals scaled by the amount of elements, so
/// the gradient doesn't grow with the batch size.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl<T: Scalar> LossFn<T> for Mse {
    fn loss(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        let n = T::from_f64(y_pred.len().max(1) as f64);
        (&y - &y_pred).mapv_into(|r| r * r / n)
    }

    fn loss_prime(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        let n = y_pred.len().max(1) as f64;
        (&y - &y_pred) * T::from_f64(-2. / n)
    }
}

use ndarray::{Array2, ArrayView2};

use crate::scalar::Scalar;

/// A differentiable measure of how far a prediction is from its labels.
///
/// Both methods work elementwise: they return a matrix shaped like `y_pred`. Callers are
/// responsible for passing matrices of equal shape.
pub trait LossFn<T: Scalar> {
    /// The cost of each predicted value.
    fn loss(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T>;

    /// The derivative of the cost with respect to each predicted value.
    fn loss_prime(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T>;

    /// The average of `loss` over every element, zero for empty matrices.
    fn mean_loss(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> T {
        let loss = self.loss(y_pred, y);

        match loss.len() {
            0 => T::from_f64(0.),
            n => loss.sum() / T::from_f64(n as f64),
        }
    }
}

impl<T: Scalar, L: LossFn<T> + ?Sized> LossFn<T> for Box<L> {
    fn loss(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        (**self).loss(y_pred, y)
    }

    fn loss_prime(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        (**self).loss_prime(y_pred, y)
    }
}

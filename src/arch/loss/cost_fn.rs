use ndarray::{Array2, ArrayView2};

use super::LossFn;
use crate::scalar::Scalar;

/// The signature of a cost function and of its gradient.
pub type CostFnPtr<T> = fn(ArrayView2<T>, ArrayView2<T>) -> Array2<T>;

/// A cost function given as a plain pair of functions: the cost and its gradient, both
/// evaluated at `(y_pred, y)`.
pub struct CostFn<T: Scalar> {
    f: CostFnPtr<T>,
    df: CostFnPtr<T>,
}

impl<T: Scalar> CostFn<T> {
    /// Creates a new `CostFn`.
    ///
    /// # Arguments
    /// * `f` - The elementwise cost.
    /// * `df` - Its derivative with respect to the prediction.
    pub fn new(f: CostFnPtr<T>, df: CostFnPtr<T>) -> Self {
        Self { f, df }
    }
}

impl<T: Scalar> Clone for CostFn<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Scalar> Copy for CostFn<T> {}

impl<T: Scalar> LossFn<T> for CostFn<T> {
    fn loss(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        (self.f)(y_pred, y)
    }

    fn loss_prime(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        (self.df)(y_pred, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn abs_residual(y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64> {
        (&y - &y_pred).mapv_into(f64::abs)
    }

    fn abs_residual_prime(y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64> {
        (&y_pred - &y).mapv_into(f64::signum)
    }

    #[test]
    fn dispatches_to_the_given_functions() {
        let cost = CostFn::new(abs_residual, abs_residual_prime);
        let y_pred = array![[1.0, -2.0]];
        let y = array![[0.5, 1.0]];

        assert_eq!(cost.loss(y_pred.view(), y.view()), array![[0.5, 3.0]]);
        assert_eq!(cost.loss_prime(y_pred.view(), y.view()), array![[1.0, -1.0]]);
        assert_eq!(cost.mean_loss(y_pred.view(), y.view()), 1.75);
    }
}

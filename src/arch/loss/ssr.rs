use ndarray::{Array2, ArrayView2};

use super::LossFn;
use crate::scalar::Scalar;

/// Sum of squared residuals, the default cost of a `Network`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ssr;

impl Ssr {
    /// Returns a new `Ssr`.
    pub fn new() -> Self {
        Self
    }
}

impl<T: Scalar> LossFn<T> for Ssr {
    fn loss(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        (&y - &y_pred).mapv_into(|r| r * r)
    }

    fn loss_prime(&self, y_pred: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        (&y - &y_pred) * T::from_f64(-2.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn residuals_against_themselves_are_zero() {
        let x = array![[0.3, -1.2], [4.0, 0.0], [7.5, 2.25]];

        assert_eq!(Ssr.loss(x.view(), x.view()), Array2::<f64>::zeros((3, 2)));
        assert_eq!(Ssr.loss_prime(x.view(), x.view()), Array2::<f64>::zeros((3, 2)));
    }

    #[test]
    fn squared_residuals() {
        let y_pred = array![[1.0, 2.0]];
        let y = array![[3.0, 1.0]];

        assert_eq!(Ssr.loss(y_pred.view(), y.view()), array![[4.0, 1.0]]);
        assert_eq!(Ssr.loss_prime(y_pred.view(), y.view()), array![[-4.0, 2.0]]);
        assert_eq!(Ssr.mean_loss(y_pred.view(), y.view()), 2.5);
    }
}

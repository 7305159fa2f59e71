use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use super::softmax;
use crate::scalar::Scalar;

/// Amount of elements from which elementwise maps are split across the rayon thread pool.
pub(super) const PAR_THRESHOLD: usize = 1 << 14;

const LEAK: f64 = 0.01;

/// The activation function of a layer.
///
/// Derivatives are expressed in terms of the layer's own output `y` whenever that is enough to
/// recover them (`sigmoid`, `tanh`), the activations that branch on the sign of their input
/// look at the pre-activation `z` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFn {
    Linear,
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    /// `x` for positive inputs, `sigmoid(x)` otherwise.
    Silu,
    /// Row-wise normalized exponential.
    Softmax,
}
use ActFn::*;

impl ActFn {
    /// Whether this function compares its input against zero, which rules it out for complex
    /// scalars.
    pub fn requires_ordering(&self) -> bool {
        matches!(self, Relu | LeakyRelu | Silu)
    }

    // Softmax couples every unit of a row, `forward` and `backward` send it to the `softmax`
    // module before reaching these.
    fn f<T: Scalar>(&self, x: T) -> T {
        match self {
            Linear => x,
            Sigmoid => sigmoid(x),
            Tanh => x.tanh(),
            Relu if x.is_positive() => x,
            Relu => T::from_f64(0.),
            LeakyRelu if x.is_positive() => x,
            LeakyRelu => x * T::from_f64(LEAK),
            Silu if x.is_positive() => x,
            Silu => sigmoid(x),
            Softmax => unreachable!("softmax is applied row-wise"),
        }
    }

    fn df<T: Scalar>(&self, z: T, y: T) -> T {
        let one = T::from_f64(1.);
        let zero = T::from_f64(0.);

        match self {
            Linear => one,
            Sigmoid => y * (one - y),
            Tanh => one - y * y,
            Relu if z.is_positive() => one,
            Relu => zero,
            LeakyRelu if z.is_positive() => one,
            LeakyRelu => T::from_f64(LEAK),
            Silu if z.is_positive() => one,
            Silu => y * (one - y),
            Softmax => unreachable!("softmax is differentiated row-wise"),
        }
    }

    /// Computes the activations of a batch of pre-activations, one sample per row.
    pub fn forward<T: Scalar>(&self, z: ArrayView2<T>) -> Array2<T> {
        match *self {
            Linear => z.to_owned(),
            Softmax => softmax::forward(z),
            act => map(z, move |x| act.f(x)),
        }
    }

    /// Turns the gradient of the cost with respect to this layer's output into the gradient with
    /// respect to its pre-activation.
    ///
    /// # Arguments
    /// * `z` - The cached pre-activations.
    /// * `y` - The cached outputs.
    /// * `d` - The upstream gradient, same shape as `y`. It's consumed and returned updated.
    pub fn backward<T: Scalar>(
        &self,
        z: ArrayView2<T>,
        y: ArrayView2<T>,
        mut d: Array2<T>,
    ) -> Array2<T> {
        match *self {
            Linear => d,
            Softmax => softmax::backward(y, d),
            act if d.len() < PAR_THRESHOLD => {
                Zip::from(&mut d)
                    .and(&z)
                    .and(&y)
                    .for_each(|d, &z, &y| *d = *d * act.df(z, y));
                d
            }
            act => {
                Zip::from(&mut d)
                    .and(&z)
                    .and(&y)
                    .par_for_each(|d, &z, &y| *d = *d * act.df(z, y));
                d
            }
        }
    }
}

fn sigmoid<T: Scalar>(x: T) -> T {
    let one = T::from_f64(1.);
    one / (one + (-x).exp())
}

fn map<T, F>(z: ArrayView2<T>, f: F) -> Array2<T>
where
    T: Scalar,
    F: Fn(T) -> T + Send + Sync,
{
    if z.len() < PAR_THRESHOLD {
        return z.mapv(f);
    }

    let mut out = Array2::zeros(z.raw_dim());
    Zip::from(&mut out).and(&z).par_for_each(|o, &x| *o = f(x));
    out
}

use std::{
    fmt::Debug,
    ops::{AddAssign, Neg},
};

use ndarray::{LinalgScalar, ScalarOperand};
use num_complex::Complex;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// The element type of every matrix in a network: a real float or a complex number built out of
/// two of them.
///
/// Besides the field operations `ndarray` already asks for, activations and cost functions need
/// exponentiation and, for the branchy ones, an ordering against zero. Only real scalars have
/// that ordering, which is what `ORDERED` reports.
pub trait Scalar:
    LinalgScalar + ScalarOperand + AddAssign + Neg<Output = Self> + Debug + Send + Sync
{
    /// Whether `is_positive` is meaningful for this type.
    const ORDERED: bool;

    fn from_f64(x: f64) -> Self;

    fn exp(self) -> Self;

    fn tanh(self) -> Self;

    /// The real part.
    fn re(self) -> f64;

    /// The absolute value, or the modulus for complex numbers.
    fn magnitude(self) -> f64;

    /// `self > 0`. Complex numbers compare their real part, but no activation relies on it.
    fn is_positive(self) -> bool;

    /// Draws a value from `dist`. Complex numbers draw both components independently.
    fn sample<R: Rng + ?Sized>(dist: &Uniform<f64>, rng: &mut R) -> Self;
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            const ORDERED: bool = true;

            fn from_f64(x: f64) -> Self {
                x as $t
            }

            fn exp(self) -> Self {
                <$t>::exp(self)
            }

            fn tanh(self) -> Self {
                <$t>::tanh(self)
            }

            fn re(self) -> f64 {
                self as f64
            }

            fn magnitude(self) -> f64 {
                <$t>::abs(self) as f64
            }

            fn is_positive(self) -> bool {
                self > 0.
            }

            fn sample<R: Rng + ?Sized>(dist: &Uniform<f64>, rng: &mut R) -> Self {
                dist.sample(rng) as $t
            }
        }
    };
}

macro_rules! impl_complex_scalar {
    ($t:ty) => {
        impl Scalar for Complex<$t> {
            const ORDERED: bool = false;

            fn from_f64(x: f64) -> Self {
                Complex::new(x as $t, 0.)
            }

            fn exp(self) -> Self {
                Complex::<$t>::exp(self)
            }

            fn tanh(self) -> Self {
                Complex::<$t>::tanh(self)
            }

            fn re(self) -> f64 {
                self.re as f64
            }

            fn magnitude(self) -> f64 {
                self.norm() as f64
            }

            fn is_positive(self) -> bool {
                self.re > 0.
            }

            fn sample<R: Rng + ?Sized>(dist: &Uniform<f64>, rng: &mut R) -> Self {
                let re = dist.sample(rng) as $t;
                let im = dist.sample(rng) as $t;
                Complex::new(re, im)
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);
impl_complex_scalar!(f32);
impl_complex_scalar!(f64);

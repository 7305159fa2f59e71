use std::marker::PhantomData;

use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::{ParamGen, Result};
use crate::scalar::Scalar;

/// A uniform distribution over any `Scalar`. Complex scalars get both of their components drawn
/// from the same real range.
#[derive(Debug, Clone, Copy)]
pub struct ScalarUniform {
    inner: Uniform<f64>,
}

impl ScalarUniform {
    /// Creates a new `ScalarUniform` over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high or not finite).
    pub fn new(low: f64, high: f64) -> Result<Self> {
        Ok(Self {
            inner: Uniform::new(low, high)?,
        })
    }
}

impl<T: Scalar> Distribution<T> for ScalarUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        T::sample(&self.inner, rng)
    }
}

/// A parameter generator that samples a uniform distribution with a caller-owned random number
/// generator.
pub struct RandParamGen<'r, T: Scalar, R: Rng> {
    rng: &'r mut R,
    distribution: ScalarUniform,
    remaining: usize,
    _scalar: PhantomData<T>,
}

impl<'r, T: Scalar, R: Rng> RandParamGen<'r, T, R> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid.
    pub fn uniform(rng: &'r mut R, limit: usize, low: f64, high: f64) -> Result<Self> {
        Ok(Self {
            rng,
            distribution: ScalarUniform::new(low, high)?,
            remaining: limit,
            _scalar: PhantomData,
        })
    }
}

impl<T: Scalar, R: Rng> ParamGen<T> for RandParamGen<'_, T, R> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<T>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let sample = Array1::random_using(n, self.distribution, &mut *self.rng);
        Some(sample.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut param_gen = RandParamGen::<f64, _>::uniform(&mut rng, 0, -1., 1.).unwrap();
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn partial() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut param_gen = RandParamGen::<f32, _>::uniform(&mut rng, 10, -1., 1.).unwrap();

        let sample = param_gen.sample(7).unwrap();
        assert_eq!(sample.len(), 7);
        assert!(sample.iter().all(|w| (-1. ..1.).contains(w)));

        let sample = param_gen.sample(7).unwrap();
        assert_eq!(sample.len(), 3);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn same_seed_same_sample() {
        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(1);

        let a = RandParamGen::<Complex<f64>, _>::uniform(&mut rng1, 16, -1., 1.)
            .unwrap()
            .sample(16);
        let b = RandParamGen::<Complex<f64>, _>::uniform(&mut rng2, 16, -1., 1.)
            .unwrap()
            .sample(16);

        assert_eq!(a, b);
    }

    #[test]
    fn invalid_range() {
        assert!(ScalarUniform::new(1., -1.).is_err());
        assert!(ScalarUniform::new(0., f64::INFINITY).is_err());
    }
}

use crate::scalar::Scalar;

/// A source of initial values for a network's weights and biases.
///
/// Generators are finite: once they run out, every call to `sample` returns `None`.
pub trait ParamGen<T: Scalar> {
    /// Draws up to `n` values, fewer if the generator is about to run out.
    ///
    /// # Returns
    /// `None` once the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<T>>;

    /// Draws exactly `n` values, calling `sample` as many times as needed.
    ///
    /// # Returns
    /// `None` if the generator ran out before producing `n` values.
    fn sample_exact(&mut self, n: usize) -> Option<Vec<T>> {
        let mut params = Vec::with_capacity(n);

        while params.len() < n {
            params.extend(self.sample(n - params.len())?);
        }

        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out a single value per call.
    struct OneByOne(usize);

    impl ParamGen<f64> for OneByOne {
        fn sample(&mut self, _: usize) -> Option<Vec<f64>> {
            self.0 = self.0.checked_sub(1)?;
            Some(vec![self.0 as f64])
        }
    }

    #[test]
    fn sample_exact_gathers_partial_samples() {
        let mut param_gen = OneByOne(5);

        assert_eq!(param_gen.sample_exact(3), Some(vec![4., 3., 2.]));
        assert_eq!(param_gen.sample_exact(3), None);
    }

    #[test]
    fn sampling_nothing_always_succeeds() {
        let mut param_gen = OneByOne(0);
        assert_eq!(param_gen.sample_exact(0), Some(vec![]));
    }
}

use std::iter;

use super::ParamGen;
use crate::scalar::Scalar;

/// Repeats a single value a bounded amount of times. Mostly useful for building networks whose
/// outputs can be worked out by hand.
#[derive(Debug, Clone)]
pub struct ConstParamGen<T: Scalar> {
    value: T,
    remaining: usize,
}

impl<T: Scalar> ConstParamGen<T> {
    /// # Arguments
    /// * `value` - The value every sample is filled with.
    /// * `limit` - How many values can be drawn in total.
    pub fn new(value: T, limit: usize) -> Self {
        Self {
            value,
            remaining: limit,
        }
    }

    /// How many values are left before the generator is exhausted.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<T: Scalar> ParamGen<T> for ConstParamGen<T> {
    fn sample(&mut self, n: usize) -> Option<Vec<T>> {
        if self.remaining == 0 {
            return None;
        }

        let n = n.min(self.remaining);
        self.remaining -= n;
        Some(iter::repeat_n(self.value, n).collect())
    }
}

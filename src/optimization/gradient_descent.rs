use ndarray::{ArrayView, ArrayViewMut, Dimension, Zip};
use serde::{Deserialize, Serialize};

use super::Optimizer;
use crate::{MlErr, Result, scalar::Scalar};

/// The default learning rate of a `Network`.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// A learning rate schedule: after every epoch the rate gets multiplied by `factor`, never going
/// below `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LrDecay {
    pub factor: f64,
    pub min: f64,
}

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f64,
    decay: Option<LrDecay>,
}

impl GradientDescent {
    /// Returns a new `GradientDescent` with a constant learning rate.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    ///
    /// # Errors
    /// `MlErr::InvalidLearningRate` if the rate isn't finite and positive.
    pub fn new(learning_rate: f64) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.) {
            return Err(MlErr::InvalidLearningRate(learning_rate));
        }

        Ok(Self {
            learning_rate,
            decay: None,
        })
    }

    /// Returns a new `GradientDescent` whose learning rate decays after every epoch.
    ///
    /// # Errors
    /// `MlErr::InvalidLearningRate` if the initial rate isn't finite and positive.
    /// `MlErr::InvalidLrDecay` if `factor` isn't in `(0, 1]` or if `min` isn't a finite positive
    /// number no greater than the initial rate.
    pub fn with_decay(learning_rate: f64, decay: LrDecay) -> Result<Self> {
        let mut gd = Self::new(learning_rate)?;
        let LrDecay { factor, min } = decay;

        let factor_ok = factor > 0. && factor <= 1.;
        let min_ok = min.is_finite() && min > 0. && min <= learning_rate;
        if !(factor_ok && min_ok) {
            return Err(MlErr::InvalidLrDecay { factor, min });
        }

        gd.decay = Some(decay);
        Ok(gd)
    }

    pub fn decay(&self) -> Option<LrDecay> {
        self.decay
    }
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            decay: None,
        }
    }
}

impl<T: Scalar> Optimizer<T> for GradientDescent {
    /// Updates the parameters according to the algorithm's learning rule, that is, making a step in
    /// the opposite direction of the gradient, with a length of `learning_rate`.
    fn update_params<D: Dimension>(&self, mut params: ArrayViewMut<T, D>, grad: ArrayView<T, D>) {
        let lr = T::from_f64(self.learning_rate);

        Zip::from(&mut params)
            .and(&grad)
            .for_each(|w, &g| *w = *w - lr * g);
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn end_epoch(&mut self) {
        if let Some(LrDecay { factor, min }) = self.decay {
            self.learning_rate = (self.learning_rate * factor).max(min);
        }
    }
}

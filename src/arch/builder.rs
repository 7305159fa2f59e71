use std::marker::PhantomData;

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    Network,
    activations::ActFn,
    layers::Dense,
    loss::{LossFn, Ssr},
};
use crate::{
    MlErr, Result,
    initialization::{ParamGen, RandParamGen},
    optimization::{DEFAULT_LEARNING_RATE, GradientDescent, LrDecay},
    scalar::Scalar,
};

/// The seed used for initializing parameters when none is given.
pub const DEFAULT_SEED: u64 = 1;

/// The range initial parameters are drawn from when none is given.
pub const DEFAULT_INIT_RANGE: (f64, f64) = (-1., 1.);

/// Builds `Network`s, validating their description before allocating anything.
#[derive(Debug, Clone)]
pub struct NetworkBuilder<T: Scalar, L: LossFn<T> = Ssr> {
    shape: Vec<usize>,
    act_fns: Vec<ActFn>,
    loss_fn: L,
    learning_rate: f64,
    decay: Option<LrDecay>,
    seed: u64,
    init_range: (f64, f64),
    _scalar: PhantomData<T>,
}

impl<T: Scalar> NetworkBuilder<T> {
    /// Creates a new `NetworkBuilder` with the default cost, learning rate, seed and
    /// initialization range.
    ///
    /// # Arguments
    /// * `shape` - The amount of neurons per layer, input layer included.
    /// * `act_fns` - One activation function per non-input layer.
    pub fn new(shape: &[usize], act_fns: &[ActFn]) -> Self {
        Self {
            shape: shape.to_vec(),
            act_fns: act_fns.to_vec(),
            loss_fn: Ssr::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
            decay: None,
            seed: DEFAULT_SEED,
            init_range: DEFAULT_INIT_RANGE,
            _scalar: PhantomData,
        }
    }
}

impl<T: Scalar, L: LossFn<T>> NetworkBuilder<T, L> {
    /// Replaces the cost function.
    pub fn loss_fn<L2: LossFn<T>>(self, loss_fn: L2) -> NetworkBuilder<T, L2> {
        NetworkBuilder {
            shape: self.shape,
            act_fns: self.act_fns,
            loss_fn,
            learning_rate: self.learning_rate,
            decay: self.decay,
            seed: self.seed,
            init_range: self.init_range,
            _scalar: PhantomData,
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Makes the learning rate decay after every training epoch.
    pub fn lr_decay(mut self, decay: LrDecay) -> Self {
        self.decay = Some(decay);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the `[low, high)` range initial weights and biases are drawn from.
    pub fn init_range(mut self, low: f64, high: f64) -> Self {
        self.init_range = (low, high);
        self
    }

    /// Builds the network, initializing its parameters with a generator seeded from `seed`.
    ///
    /// # Errors
    /// A construction error if the description of the network is invalid.
    pub fn build(self) -> Result<Network<T, L>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.build_with_rng(&mut rng)
    }

    /// Builds the network, initializing its parameters by sampling `init_range` with `rng`.
    ///
    /// # Errors
    /// A construction error if the description of the network is invalid.
    pub fn build_with_rng<R: Rng>(self, rng: &mut R) -> Result<Network<T, L>> {
        self.validate()?;

        let (low, high) = self.init_range;
        let size = param_count(&self.shape);
        let mut param_gen = RandParamGen::uniform(rng, size, low, high)
            .map_err(|e| e.into_ml_err(low, high))?;

        self.build_with_params(&mut param_gen)
    }

    /// Builds the network taking its initial parameters from `param_gen`, layer by layer, the
    /// weights of each layer before its biases.
    ///
    /// # Errors
    /// A construction error if the description of the network is invalid or
    /// `MlErr::ParamGenExhausted` if `param_gen` runs out of values.
    pub fn build_with_params<G>(self, param_gen: &mut G) -> Result<Network<T, L>>
    where
        G: ParamGen<T> + ?Sized,
    {
        self.validate()?;

        let optimizer = match self.decay {
            Some(decay) => GradientDescent::with_decay(self.learning_rate, decay)?,
            None => GradientDescent::new(self.learning_rate)?,
        };

        let layers = self
            .shape
            .windows(2)
            .zip(&self.act_fns)
            .enumerate()
            .map(|(i, (dim, &act_fn))| {
                Dense::new((dim[0], dim[1]), act_fn, param_gen)
                    .ok_or(MlErr::ParamGenExhausted { layer: i + 1 })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            n_layers = self.shape.len(),
            size = param_count(&self.shape),
            learning_rate = self.learning_rate;
            "built network"
        );

        Ok(Network::from_parts(
            self.shape,
            layers,
            self.loss_fn,
            optimizer,
        ))
    }

    fn validate(&self) -> Result<()> {
        if self.shape.len() < 2 {
            return Err(MlErr::TooFewLayers {
                got: self.shape.len(),
            });
        }

        if let Some(layer) = self.shape.iter().position(|&n| n == 0) {
            return Err(MlErr::EmptyLayer { layer });
        }

        let expected = self.shape.len() - 1;
        if self.act_fns.len() != expected {
            return Err(MlErr::ActFnCountMismatch {
                got: self.act_fns.len(),
                expected,
            });
        }

        if !T::ORDERED {
            let unordered = self
                .act_fns
                .iter()
                .position(ActFn::requires_ordering);

            if let Some(i) = unordered {
                return Err(MlErr::UnorderedActivation {
                    layer: i + 1,
                    act_fn: self.act_fns[i],
                });
            }
        }

        Ok(())
    }
}

/// The amount of weights and biases of a network with this shape.
fn param_count(shape: &[usize]) -> usize {
    shape.windows(2).map(|dim| dim[0] * dim[1] + dim[1]).sum()
}

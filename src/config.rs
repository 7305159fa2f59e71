use serde::{Deserialize, Serialize};

use crate::{
    Result,
    arch::{
        DEFAULT_INIT_RANGE, DEFAULT_SEED, Network, NetworkBuilder,
        activations::ActFn,
        loss::{LossFn, Mse, Ssr},
    },
    optimization::{DEFAULT_LEARNING_RATE, LrDecay},
    scalar::Scalar,
};

/// The specification for the cost function of a network.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    #[default]
    Ssr,
    Mse,
}

impl LossFnSpec {
    fn resolve<T: Scalar + 'static>(self) -> Box<dyn LossFn<T>> {
        match self {
            LossFnSpec::Ssr => Box::new(Ssr::new()),
            LossFnSpec::Mse => Box::new(Mse::new()),
        }
    }
}

/// The specification for a `Network`. Every field but the shape and the activation functions
/// is optional and falls back to the same defaults as `Network::new`.
///
/// ```json
/// {
///     "shape": [2, 3, 1],
///     "act_fns": ["sigmoid", "linear"],
///     "loss": "mse",
///     "learning_rate": 0.5,
///     "lr_decay": { "factor": 0.99, "min": 0.01 },
///     "seed": 42
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NetworkSpec {
    pub shape: Vec<usize>,
    pub act_fns: Vec<ActFn>,
    #[serde(default)]
    pub loss: LossFnSpec,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub lr_decay: Option<LrDecay>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_init_range")]
    pub init_range: (f64, f64),
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_init_range() -> (f64, f64) {
    DEFAULT_INIT_RANGE
}

impl NetworkSpec {
    /// Parses a spec out of its json representation.
    ///
    /// # Errors
    /// `MlErr::InvalidSpec` if `json` isn't a valid spec.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns a builder configured by this spec, its cost function still being the default
    /// one.
    pub fn builder<T: Scalar>(&self) -> NetworkBuilder<T> {
        let (low, high) = self.init_range;
        let builder = NetworkBuilder::new(&self.shape, &self.act_fns)
            .learning_rate(self.learning_rate)
            .seed(self.seed)
            .init_range(low, high);

        match self.lr_decay {
            Some(decay) => builder.lr_decay(decay),
            None => builder,
        }
    }

    /// Builds the network this spec describes.
    ///
    /// # Errors
    /// A construction error if the spec describes an invalid network.
    pub fn build<T: Scalar + 'static>(&self) -> Result<Network<T, Box<dyn LossFn<T>>>> {
        self.builder().loss_fn(self.loss.resolve()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrKind, MlErr};
    use ndarray::array;

    #[test]
    fn missing_fields_take_the_defaults() {
        let spec = NetworkSpec::from_json(r#"{"shape": [2, 1], "act_fns": ["tanh"]}"#).unwrap();

        assert_eq!(spec.loss, LossFnSpec::Ssr);
        assert_eq!(spec.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(spec.lr_decay, None);
        assert_eq!(spec.seed, DEFAULT_SEED);
        assert_eq!(spec.init_range, DEFAULT_INIT_RANGE);
    }

    #[test]
    fn builds_the_described_network() {
        let json = r#"{
            "shape": [2, 3, 1],
            "act_fns": ["sigmoid", "linear"],
            "loss": "mse",
            "learning_rate": 0.5,
            "lr_decay": { "factor": 0.9, "min": 0.1 },
            "seed": 42
        }"#;

        let net = NetworkSpec::from_json(json).unwrap().build::<f64>().unwrap();

        assert_eq!(net.shape(), [2, 3, 1]);
        assert_eq!(net.act_fns(), [ActFn::Linear, ActFn::Sigmoid, ActFn::Linear]);
        assert_eq!(net.learning_rate(), 0.5);

        // the boxed cost is the mean, not the sum
        let y_pred = array![[1.0, 3.0]];
        let y = array![[0.0, 0.0]];
        let grad = net.loss_fn().loss_prime(y_pred.view(), y.view());
        assert_eq!(grad, array![[1.0, 3.0]]);
    }

    #[test]
    fn specs_match_their_builders() {
        let spec = NetworkSpec {
            shape: vec![3, 2],
            act_fns: vec![ActFn::Tanh],
            loss: LossFnSpec::Ssr,
            learning_rate: 0.1,
            lr_decay: None,
            seed: 9,
            init_range: (-0.5, 0.5),
        };

        let from_spec = spec.build::<f32>().unwrap();
        let from_builder = NetworkBuilder::<f32>::new(&[3, 2], &[ActFn::Tanh])
            .learning_rate(0.1)
            .seed(9)
            .init_range(-0.5, 0.5)
            .build()
            .unwrap();

        assert_eq!(from_spec.layers()[0].weights(), from_builder.layers()[0].weights());
        assert_eq!(from_spec.layers()[0].biases(), from_builder.layers()[0].biases());
    }

    #[test]
    fn invalid_json_is_a_construction_error() {
        let err = NetworkSpec::from_json(r#"{"shape": [2, 1], "act_fns": ["swish"]}"#).unwrap_err();

        assert!(matches!(err, MlErr::InvalidSpec(_)));
        assert_eq!(err.kind(), ErrKind::Construction);
    }

    #[test]
    fn round_trips_through_json() {
        let spec = NetworkSpec::from_json(r#"{"shape": [4, 4], "act_fns": ["softmax"]}"#).unwrap();
        let json = serde_json::to_string(&spec).unwrap();

        assert_eq!(NetworkSpec::from_json(&json).unwrap(), spec);
    }
}

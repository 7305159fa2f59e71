use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView2};

use super::{
    NetworkBuilder,
    activations::ActFn,
    layers::Dense,
    loss::{LossFn, Ssr},
};
use crate::{
    MlErr, Result,
    optimization::{GradientDescent, Optimizer},
    scalar::Scalar,
};

/// Every layer's output (and pre-activation) from the most recent forward pass.
#[derive(Debug, Clone)]
struct IntermediateState<T: Scalar> {
    /// One matrix per network layer, the first one being the raw input batch.
    outputs: Vec<Array2<T>>,
    /// One matrix per dense layer.
    pre_activations: Vec<Array2<T>>,
}

/// A multilayer perceptron: information flows forward when computing an output and backward
/// when computing the gradients of its layers.
///
/// Layer `0` is the input layer, it has no parameters and its activation is always
/// `ActFn::Linear`. Every other layer `i` is a `Dense` mapping the width of layer `i - 1` to
/// its own.
#[derive(Debug)]
pub struct Network<T: Scalar, L: LossFn<T> = Ssr> {
    shape: Vec<usize>,
    layers: Vec<Dense<T>>,
    loss_fn: L,
    optimizer: GradientDescent,
    state: Option<IntermediateState<T>>,
}

impl<T: Scalar> Network<T> {
    /// Creates a new `Network` with the default cost (`Ssr`), learning rate and seed.
    ///
    /// # Arguments
    /// * `shape` - The amount of neurons per layer, input layer included.
    /// * `act_fns` - One activation function per non-input layer.
    ///
    /// # Errors
    /// A construction error if the shape or the activation functions are invalid.
    pub fn new(shape: &[usize], act_fns: &[ActFn]) -> Result<Self> {
        NetworkBuilder::new(shape, act_fns).build()
    }

    /// Returns a `NetworkBuilder` for further configuring the network.
    pub fn builder(shape: &[usize], act_fns: &[ActFn]) -> NetworkBuilder<T> {
        NetworkBuilder::new(shape, act_fns)
    }
}

impl<T: Scalar, L: LossFn<T>> Network<T, L> {
    pub(super) fn from_parts(
        shape: Vec<usize>,
        layers: Vec<Dense<T>>,
        loss_fn: L,
        optimizer: GradientDescent,
    ) -> Self {
        Self {
            shape,
            layers,
            loss_fn,
            optimizer,
            state: None,
        }
    }

    pub fn n_inputs(&self) -> usize {
        self.shape[0]
    }

    pub fn n_outputs(&self) -> usize {
        self.shape[self.shape.len() - 1]
    }

    /// The amount of layers, input layer included.
    pub fn n_layers(&self) -> usize {
        self.shape.len()
    }

    /// The amount of neurons per layer.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The activation function of every layer, starting with the input layer's `Linear`.
    pub fn act_fns(&self) -> Vec<ActFn> {
        let dense = self.layers.iter().map(Dense::act_fn);
        std::iter::once(ActFn::Linear).chain(dense).collect()
    }

    pub fn loss_fn(&self) -> &L {
        &self.loss_fn
    }

    pub fn optimizer(&self) -> &GradientDescent {
        &self.optimizer
    }

    pub fn learning_rate(&self) -> f64 {
        Optimizer::<T>::learning_rate(&self.optimizer)
    }

    /// Returns the amount of parameters in the network.
    pub fn size(&self) -> usize {
        self.layers.iter().map(Dense::size).sum()
    }

    /// The parametrized layers: `layers()[i]` is network layer `i + 1`.
    pub fn layers(&self) -> &[Dense<T>] {
        &self.layers
    }

    /// The `i`-th network layer, `None` for the input layer or past the end.
    pub fn layer(&self, i: usize) -> Option<&Dense<T>> {
        self.layers.get(i.checked_sub(1)?)
    }

    /// Every layer's output from the last forward pass, starting with its input. Empty before
    /// the first forward pass.
    pub fn intermediate_state(&self) -> &[Array2<T>] {
        self.state
            .as_ref()
            .map(|state| state.outputs.as_slice())
            .unwrap_or_default()
    }

    /// Replaces the parameters of the `i`-th network layer.
    ///
    /// The intermediate state is left as is, a new forward pass is needed before the next
    /// backward pass.
    ///
    /// # Errors
    /// `MlErr::LayerOutOfBounds` if `i` is `0` or past the last layer, `MlErr::SizeMismatch` if
    /// the shapes don't match the layer's.
    pub fn set_layer_params(&mut self, i: usize, weights: Array2<T>, biases: Array1<T>) -> Result<()> {
        let n_layers = self.n_layers();
        let layer = i
            .checked_sub(1)
            .and_then(|i| self.layers.get_mut(i))
            .ok_or(MlErr::LayerOutOfBounds { layer: i, n_layers })?;

        layer.set_params(weights, biases)
    }

    /// Makes a forward pass through the network, caching every layer's output.
    ///
    /// # Arguments
    /// * `x` - The input batch, one sample per row.
    ///
    /// # Returns
    /// The output of the last layer, shaped `(x.nrows(), n_outputs)`.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `x` doesn't have `n_inputs` columns. The cached state is left
    /// untouched in that case.
    pub fn forward(&mut self, x: ArrayView2<T>) -> Result<Array2<T>> {
        let state = self.propagate(x)?;
        let y_pred = state.outputs[self.layers.len()].clone();
        self.state = Some(state);

        Ok(y_pred)
    }

    /// Computes the network's output without caching anything.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `x` doesn't have `n_inputs` columns.
    pub fn predict(&self, x: ArrayView2<T>) -> Result<Array2<T>> {
        self.check_input(x)?;

        let mut a = x.to_owned();
        for layer in &self.layers {
            (_, a) = layer.forward(a.view())?;
        }

        Ok(a)
    }

    /// Computes the gradients of the cost with respect to every layer's parameters using the
    /// state of the last forward pass, and updates them. Layers are visited from the last to
    /// the first one, the error given to each layer is computed with the weights of the next
    /// one as they were before its update.
    ///
    /// # Arguments
    /// * `y` - The labels for the batch of the last forward pass.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if there was no forward pass yet or if `y`'s shape doesn't match
    /// its output.
    pub fn backward(&mut self, y: ArrayView2<T>) -> Result<()> {
        let Self {
            layers,
            loss_fn,
            optimizer,
            state,
            ..
        } = self;

        let Some(state) = state.as_ref() else {
            return Err(MlErr::SizeMismatch {
                what: "labels before any forward pass",
                got: y.dim(),
                expected: (0, 0),
            });
        };

        let y_pred = &state.outputs[layers.len()];
        if y.dim() != y_pred.dim() {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: y.dim(),
                expected: y_pred.dim(),
            });
        }

        let mut d = loss_fn.loss_prime(y_pred.view(), y);

        for (i, layer) in layers.iter_mut().enumerate().rev() {
            let x = state.outputs[i].view();
            let z = state.pre_activations[i].view();
            let a = state.outputs[i + 1].view();

            d = layer.backward(x, z, a, d, &*optimizer)?;
            trace!(layer = i + 1; "updated layer");
        }

        Ok(())
    }

    /// Trains the network on a fixed batch: `epochs` forward passes, each followed by a
    /// backward pass.
    ///
    /// # Arguments
    /// * `y` - The labels.
    /// * `x` - The samples, one per row.
    /// * `epochs` - The amount of forward-backward iterations.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `x` or `y` don't fit the network or each other, checked before
    /// any parameter is modified.
    pub fn train(&mut self, y: ArrayView2<T>, x: ArrayView2<T>, epochs: usize) -> Result<()> {
        self.check_input(x)?;

        let expected = (x.nrows(), self.n_outputs());
        if y.dim() != expected {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: y.dim(),
                expected,
            });
        }

        debug!(epochs = epochs, samples = x.nrows(); "training started");

        for epoch in 0..epochs {
            let y_pred = self.forward(x)?;

            if log::log_enabled!(log::Level::Trace) {
                let cost = self.loss_fn.mean_loss(y_pred.view(), y).magnitude();
                trace!(epoch = epoch, cost = cost; "epoch finished");
            }

            self.backward(y)?;
            Optimizer::<T>::end_epoch(&mut self.optimizer);
        }

        debug!(learning_rate = self.learning_rate(); "training finished");
        Ok(())
    }

    /// The mean cost of the last forward pass' output against `y`.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if there was no forward pass yet or if the shapes differ.
    pub fn cost(&self, y: ArrayView2<T>) -> Result<T> {
        let y_pred = self
            .intermediate_state()
            .last()
            .ok_or(MlErr::SizeMismatch {
                what: "labels before any forward pass",
                got: y.dim(),
                expected: (0, 0),
            })?;

        if y.dim() != y_pred.dim() {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: y.dim(),
                expected: y_pred.dim(),
            });
        }

        Ok(self.loss_fn.mean_loss(y_pred.view(), y))
    }

    fn check_input(&self, x: ArrayView2<T>) -> Result<()> {
        if x.ncols() != self.n_inputs() {
            return Err(MlErr::SizeMismatch {
                what: "input",
                got: x.dim(),
                expected: (x.nrows(), self.n_inputs()),
            });
        }

        Ok(())
    }

    /// Runs the batch through every layer into fresh buffers. The cached state is only
    /// replaced by the caller, once every layer succeeded.
    fn propagate(&self, x: ArrayView2<T>) -> Result<IntermediateState<T>> {
        self.check_input(x)?;

        let mut outputs = Vec::with_capacity(self.n_layers());
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        outputs.push(x.to_owned());

        for (i, layer) in self.layers.iter().enumerate() {
            let (z, a) = layer.forward(outputs[i].view())?;
            pre_activations.push(z);
            outputs.push(a);
        }

        trace!(samples = x.nrows(); "forward pass");

        Ok(IntermediateState {
            outputs,
            pre_activations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrKind;
    use ndarray::array;

    fn and_gate() -> (Array2<f64>, Array2<f64>) {
        let x = array![[0., 0.], [0., 1.], [1., 0.], [1., 1.]];
        let y = array![[0.], [0.], [0.], [1.]];
        (x, y)
    }

    #[test]
    fn accessors_describe_the_architecture() {
        let net: Network<f64> = Network::new(&[3, 4, 2], &[ActFn::Tanh, ActFn::Softmax]).unwrap();

        assert_eq!(net.n_inputs(), 3);
        assert_eq!(net.n_outputs(), 2);
        assert_eq!(net.n_layers(), 3);
        assert_eq!(net.shape(), [3, 4, 2]);
        assert_eq!(net.act_fns(), [ActFn::Linear, ActFn::Tanh, ActFn::Softmax]);
        assert_eq!(net.size(), (3 + 1) * 4 + (4 + 1) * 2);
        assert_eq!(net.layer(1).unwrap().dim(), (3, 4));
        assert_eq!(net.layer(2).unwrap().dim(), (4, 2));
        assert!(net.layer(0).is_none());
        assert!(net.layer(3).is_none());
        assert!(net.intermediate_state().is_empty());
    }

    #[test]
    fn forward_caches_every_layer() {
        let mut net: Network<f64> =
            Network::new(&[2, 3, 1], &[ActFn::Sigmoid, ActFn::Sigmoid]).unwrap();
        let (x, _) = and_gate();

        let y_pred = net.forward(x.view()).unwrap();

        let state = net.intermediate_state();
        assert_eq!(y_pred.dim(), (4, 1));
        assert_eq!(state.len(), 3);
        assert_eq!(state[0], x);
        assert_eq!(state[1].dim(), (4, 3));
        assert_eq!(state[2], y_pred);
        assert_eq!(net.predict(x.view()).unwrap(), y_pred);
    }

    #[test]
    fn bad_input_leaves_the_state_untouched() {
        let mut net: Network<f64> = Network::new(&[2, 1], &[ActFn::Sigmoid]).unwrap();
        let (x, _) = and_gate();
        net.forward(x.view()).unwrap();

        let err = net.forward(array![[1., 2., 3.]].view()).unwrap_err();

        assert_eq!(err.kind(), ErrKind::ShapeMismatch);
        assert_eq!(net.intermediate_state()[0], x);
    }

    #[test]
    fn backward_before_forward_fails() {
        let mut net: Network<f64> = Network::new(&[2, 1], &[ActFn::Sigmoid]).unwrap();
        let (_, y) = and_gate();
        let before = net.layer(1).unwrap().weights().to_owned();

        let err = net.backward(y.view()).unwrap_err();

        assert_eq!(err.kind(), ErrKind::ShapeMismatch);
        assert_eq!(net.layer(1).unwrap().weights(), before);
    }

    #[test]
    fn backward_updates_every_layer_once() {
        let mut net: Network<f64> =
            Network::new(&[2, 3, 1], &[ActFn::Sigmoid, ActFn::Sigmoid]).unwrap();
        let (x, y) = and_gate();
        let before: Vec<_> = net.layers().iter().map(|l| l.weights().to_owned()).collect();

        net.forward(x.view()).unwrap();
        let state = net.intermediate_state().to_vec();
        net.backward(y.view()).unwrap();

        for (layer, before) in net.layers().iter().zip(&before) {
            assert_ne!(layer.weights(), *before);
        }
        assert_eq!(net.intermediate_state(), state.as_slice());
    }

    #[test]
    fn matches_a_hand_computed_step() {
        // 1 -> 1 linear network: y = w x + b, cost (y - t)^2
        let mut net: Network<f64> = Network::builder(&[1, 1], &[ActFn::Linear])
            .learning_rate(0.1)
            .build()
            .unwrap();
        net.set_layer_params(1, array![[2.0]], array![1.0]).unwrap();

        net.forward(array![[3.0]].view()).unwrap();
        net.backward(array![[5.0]].view()).unwrap();

        // y = 7, dC/dy = 2 * (7 - 5) = 4, dw = 3 * 4, db = 4
        let layer = net.layer(1).unwrap();
        assert!((layer.weights()[[0, 0]] - (2.0 - 0.1 * 12.0)).abs() < 1e-12);
        assert!((layer.biases()[0] - (1.0 - 0.1 * 4.0)).abs() < 1e-12);
    }

    #[test]
    fn set_layer_params_validates_the_index() {
        let mut net: Network<f64> = Network::new(&[2, 2], &[ActFn::Linear]).unwrap();

        let err = net
            .set_layer_params(0, Array2::eye(2), Array1::zeros(2))
            .unwrap_err();
        assert!(matches!(err, MlErr::LayerOutOfBounds { layer: 0, .. }));
        assert!(net.set_layer_params(2, Array2::eye(2), Array1::zeros(2)).is_err());
        assert!(net.set_layer_params(1, Array2::eye(2), Array1::zeros(2)).is_ok());
    }

    #[test]
    fn train_checks_shapes_before_touching_the_weights() {
        let mut net: Network<f64> = Network::new(&[2, 1], &[ActFn::Sigmoid]).unwrap();
        let (x, _) = and_gate();
        let before = net.layer(1).unwrap().weights().to_owned();

        let err = net.train(array![[0.], [1.]].view(), x.view(), 10).unwrap_err();

        assert_eq!(err.kind(), ErrKind::ShapeMismatch);
        assert_eq!(net.layer(1).unwrap().weights(), before);
        assert!(net.intermediate_state().is_empty());
    }

    #[test]
    fn cost_of_the_last_forward_pass() {
        let mut net: Network<f64> = Network::new(&[2, 2], &[ActFn::Linear]).unwrap();
        net.set_layer_params(1, Array2::eye(2), Array1::zeros(2)).unwrap();
        let x = array![[1., 2.], [3., 4.]];

        assert!(net.cost(x.view()).is_err());
        net.forward(x.view()).unwrap();

        assert_eq!(net.cost(x.view()).unwrap(), 0.);
        assert_eq!(net.cost(array![[1., 2.], [3., 6.]].view()).unwrap(), 1.);
        assert!(net.cost(array![[1., 2.]].view()).is_err());
    }
}

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, linalg};

use crate::{
    MlErr, Result,
    arch::activations::ActFn,
    initialization::ParamGen,
    optimization::Optimizer,
    scalar::Scalar,
};

/// A fully connected layer: a `(dim_in, dim_out)` weight matrix, a separate bias vector of
/// `dim_out` elements and the activation function applied to the result.
///
/// The layer holds no forward-pass metadata, the network keeps it as its intermediate state and
/// hands it back on `backward`.
#[derive(Debug, Clone)]
pub struct Dense<T: Scalar> {
    weights: Array2<T>,
    biases: Array1<T>,
    act_fn: ActFn,
}

impl<T: Scalar> Dense<T> {
    /// Creates a new `Dense` layer, drawing its weights first and then its biases from
    /// `param_gen`.
    ///
    /// # Arguments
    /// * `dim` - The input and output widths.
    /// * `act_fn` - The activation function.
    /// * `param_gen` - The source of initial parameters.
    ///
    /// # Returns
    /// The new layer, or `None` if `param_gen` ran out of values.
    pub fn new<G>(dim: (usize, usize), act_fn: ActFn, param_gen: &mut G) -> Option<Self>
    where
        G: ParamGen<T> + ?Sized,
    {
        let weights = Array2::from_shape_vec(dim, param_gen.sample_exact(dim.0 * dim.1)?).ok()?;
        let biases = Array1::from_vec(param_gen.sample_exact(dim.1)?);

        Some(Self {
            weights,
            biases,
            act_fn,
        })
    }

    /// The `(dim_in, dim_out)` dimensions of this layer.
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }

    pub fn weights(&self) -> ArrayView2<'_, T> {
        self.weights.view()
    }

    pub fn biases(&self) -> ArrayView1<'_, T> {
        self.biases.view()
    }

    /// Replaces the parameters of this layer.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if either shape differs from the current one, in which case
    /// nothing is modified.
    pub fn set_params(&mut self, weights: Array2<T>, biases: Array1<T>) -> Result<()> {
        if weights.dim() != self.weights.dim() {
            return Err(MlErr::SizeMismatch {
                what: "weights",
                got: weights.dim(),
                expected: self.weights.dim(),
            });
        }

        if biases.len() != self.biases.len() {
            return Err(MlErr::SizeMismatch {
                what: "biases",
                got: (1, biases.len()),
                expected: (1, self.biases.len()),
            });
        }

        self.weights = weights;
        self.biases = biases;
        Ok(())
    }

    /// Computes this layer's pre-activations and outputs for a batch, one sample per row.
    ///
    /// # Returns
    /// A `(z, y)` tuple, both shaped `(x.nrows(), dim_out)`.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `x` doesn't have `dim_in` columns.
    pub fn forward(&self, x: ArrayView2<T>) -> Result<(Array2<T>, Array2<T>)> {
        let (dim_in, dim_out) = self.dim();
        if x.ncols() != dim_in {
            return Err(MlErr::SizeMismatch {
                what: "layer input",
                got: x.dim(),
                expected: (x.nrows(), dim_in),
            });
        }

        let mut z = Array2::zeros((x.nrows(), dim_out));
        linalg::general_mat_mul(T::from_f64(1.), &x, &self.weights, T::from_f64(0.), &mut z);
        z += &self.biases;

        let y = self.act_fn.forward(z.view());
        Ok((z, y))
    }

    /// Applies one gradient descent step to this layer and propagates the error backwards.
    ///
    /// The error handed to the previous layer is computed with the weights as they were
    /// *before* this update.
    ///
    /// # Arguments
    /// * `x` - The input this layer saw on the last forward pass (the previous layer's output).
    /// * `z` - This layer's cached pre-activations.
    /// * `y` - This layer's cached outputs.
    /// * `d` - The gradient of the cost with respect to `y`.
    /// * `optimizer` - The update rule.
    ///
    /// # Returns
    /// The gradient of the cost with respect to `x`.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if the cached matrices don't fit this layer or each other.
    pub fn backward<O>(
        &mut self,
        x: ArrayView2<T>,
        z: ArrayView2<T>,
        y: ArrayView2<T>,
        d: Array2<T>,
        optimizer: &O,
    ) -> Result<Array2<T>>
    where
        O: Optimizer<T>,
    {
        let (dim_in, dim_out) = self.dim();
        let expected = (x.nrows(), dim_out);

        for (what, got) in [("pre-activations", z.dim()), ("outputs", y.dim()), ("error", d.dim())] {
            if got != expected {
                return Err(MlErr::SizeMismatch {
                    what,
                    got,
                    expected,
                });
            }
        }

        if x.ncols() != dim_in {
            return Err(MlErr::SizeMismatch {
                what: "layer input",
                got: x.dim(),
                expected: (x.nrows(), dim_in),
            });
        }

        let one = T::from_f64(1.);
        let zero = T::from_f64(0.);
        let d = self.act_fn.backward(z, y, d);

        let mut dw = Array2::zeros((dim_in, dim_out));
        linalg::general_mat_mul(one, &x.t(), &d, zero, &mut dw);
        let db = d.sum_axis(Axis(0));

        let mut d_prev = Array2::zeros((d.nrows(), dim_in));
        linalg::general_mat_mul(one, &d, &self.weights.t(), zero, &mut d_prev);

        optimizer.update_params(self.weights.view_mut(), dw.view());
        optimizer.update_params(self.biases.view_mut(), db.view());

        Ok(d_prev)
    }
}

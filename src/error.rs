use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::arch::activations::ActFn;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The two families every `MlErr` belongs to.
///
/// Both are programming errors: a network that was described wrongly, or a matrix that was fed
/// with the wrong dimensions. Neither is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    Construction,
    ShapeMismatch,
}

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    /// The network needs at least an input and an output layer.
    TooFewLayers { got: usize },
    /// A layer was declared with no neurons.
    EmptyLayer { layer: usize },
    /// There must be exactly one activation function per non-input layer.
    ActFnCountMismatch { got: usize, expected: usize },
    /// The activation compares against zero, which complex scalars can't do.
    UnorderedActivation { layer: usize, act_fn: ActFn },
    /// The learning rate must be a finite positive number.
    InvalidLearningRate(f64),
    /// The decay factor must be in `(0, 1]` and the floor a positive rate no greater than the
    /// initial one.
    InvalidLrDecay { factor: f64, min: f64 },
    /// The range used for sampling the initial parameters is empty or not finite.
    InvalidInitRange { low: f64, high: f64 },
    /// The parameter generator ran out of values while initializing a layer.
    ParamGenExhausted { layer: usize },
    /// A network spec could not be parsed.
    InvalidSpec(serde_json::Error),
    /// There's no parametrized layer with that index.
    LayerOutOfBounds { layer: usize, n_layers: usize },
    /// Two matrices that should agree in shape don't.
    SizeMismatch {
        what: &'static str,
        got: (usize, usize),
        expected: (usize, usize),
    },
}

impl MlErr {
    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrKind {
        match self {
            MlErr::SizeMismatch { .. } | MlErr::LayerOutOfBounds { .. } => ErrKind::ShapeMismatch,
            _ => ErrKind::Construction,
        }
    }
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::TooFewLayers { got } => {
                write!(f, "A network needs at least 2 layers, got {got}")
            }
            MlErr::EmptyLayer { layer } => write!(f, "Layer {layer} has no neurons"),
            MlErr::ActFnCountMismatch { got, expected } => write!(
                f,
                "There must be an activation function per non-input layer, got {got} and expected {expected}"
            ),
            MlErr::UnorderedActivation { layer, act_fn } => write!(
                f,
                "Layer {layer} uses {act_fn:?}, which needs an ordered scalar type"
            ),
            MlErr::InvalidLearningRate(lr) => {
                write!(f, "The learning rate must be finite and positive, got {lr}")
            }
            MlErr::InvalidLrDecay { factor, min } => write!(
                f,
                "Invalid learning rate decay: factor {factor} must be in (0, 1] and min {min} \
                 must be positive and no greater than the initial rate"
            ),
            MlErr::InvalidInitRange { low, high } => {
                write!(f, "Invalid parameter initialization range [{low}, {high})")
            }
            MlErr::ParamGenExhausted { layer } => write!(
                f,
                "The parameter generator was exhausted while initializing layer {layer}"
            ),
            MlErr::InvalidSpec(e) => write!(f, "Invalid network spec: {e}"),
            MlErr::LayerOutOfBounds { layer, n_layers } => write!(
                f,
                "Layer {layer} has no parameters in a network of {n_layers} layers"
            ),
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a shape mismatch for {what}, got {got:?} and expected {expected:?}"
            ),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::InvalidSpec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidSpec(value)
    }
}

use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::uniform::Error as UniformError;

use crate::MlErr;

/// The specific result type for the random parameter generators.
pub type Result<T> = std::result::Result<T, RandErr>;

/// Error returned whenever a distribution can't be built out of the given range.
#[derive(Debug)]
pub struct RandErr(String);

impl From<UniformError> for RandErr {
    fn from(value: UniformError) -> Self {
        Self(value.to_string())
    }
}

impl Display for RandErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for RandErr {}

impl RandErr {
    /// Attaches the offending range, turning this into a construction error.
    pub fn into_ml_err(self, low: f64, high: f64) -> MlErr {
        log::debug!("rejected init range [{low}, {high}): {self}");
        MlErr::InvalidInitRange { low, high }
    }
}

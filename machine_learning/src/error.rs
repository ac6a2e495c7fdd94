use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;
use rand_distr::NormalError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    InvalidSize {
        what: &'static str,
        got: usize,
    },
    InvalidConfig(&'static str),
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyBatch,
    Shape(ShapeError),
    Init(String),
}

impl MlErr {
    /// Whether this error comes from an invalid architecture configuration, as opposed to a
    /// failure while evaluating a model.
    pub fn is_config(&self) -> bool {
        matches!(self, MlErr::InvalidSize { .. } | MlErr::InvalidConfig(_))
    }
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidSize { what, got } => write!(
                f,
                "{what} must be at least 16 and an exact power of 2, got {got}"
            ),
            MlErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::EmptyBatch => write!(f, "cannot evaluate an empty batch"),
            MlErr::Shape(e) => write!(f, "shape error: {e}"),
            MlErr::Init(msg) => write!(f, "failed to initialize weights: {msg}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<NormalError> for MlErr {
    fn from(value: NormalError) -> Self {
        Self::Init(value.to_string())
    }
}

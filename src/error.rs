use simple_error::SimpleError;
use std::fmt;

/// Error types for the pickup model
#[derive(Debug, PartialEq)]
pub enum PickupError {
    InvalidGeometry(String),
    InvalidInput(String),
    Calibration(String),
}

impl fmt::Display for PickupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            PickupError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PickupError::Calibration(msg) => write!(f, "Calibration error: {}", msg),
        }
    }
}

impl std::error::Error for PickupError {}

impl From<SimpleError> for PickupError {
    fn from(err: SimpleError) -> Self {
        PickupError::InvalidInput(err.as_str().to_string())
    }
}

pub type Result<T> = std::result::Result<T, PickupError>;

/// Error types for the one-dimensional optimizers
#[derive(Debug, PartialEq)]
pub enum MinimizerError {
    InvalidBracket,
    InvalidTolerance,
    MaxIterationsExceeded,
}

impl fmt::Display for MinimizerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MinimizerError::InvalidBracket => write!(f, "Invalid bracket: ensure a < b"),
            MinimizerError::InvalidTolerance => write!(f, "Tolerance must be positive"),
            MinimizerError::MaxIterationsExceeded => write!(f, "Maximum iterations exceeded"),
        }
    }
}

impl std::error::Error for MinimizerError {}

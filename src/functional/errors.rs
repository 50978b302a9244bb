//! Errors for additive/multiplicative functionals (coefficient and system
//! shape validation, engine construction cross-checks, and recursion
//! failures).
//!
//! This module defines a single error type, [`AmfError`], used across the
//! construction boundary and the iteration/evaluation paths. It implements
//! `Display`/`Error` and, behind the `python-bindings` feature, converts to
//! `PyErr` for PyO3.
//!
//! ## Conventions
//! - Shapes are reported as `(rows, cols)` pairs.
//! - Construction validates every matrix shape once; after a successful
//!   construction the recursion assumes conformable matrices, so shape
//!   errors never originate mid-iteration.
//! - The only runtime failure of the recursion itself is
//!   [`AmfError::SingularSigma`]; it is fatal to the call and indicates a
//!   statistically invalid parameterization rather than a numerical fluke.
#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

/// Crate-wide result alias for operations that may produce [`AmfError`].
pub type AmfResult<T> = Result<T, AmfError>;

/// Unified error type for functional construction and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum AmfError {
    // ---- Recursion failures ----
    /// The shock precision matrix `I - 2·sym(Ψ₂)` is not invertible, so the
    /// Gaussian shock term cannot be integrated out. Typically means the
    /// quadratic shock loading exceeds its stability bound.
    SingularSigma,

    // ---- Coefficient validation ----
    /// A coefficient block has the wrong shape for the inferred dimensions.
    CoefficientShape { name: &'static str, expected: (usize, usize), actual: (usize, usize) },

    /// An inferred dimension is zero; every block of the state and shock
    /// must have at least one coordinate.
    EmptyDimension { name: &'static str },

    // ---- System validation ----
    /// A triangular-system matrix has the wrong shape for the inferred
    /// dimensions.
    SystemShape { name: &'static str, expected: (usize, usize), actual: (usize, usize) },

    // ---- Engine construction ----
    /// Coefficients and system disagree on a dimension (n, m, or k).
    DimensionMismatch { what: &'static str, coeffs: usize, system: usize },

    /// The exposure direction α_h is not a k×1 column.
    ExposureShape { expected: (usize, usize), actual: (usize, usize) },

    // ---- Evaluation ----
    /// A state argument (x1 or x2) has the wrong shape.
    StateShape { name: &'static str, expected: (usize, usize), actual: (usize, usize) },

    /// Elasticities are defined for horizons t >= 1; the time-0 entry of
    /// the path history holds no tilde coefficients or covariance.
    HorizonZero,
}

impl std::error::Error for AmfError {}

impl std::fmt::Display for AmfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Recursion failures ----
            AmfError::SingularSigma => {
                write!(
                    f,
                    "Shock precision matrix I - 2*sym(Psi_2) is singular; the \
                     parameterization is statistically invalid."
                )
            }
            // ---- Coefficient validation ----
            AmfError::CoefficientShape { name, expected, actual } => {
                write!(
                    f,
                    "Coefficient block {name} must have shape {expected:?}, got {actual:?}"
                )
            }
            AmfError::EmptyDimension { name } => {
                write!(f, "Dimension {name} must be at least 1.")
            }
            // ---- System validation ----
            AmfError::SystemShape { name, expected, actual } => {
                write!(f, "System matrix {name} must have shape {expected:?}, got {actual:?}")
            }
            // ---- Engine construction ----
            AmfError::DimensionMismatch { what, coeffs, system } => {
                write!(
                    f,
                    "Coefficients and system disagree on {what}: coefficients imply {coeffs}, \
                     system implies {system}"
                )
            }
            AmfError::ExposureShape { expected, actual } => {
                write!(
                    f,
                    "Exposure direction alpha_h must have shape {expected:?}, got {actual:?}"
                )
            }
            // ---- Evaluation ----
            AmfError::StateShape { name, expected, actual } => {
                write!(f, "State argument {name} must have shape {expected:?}, got {actual:?}")
            }
            AmfError::HorizonZero => {
                write!(f, "Shock elasticities are defined for t >= 1; got t = 0.")
            }
        }
    }
}

/// Convert an [`AmfError`] into a Python `ValueError` with the error message.
///
/// Used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl std::convert::From<AmfError> for PyErr {
    fn from(err: AmfError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

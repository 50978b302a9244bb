//! Dimensions (n, m, k) for triangular-system functionals.
//!
//! - `n`: size of the first state block X₁ (drives the quadratic terms).
//! - `m`: size of the second state block X₂.
//! - `k`: size of the Gaussian shock W.
//!
//! All three must be at least 1 for the coefficient algebra to be
//! well-formed.
use crate::functional::errors::{AmfError, AmfResult};

/// Dimensions of a functional over a two-block triangular system.
///
/// Invariant: `n >= 1`, `m >= 1`, `k >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionalDims {
    pub n: usize,
    pub m: usize,
    pub k: usize,
}

impl FunctionalDims {
    /// Construct a [`FunctionalDims`] and validate positivity.
    ///
    /// # Errors
    /// - [`AmfError::EmptyDimension`] if any of `n`, `m`, `k` is zero.
    pub fn new(n: usize, m: usize, k: usize) -> AmfResult<Self> {
        if n == 0 {
            return Err(AmfError::EmptyDimension { name: "n (state block 1)" });
        }
        if m == 0 {
            return Err(AmfError::EmptyDimension { name: "m (state block 2)" });
        }
        if k == 0 {
            return Err(AmfError::EmptyDimension { name: "k (shock)" });
        }
        Ok(FunctionalDims { n, m, k })
    }
}

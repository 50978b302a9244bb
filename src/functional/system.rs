//! Triangular state-space system — fixed transition and loading matrices.
//!
//! Purpose
//! -------
//! Hold the ten matrices describing a two-block triangular linear-Gaussian
//! state transition
//!
//! ```text
//! X₁' = Θ₁₀ + Θ₁₁·X₁ + Λ₁₀·W'
//! X₂' = Θ₂₀ + Θ₂₁·X₁ + Θ₂₂·X₂ + Θ₂₃·(X₁ ⊗ X₁)
//!       + Λ₂₀·W' + Λ₂₁·(X₁ ⊗ W') + Λ₂₂·(W' ⊗ W')
//! ```
//!
//! where block 1 evolves independently of block 2 and block 2 depends on
//! block 1 (hence "triangular"). The container is read-only: engines take a
//! shared handle and never mutate it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes (after successful construction): `theta_10` n×1, `theta_11`
//!   n×n, `lambda_10` n×k, `theta_20` m×1, `theta_21` m×n, `theta_22` m×m,
//!   `theta_23` m×n², `lambda_20` m×k, `lambda_21` m×(n·k), `lambda_22`
//!   m×k².
//! - Quadratic columns follow the column-major flattening of
//!   [`crate::linalg`].
//! - Stability and stationarity of the transition are the caller's
//!   responsibility; this type only enforces conformability.
use crate::functional::{
    dims::FunctionalDims,
    errors::{AmfError, AmfResult},
};
use ndarray::Array2;

/// Fixed matrices of a two-block triangular linear state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularSystem {
    /// Block-1 constant, n×1.
    pub theta_10: Array2<f64>,
    /// Block-1 transition, n×n.
    pub theta_11: Array2<f64>,
    /// Block-1 shock loading, n×k.
    pub lambda_10: Array2<f64>,
    /// Block-2 constant, m×1.
    pub theta_20: Array2<f64>,
    /// Block-2 linear-in-X₁ transition, m×n.
    pub theta_21: Array2<f64>,
    /// Block-2 linear-in-X₂ transition, m×m.
    pub theta_22: Array2<f64>,
    /// Block-2 quadratic-in-X₁ transition, m×n².
    pub theta_23: Array2<f64>,
    /// Block-2 shock loading, m×k.
    pub lambda_20: Array2<f64>,
    /// Block-2 X₁ ⊗ W loading, m×(n·k).
    pub lambda_21: Array2<f64>,
    /// Block-2 W ⊗ W loading, m×k².
    pub lambda_22: Array2<f64>,
}

impl TriangularSystem {
    /// Construct a validated triangular system.
    ///
    /// Dimensions are inferred from the square transitions and the block-1
    /// loading: `n` from `theta_11`, `m` from `theta_22`, `k` from the
    /// column count of `lambda_10`. Every matrix is then checked against
    /// the implied shape.
    ///
    /// # Errors
    /// - [`AmfError::EmptyDimension`] if any inferred dimension is zero.
    /// - [`AmfError::SystemShape`] naming the first offending matrix.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        theta_10: Array2<f64>, theta_11: Array2<f64>, lambda_10: Array2<f64>,
        theta_20: Array2<f64>, theta_21: Array2<f64>, theta_22: Array2<f64>,
        theta_23: Array2<f64>, lambda_20: Array2<f64>, lambda_21: Array2<f64>,
        lambda_22: Array2<f64>,
    ) -> AmfResult<Self> {
        let dims =
            FunctionalDims::new(theta_11.nrows(), theta_22.nrows(), lambda_10.ncols())?;
        let FunctionalDims { n, m, k } = dims;

        check_shape("theta_10", &theta_10, (n, 1))?;
        check_shape("theta_11", &theta_11, (n, n))?;
        check_shape("lambda_10", &lambda_10, (n, k))?;
        check_shape("theta_20", &theta_20, (m, 1))?;
        check_shape("theta_21", &theta_21, (m, n))?;
        check_shape("theta_22", &theta_22, (m, m))?;
        check_shape("theta_23", &theta_23, (m, n * n))?;
        check_shape("lambda_20", &lambda_20, (m, k))?;
        check_shape("lambda_21", &lambda_21, (m, n * k))?;
        check_shape("lambda_22", &lambda_22, (m, k * k))?;

        Ok(TriangularSystem {
            theta_10,
            theta_11,
            lambda_10,
            theta_20,
            theta_21,
            theta_22,
            theta_23,
            lambda_20,
            lambda_21,
            lambda_22,
        })
    }

    /// Dimensions implied by the matrix shapes.
    pub fn dims(&self) -> FunctionalDims {
        FunctionalDims {
            n: self.theta_11.nrows(),
            m: self.theta_22.nrows(),
            k: self.lambda_10.ncols(),
        }
    }
}

fn check_shape(
    name: &'static str, matrix: &Array2<f64>, expected: (usize, usize),
) -> AmfResult<()> {
    if matrix.dim() != expected {
        return Err(AmfError::SystemShape { name, expected, actual: matrix.dim() });
    }
    Ok(())
}

//! Coefficient tuple 𝒫 of an additive-functional increment.
//!
//! Purpose
//! -------
//! Represent the seven coefficient blocks of an additive increment
//!
//! ```text
//! Y_{t+1} − Y_t = Γ₀ + Γ₁·X₁ + Γ₂·X₂ + Γ₃·(X₁ ⊗ X₁)
//!                + Ψ₀·W + Ψ₁·(X₁ ⊗ W) + Ψ₂·(W ⊗ W)
//! ```
//!
//! as a fixed-order record with one field per block, validated once at
//! construction. The strict positional contract of the source formulas is
//! preserved by naming each slot rather than carrying a variable-length
//! collection.
//!
//! Key behaviors
//! -------------
//! - Validate every block shape against the dimensions `(n, m, k)` inferred
//!   from `gamma_1`, `gamma_2`, and `psi_0`.
//! - Provide an all-zero tuple ([`Coefficients::zeros`]) used to seed the
//!   recursion at t = 0.
//! - Support elementwise addition on references, used by the iteration step
//!   `𝒫_tilde = 𝒫 + pull_back(𝒫_bar)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes (after successful construction): `gamma_0` 1×1, `gamma_1` 1×n,
//!   `gamma_2` 1×m, `gamma_3` 1×n², `psi_0` 1×k, `psi_1` 1×(n·k),
//!   `psi_2` 1×k².
//! - Quadratic blocks (`gamma_3`, `psi_1`, `psi_2`) are column-major
//!   flattenings; see [`crate::linalg`] for the convention.
//! - Values are never mutated after construction; transforms return fresh
//!   tuples.
use crate::functional::{
    dims::FunctionalDims,
    errors::{AmfError, AmfResult},
};
use ndarray::Array2;
use std::ops::Add;

/// The seven coefficient blocks of an additive increment, in the fixed
/// order (Γ₀, Γ₁, Γ₂, Γ₃, Ψ₀, Ψ₁, Ψ₂).
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients {
    /// Constant term, 1×1.
    pub gamma_0: Array2<f64>,
    /// Linear-in-X₁ term, 1×n.
    pub gamma_1: Array2<f64>,
    /// Linear-in-X₂ term, 1×m.
    pub gamma_2: Array2<f64>,
    /// Quadratic-in-X₁ term on vec(X₁ ⊗ X₁), 1×n².
    pub gamma_3: Array2<f64>,
    /// Linear-in-shock term, 1×k.
    pub psi_0: Array2<f64>,
    /// X₁ ⊗ W cross term, 1×(n·k).
    pub psi_1: Array2<f64>,
    /// Quadratic-in-shock term on vec(W ⊗ W), 1×k².
    pub psi_2: Array2<f64>,
}

impl Coefficients {
    /// Construct a validated coefficient tuple.
    ///
    /// Dimensions are inferred from the linear blocks: `n` is the column
    /// count of `gamma_1`, `m` of `gamma_2`, and `k` of `psi_0`. Every
    /// block is then checked against the implied shape.
    ///
    /// # Errors
    /// - [`AmfError::EmptyDimension`] if any inferred dimension is zero.
    /// - [`AmfError::CoefficientShape`] naming the first offending block.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gamma_0: Array2<f64>, gamma_1: Array2<f64>, gamma_2: Array2<f64>, gamma_3: Array2<f64>,
        psi_0: Array2<f64>, psi_1: Array2<f64>, psi_2: Array2<f64>,
    ) -> AmfResult<Self> {
        let dims =
            FunctionalDims::new(gamma_1.ncols(), gamma_2.ncols(), psi_0.ncols())?;
        let FunctionalDims { n, m, k } = dims;

        check_shape("gamma_0", &gamma_0, (1, 1))?;
        check_shape("gamma_1", &gamma_1, (1, n))?;
        check_shape("gamma_2", &gamma_2, (1, m))?;
        check_shape("gamma_3", &gamma_3, (1, n * n))?;
        check_shape("psi_0", &psi_0, (1, k))?;
        check_shape("psi_1", &psi_1, (1, n * k))?;
        check_shape("psi_2", &psi_2, (1, k * k))?;

        Ok(Coefficients { gamma_0, gamma_1, gamma_2, gamma_3, psi_0, psi_1, psi_2 })
    }

    /// The all-zero tuple for the given dimensions. Seeds the recursion at
    /// t = 0 and shapes the shock-free blocks produced by the bar transform.
    pub fn zeros(dims: FunctionalDims) -> Self {
        let FunctionalDims { n, m, k } = dims;
        Coefficients {
            gamma_0: Array2::zeros((1, 1)),
            gamma_1: Array2::zeros((1, n)),
            gamma_2: Array2::zeros((1, m)),
            gamma_3: Array2::zeros((1, n * n)),
            psi_0: Array2::zeros((1, k)),
            psi_1: Array2::zeros((1, n * k)),
            psi_2: Array2::zeros((1, k * k)),
        }
    }

    /// Dimensions implied by the block shapes.
    pub fn dims(&self) -> FunctionalDims {
        FunctionalDims {
            n: self.gamma_1.ncols(),
            m: self.gamma_2.ncols(),
            k: self.psi_0.ncols(),
        }
    }
}

fn check_shape(
    name: &'static str, block: &Array2<f64>, expected: (usize, usize),
) -> AmfResult<()> {
    if block.dim() != expected {
        return Err(AmfError::CoefficientShape { name, expected, actual: block.dim() });
    }
    Ok(())
}

/// Elementwise sum of two coefficient tuples of identical dimensions.
///
/// Used by the iteration step; both operands always originate from the same
/// engine, so their dimensions agree by construction.
impl Add<&Coefficients> for &Coefficients {
    type Output = Coefficients;

    fn add(self, rhs: &Coefficients) -> Coefficients {
        debug_assert_eq!(self.dims(), rhs.dims());
        Coefficients {
            gamma_0: &self.gamma_0 + &rhs.gamma_0,
            gamma_1: &self.gamma_1 + &rhs.gamma_1,
            gamma_2: &self.gamma_2 + &rhs.gamma_2,
            gamma_3: &self.gamma_3 + &rhs.gamma_3,
            psi_0: &self.psi_0 + &rhs.psi_0,
            psi_1: &self.psi_1 + &rhs.psi_1,
            psi_2: &self.psi_2 + &rhs.psi_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn valid_blocks() -> Coefficients {
        // n = 2, m = 1, k = 2
        Coefficients::new(
            array![[0.1]],
            array![[1.0, 2.0]],
            array![[3.0]],
            array![[0.0, 0.0, 0.0, 0.0]],
            array![[0.5, -0.5]],
            array![[0.0, 0.0, 0.0, 0.0]],
            array![[0.0, 0.0, 0.0, 0.0]],
        )
        .expect("blocks are conformable")
    }

    #[test]
    // Purpose
    // -------
    // A conformable set of blocks constructs, and the inferred dimensions
    // come from gamma_1 / gamma_2 / psi_0 column counts.
    fn construction_infers_dims_from_linear_blocks() {
        let coeffs = valid_blocks();
        assert_eq!(coeffs.dims(), FunctionalDims { n: 2, m: 1, k: 2 });
    }

    #[test]
    // Purpose
    // -------
    // A mis-sized quadratic block must be rejected with an error naming
    // the block, not accepted or surfaced as a panic later on.
    fn wrong_psi_1_width_is_rejected() {
        let result = Coefficients::new(
            array![[0.0]],
            array![[1.0, 2.0]],
            array![[3.0]],
            array![[0.0, 0.0, 0.0, 0.0]],
            array![[0.5, -0.5]],
            array![[0.0, 0.0]], // should be 1x4 for n = 2, k = 2
            array![[0.0, 0.0, 0.0, 0.0]],
        );
        assert_eq!(
            result,
            Err(AmfError::CoefficientShape {
                name: "psi_1",
                expected: (1, 4),
                actual: (1, 2),
            })
        );
    }

    #[test]
    // Purpose
    // -------
    // The zero tuple must carry correctly shaped blocks for every slot,
    // since it seeds the recursion and the shock-free bar outputs.
    fn zeros_has_conformable_blocks() {
        let dims = FunctionalDims::new(3, 2, 2).unwrap();
        let z = Coefficients::zeros(dims);
        assert_eq!(z.gamma_3.dim(), (1, 9));
        assert_eq!(z.psi_1.dim(), (1, 6));
        assert_eq!(z.psi_2.dim(), (1, 4));
        assert_eq!(z.dims(), dims);
    }

    #[test]
    // Purpose
    // -------
    // Addition is elementwise per block; adding the zero tuple is the
    // identity.
    fn addition_is_elementwise() {
        let coeffs = valid_blocks();
        let z = Coefficients::zeros(coeffs.dims());
        assert_eq!(&coeffs + &z, coeffs);

        let doubled = &coeffs + &coeffs;
        assert_eq!(doubled.gamma_1, array![[2.0, 4.0]]);
        assert_eq!(doubled.psi_0, array![[1.0, -1.0]]);
    }
}

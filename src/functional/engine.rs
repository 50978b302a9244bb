//! The shock-elasticity engine for one additive/multiplicative functional.
//!
//! Purpose
//! -------
//! Own the base coefficient tuple 𝒫 of a functional, a shared read-only
//! handle to its [`TriangularSystem`], and the memoized path histories
//! produced by iterating the composed transforms
//!
//! ```text
//! 𝒫_tilde[t] = 𝒫 + pull_back(𝒫_bar[t−1])
//! 𝒫_bar[t]   = integrate_shocks(𝒫_tilde[t])
//! ```
//!
//! and evaluate shock elasticities ε(x, t) from the recorded tilde
//! coefficients and shock covariances.
//!
//! Key behaviors
//! -------------
//! - [`Amf::iterate`] extends all three histories by exactly the requested
//!   number of steps; extension is idempotent (two calls compose to one).
//! - [`Amf::elasticity`] lazily extends the histories when asked for a
//!   horizon beyond the current one, then evaluates
//!   `Σ[t]·(μ₀ + μ₁·x₁)`, optionally projected onto a fixed exposure
//!   direction α_h.
//!
//! Invariants & assumptions
//! ------------------------
//! - The three histories always have equal length: index 0 holds the
//!   all-zero bar tuple and empty tilde/covariance slots; every later
//!   index holds a full (tilde, bar, Σ) triple.
//! - Histories only grow, one complete step at a time. A failing step
//!   ([`AmfError::SingularSigma`]) appends nothing, so earlier progress is
//!   retained and the equal-length invariant survives the error.
//! - Base coefficients, system, and exposure direction are fixed at
//!   construction; the histories are the only mutable state.
//! - One engine per modeled functional; no shared or process-wide state.
//!
//! Concurrency
//! -----------
//! Single-threaded by design. `iterate` and `elasticity` take `&mut self`,
//! so the borrow checker already serializes access to the histories;
//! no internal locking exists or is needed.
//!
//! References
//! ----------
//! Borovička, Jaroslav & Hansen, Lars Peter (2014). "Examining
//! macroeconomic models through the lens of asset pricing," Journal of
//! Econometrics 183(1), 67–90.
use crate::{
    functional::{
        coefficients::Coefficients,
        dims::FunctionalDims,
        errors::{AmfError, AmfResult},
        system::TriangularSystem,
        transforms::{integrate_shocks, pull_back},
    },
    linalg::mat,
};
use ndarray::Array2;
use std::sync::Arc;

/// An additive/multiplicative functional of a triangular state-space
/// system, with memoized transform paths and elasticity evaluation.
#[derive(Debug, Clone)]
pub struct Amf {
    coeffs: Coefficients,
    system: Arc<TriangularSystem>,
    exposure: Option<Array2<f64>>,
    dims: FunctionalDims,
    tilde_path: Vec<Option<Coefficients>>,
    bar_path: Vec<Coefficients>,
    sigma_path: Vec<Option<Array2<f64>>>,
}

impl Amf {
    /// Construct an engine for one functional.
    ///
    /// Cross-validates the dimensions implied by `coeffs` against those of
    /// `system`, and the exposure direction (if any) against the shock
    /// dimension. Seeds the histories with the t = 0 entries: an all-zero
    /// bar tuple and empty tilde/covariance slots.
    ///
    /// # Arguments
    /// - `coeffs`: base increment coefficients 𝒫 (validated).
    /// - `system`: shared read-only triangular system.
    /// - `exposure`: optional shock exposure direction α_h, shape k×1; when
    ///   present, elasticities are projected to 1×1.
    ///
    /// # Errors
    /// - [`AmfError::DimensionMismatch`] if `coeffs` and `system` disagree
    ///   on n, m, or k.
    /// - [`AmfError::ExposureShape`] if α_h is not k×1.
    pub fn new(
        coeffs: Coefficients, system: Arc<TriangularSystem>, exposure: Option<Array2<f64>>,
    ) -> AmfResult<Self> {
        let dims = coeffs.dims();
        let sys_dims = system.dims();
        if dims.n != sys_dims.n {
            return Err(AmfError::DimensionMismatch {
                what: "n (state block 1)",
                coeffs: dims.n,
                system: sys_dims.n,
            });
        }
        if dims.m != sys_dims.m {
            return Err(AmfError::DimensionMismatch {
                what: "m (state block 2)",
                coeffs: dims.m,
                system: sys_dims.m,
            });
        }
        if dims.k != sys_dims.k {
            return Err(AmfError::DimensionMismatch {
                what: "k (shock)",
                coeffs: dims.k,
                system: sys_dims.k,
            });
        }
        if let Some(alpha) = &exposure {
            if alpha.dim() != (dims.k, 1) {
                return Err(AmfError::ExposureShape {
                    expected: (dims.k, 1),
                    actual: alpha.dim(),
                });
            }
        }

        Ok(Amf {
            bar_path: vec![Coefficients::zeros(dims)],
            tilde_path: vec![None],
            sigma_path: vec![None],
            coeffs,
            system,
            exposure,
            dims,
        })
    }

    /// Dimensions (n, m, k) of the functional.
    pub fn dims(&self) -> FunctionalDims {
        self.dims
    }

    /// Current horizon T: the histories hold entries for t = 0..=T.
    pub fn horizon(&self) -> usize {
        self.bar_path.len() - 1
    }

    /// The bar-coefficient history; `bar_path()[0]` is the all-zero tuple.
    pub fn bar_path(&self) -> &[Coefficients] {
        &self.bar_path
    }

    /// The tilde-coefficient history; `tilde_path()[0]` is `None`.
    pub fn tilde_path(&self) -> &[Option<Coefficients>] {
        &self.tilde_path
    }

    /// The shock covariance history; `sigma_path()[0]` is `None`, later
    /// entries are the k×k Σ recorded at each step.
    pub fn sigma_path(&self) -> &[Option<Array2<f64>>] {
        &self.sigma_path
    }

    /// Extend the path histories by `steps` iterations of the composed
    /// transforms. `steps = 0` is a no-op.
    ///
    /// Each step computes the full (tilde, bar, Σ) triple before appending
    /// anything, so a failure leaves the histories exactly as after the
    /// last successful step.
    ///
    /// # Errors
    /// - [`AmfError::SingularSigma`] from the bar transform; partial
    ///   progress up to the failing step is retained.
    pub fn iterate(&mut self, steps: usize) -> AmfResult<()> {
        for _ in 0..steps {
            let prev_bar = self.bar_path.last().expect("seeded at construction");
            let tilde = &self.coeffs + &pull_back(prev_bar, &self.system);
            let (bar, sigma) = integrate_shocks(&tilde)?;
            self.tilde_path.push(Some(tilde));
            self.bar_path.push(bar);
            self.sigma_path.push(Some(sigma));
        }
        Ok(())
    }

    /// Shock elasticity at state `x = (x1, x2)` and horizon `t`.
    ///
    /// If `t` lies beyond the current horizon the histories are extended
    /// on demand; callers never need to pre-extend. The elasticity is
    ///
    /// ```text
    /// ε(x, t) = Σ[t] · (μ₀ + μ₁·x₁)           (k×1)
    /// ```
    ///
    /// with `μ₀ = Ψ₀[t]ᵀ` and `μ₁ = mat(Ψ₁[t], (k, n))` taken from the
    /// tilde history, or `α_hᵀ · Σ[t] · (μ₀ + μ₁·x₁)` (1×1) when an
    /// exposure direction was supplied. `x2` is accepted for interface
    /// symmetry and validated, but the first-order elasticity depends only
    /// on `x1` and the shock-loading structure.
    ///
    /// # Errors
    /// - [`AmfError::HorizonZero`] if `t == 0`.
    /// - [`AmfError::StateShape`] if `x1` is not n×1 or `x2` is not m×1.
    /// - [`AmfError::SingularSigma`] from any auto-extension step.
    pub fn elasticity(
        &mut self, x: (&Array2<f64>, &Array2<f64>), t: usize,
    ) -> AmfResult<Array2<f64>> {
        let (x1, x2) = x;
        let FunctionalDims { n, m, k } = self.dims;
        if t == 0 {
            return Err(AmfError::HorizonZero);
        }
        if x1.dim() != (n, 1) {
            return Err(AmfError::StateShape { name: "x1", expected: (n, 1), actual: x1.dim() });
        }
        if x2.dim() != (m, 1) {
            return Err(AmfError::StateShape { name: "x2", expected: (m, 1), actual: x2.dim() });
        }

        let horizon = self.horizon();
        if t > horizon {
            self.iterate(t - horizon)?;
        }

        let tilde = self.tilde_path[t].as_ref().expect("entries past t = 0 are recorded");
        let sigma = self.sigma_path[t].as_ref().expect("entries past t = 0 are recorded");

        let mu_0 = tilde.psi_0.t();
        let mu_1 = mat(&tilde.psi_1, (k, n));
        let drift = mu_1.dot(x1) + &mu_0;
        let raw = sigma.dot(&drift);

        match &self.exposure {
            Some(alpha) => Ok(alpha.t().dot(&raw)),
            None => Ok(raw),
        }
    }
}

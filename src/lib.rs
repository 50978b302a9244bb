//! shock_elasticities — shock elasticities of triangular state-space
//! functionals, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the elasticity engine to Python via the `_shock_elasticities`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing class and the module initializer.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`functional` and `linalg`) as the
//!   public crate surface.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer for
//!   the `_shock_elasticities` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this
//!   file performs only FFI glue, input extraction, and error mapping.
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules hold (shapes validated by
//!   the Rust constructors, not by the glue).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`functional`] (or its
//!   prelude) and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//! - Python callers construct `Amf(coefficients, system, alpha_h=None)`
//!   from sequences of 2-D float arrays and call `iterate` / `elasticity`;
//!   domain errors surface as `ValueError`.

pub mod functional;
pub mod linalg;
pub mod utils;

#[cfg(feature = "python-bindings")]
use crate::functional::Amf;
#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;
#[cfg(feature = "python-bindings")]
use pyo3::types::PyAny;

/// Python-facing handle around the elasticity engine.
///
/// Owns its coefficients and triangular system; the path histories grow
/// inside the handle exactly as they do for native Rust callers.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "Amf", module = "shock_elasticities")]
pub struct AmfHandle {
    inner: Amf,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl AmfHandle {
    /// Build an engine from Python inputs.
    ///
    /// - `coefficients`: sequence of 7 2-D arrays (Γ₀, Γ₁, Γ₂, Γ₃, Ψ₀,
    ///   Ψ₁, Ψ₂).
    /// - `system`: sequence of 10 2-D arrays (Θ₁₀, Θ₁₁, Λ₁₀, Θ₂₀, Θ₂₁,
    ///   Θ₂₂, Θ₂₃, Λ₂₀, Λ₂₁, Λ₂₂).
    /// - `alpha_h`: optional k×1 exposure direction.
    #[new]
    #[pyo3(signature = (coefficients, system, alpha_h = None))]
    fn new(
        py: Python<'_>, coefficients: &Bound<'_, PyAny>, system: &Bound<'_, PyAny>,
        alpha_h: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let coeffs = utils::extract_coefficients(py, coefficients)?;
        let system = utils::extract_system(py, system)?;
        let exposure = match alpha_h {
            Some(arr) => Some(utils::extract_f64_matrix(py, arr)?),
            None => None,
        };
        let inner = Amf::new(coeffs, std::sync::Arc::new(system), exposure)?;
        Ok(AmfHandle { inner })
    }

    /// Extend the path histories by `steps` iterations.
    fn iterate(&mut self, steps: usize) -> PyResult<()> {
        self.inner.iterate(steps)?;
        Ok(())
    }

    /// Current horizon T of the path histories.
    fn horizon(&self) -> usize {
        self.inner.horizon()
    }

    /// Shock elasticity at state `(x1, x2)` and horizon `t`, as a 2-D
    /// numpy array (k×1, or 1×1 when an exposure direction was supplied).
    fn elasticity<'py>(
        &mut self, py: Python<'py>, x1: &Bound<'py, PyAny>, x2: &Bound<'py, PyAny>, t: usize,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let x1 = utils::extract_f64_matrix(py, x1)?;
        let x2 = utils::extract_f64_matrix(py, x2)?;
        let eps = self.inner.elasticity((&x1, &x2), t)?;
        Ok(eps.into_pyarray(py))
    }
}

/// Module initializer for the `_shock_elasticities` Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _shock_elasticities(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<AmfHandle>()?;
    Ok(())
}

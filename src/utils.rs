#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray2;

#[cfg(feature = "python-bindings")]
use crate::functional::{Coefficients, TriangularSystem};

/// Extract a 2-D float64 matrix from a numpy array (or anything exposing
/// `to_numpy`, e.g. a pandas DataFrame) into an owned `Array2`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    _py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw.call_method0("to_numpy") {
        if let Ok(arr_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(arr_ro.as_array().to_owned());
        }
    }

    Err(pyo3::exceptions::PyTypeError::new_err(
        "expected a 2-D numpy.ndarray of float64 (or an object with to_numpy())",
    ))
}

/// Extract the 7-element coefficient sequence (Γ₀, Γ₁, Γ₂, Γ₃, Ψ₀, Ψ₁, Ψ₂)
/// into a validated [`Coefficients`] tuple.
#[cfg(feature = "python-bindings")]
pub fn extract_coefficients<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<Coefficients> {
    let blocks = extract_matrix_sequence(py, raw, 7, "coefficients")?;
    let mut it = blocks.into_iter();
    // Length checked above; the order is the fixed positional contract.
    let coeffs = Coefficients::new(
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
    )?;
    Ok(coeffs)
}

/// Extract the 10-element system sequence (Θ₁₀, Θ₁₁, Λ₁₀, Θ₂₀, Θ₂₁, Θ₂₂,
/// Θ₂₃, Λ₂₀, Λ₂₁, Λ₂₂) into a validated [`TriangularSystem`].
#[cfg(feature = "python-bindings")]
pub fn extract_system<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<TriangularSystem> {
    let mats = extract_matrix_sequence(py, raw, 10, "system")?;
    let mut it = mats.into_iter();
    let system = TriangularSystem::new(
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
    )?;
    Ok(system)
}

#[cfg(feature = "python-bindings")]
fn extract_matrix_sequence<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, expected_len: usize, what: &str,
) -> PyResult<Vec<Array2<f64>>> {
    let items: Vec<Bound<'py, PyAny>> = raw.extract().map_err(|_| {
        PyValueError::new_err(format!("{what} must be a sequence of {expected_len} 2-D arrays"))
    })?;
    if items.len() != expected_len {
        return Err(PyValueError::new_err(format!(
            "{what} must contain exactly {expected_len} arrays, got {}",
            items.len()
        )));
    }
    items.iter().map(|item| extract_f64_matrix(py, item)).collect()
}

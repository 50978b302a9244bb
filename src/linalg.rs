//! Column-major matrix utilities shared by the functional transforms.
//!
//! The coefficient algebra stores quadratic terms as flattened row blocks,
//! so moving between the 1×(r·c) row form and the r×c matrix form must use
//! one fixed convention everywhere. This module pins that convention to
//! **column-major** (`vec` stacks columns): mixing conventions at any call
//! site silently corrupts the recursion, which is why the reshape helpers
//! live here and nowhere else.
//!
//! Also provides the `ndarray` → `nalgebra` copy bridge used wherever LU
//! factorizations (determinant, inverse) are needed on matrices that are
//! otherwise carried as `ndarray` containers.
use nalgebra::DMatrix;
use ndarray::Array2;

/// Reinterpret a flattened 1×(r·c) row block as an r×c matrix,
/// column-major: entry `(i, j)` is read from flat index `j·r + i`.
///
/// # Panics
/// Panics if `v` is not a single row of exactly `r·c` entries. Shapes are
/// validated at construction boundaries, so a violation here is a logic bug.
pub fn mat(v: &Array2<f64>, shape: (usize, usize)) -> Array2<f64> {
    let (r, c) = shape;
    assert_eq!(
        v.dim(),
        (1, r * c),
        "mat: expected a 1x{} row block for a {}x{} target",
        r * c,
        r,
        c
    );
    Array2::from_shape_fn((r, c), |(i, j)| v[[0, j * r + i]])
}

/// Flatten an r×c matrix into a 1×(r·c) row block, column-major.
///
/// Inverse of [`mat`]: `vec_row(&mat(&v, (r, c)))` reproduces `v`.
pub fn vec_row(m: &Array2<f64>) -> Array2<f64> {
    let (r, c) = m.dim();
    Array2::from_shape_fn((1, r * c), |(_, idx)| m[[idx % r, idx / r]])
}

/// Symmetrize a square matrix: `(M + Mᵀ) / 2`.
pub fn sym(m: &Array2<f64>) -> Array2<f64> {
    let mt = m.t();
    (m + &mt) / 2.0
}

/// Copy an `ndarray` matrix into a `nalgebra::DMatrix` for factorization.
///
/// The copy proceeds column by column, matching the column-major internal
/// storage of `DMatrix`. No symmetry or shape assumptions beyond the
/// source dimensions.
pub fn to_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.dim();
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            out[(i, j)] = m[[i, j]];
        }
    }
    out
}

/// Copy a `nalgebra::DMatrix` back into an `ndarray` matrix.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

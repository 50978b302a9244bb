//! functional — shock elasticities of additive/multiplicative functionals.
//!
//! Purpose
//! -------
//! Collect the building blocks for computing shock elasticities of
//! additive/multiplicative functionals of two-block triangular
//! linear-Gaussian state-space systems: the validated coefficient tuple
//! and system containers, the two coefficient transforms, and the engine
//! that iterates them and evaluates elasticities.
//!
//! Key behaviors
//! -------------
//! - Define dimension and data containers ([`FunctionalDims`],
//!   [`Coefficients`], [`TriangularSystem`]), all validated once at
//!   construction and immutable thereafter.
//! - Implement the composed transform pair ([`integrate_shocks`],
//!   [`pull_back`]) as pure functions over coefficient tuples.
//! - Drive the fixed-point recursion and elasticity evaluation through
//!   [`Amf`], which owns the append-only path histories.
//! - Report failures via the typed [`AmfError`] / [`AmfResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - One fixed column-major flattening convention for all quadratic
//!   blocks, supplied by [`crate::linalg`] and used at every call site.
//! - Constructors enforce conformability, so the transform and engine
//!   internals operate on matrices whose shapes are known to agree.
//! - The engine's path histories are append-only and always parallel; the
//!   single runtime failure mode of the recursion is a singular shock
//!   precision matrix.
//!
//! Downstream usage
//! ----------------
//! - Build a [`TriangularSystem`] and a base [`Coefficients`] tuple for
//!   the functional of interest, wrap them in an [`Amf`] (optionally with
//!   an exposure direction), and call [`Amf::elasticity`] per horizon and
//!   state; the histories grow lazily on demand.
//! - The transforms are public for callers who want single applications
//!   of the mappings without path bookkeeping.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover shape validation, the closed-form
//!   scalar cases of both transforms, degenerate (zero-shock) behavior,
//!   path idempotence, lazy extension, projection linearity, and the
//!   singular-precision failure path.
//! - The `tests/` integration suite exercises the full pipeline on
//!   multi-dimensional systems.

pub mod coefficients;
pub mod dims;
pub mod engine;
pub mod errors;
pub mod system;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coefficients::Coefficients;
pub use self::dims::FunctionalDims;
pub use self::engine::Amf;
pub use self::errors::{AmfError, AmfResult};
pub use self::system::TriangularSystem;
pub use self::transforms::{integrate_shocks, pull_back};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use shock_elasticities::functional::prelude::*;
//
// to import the main surface in a single line.

pub mod prelude {
    pub use super::coefficients::Coefficients;
    pub use super::dims::FunctionalDims;
    pub use super::engine::Amf;
    pub use super::errors::{AmfError, AmfResult};
    pub use super::system::TriangularSystem;
}

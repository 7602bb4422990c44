//! linmat-core: a dense-matrix linear-algebra core.
//!
//! The crate provides a validated dense `Matrix` store with cached aggregates,
//! pivoted Gaussian elimination (determinant), Gauss-Jordan inversion, and a
//! linear solver with iterative error correction. Matrices can be persisted
//! as CSV or as a serialized object and rendered as text or HTML.
//!
//! All operations are synchronous and work on private copies: a failing
//! operation never leaves a matrix partially modified.
pub mod config;
mod elimination;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod solver;

pub use config::NumericConfig;
pub use error::{MatrixError, Result};
pub use math::{Matrix, Vector};

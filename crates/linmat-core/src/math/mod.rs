//! Dense matrix and vector types.
//!
//! `Matrix` owns a validated row-major buffer together with its cached
//! aggregates; `Vector` is the small value type used for right-hand sides and
//! solutions of linear systems.
mod factory;
#[cfg(feature = "ndarray")]
pub mod interop;
pub mod matrix;
pub mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

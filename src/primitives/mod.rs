//! Core compute primitives (Vector, Matrix).
//!
//! Dense row-major storage in `f64`.

mod matrix;
mod vector;

pub use matrix::{LeastSquares, Matrix, SymmetricEigen};
pub use vector::Vector;

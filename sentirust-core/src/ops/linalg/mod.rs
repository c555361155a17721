// src/ops/linalg/mod.rs

//! Linear algebra blocks: inner product and matrix-vector product.

pub mod dot;
pub mod mat_vec;

pub use dot::{dot_op, Dot};
pub use mat_vec::{mul_op, Mul};

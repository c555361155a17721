// src/ops/arithmetic/mod.rs

//! Elementwise vector arithmetic blocks.

pub mod sum;
pub mod vector_mul;

pub use sum::{sum_op, Sum};
pub use vector_mul::{product_op, vector_mul_op, VectorMul};

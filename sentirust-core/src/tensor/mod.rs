// src/tensor/mod.rs

//! # Numeric containers
//!
//! Dense [`Vector`] and [`Matrix`] value types plus the [`Value`] trait that lets
//! blocks stay generic over scalars, vectors and matrices.

pub mod matrix;
pub mod traits;
pub mod vector;

pub use matrix::Matrix;
pub use traits::Value;
pub use vector::Vector;

/// Half-width of the uniform distribution used for random parameter initialization.
pub const INIT_RANGE: f64 = 0.1;

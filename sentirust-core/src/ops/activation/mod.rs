// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! - [`Sigmoid`]: logistic function on a scalar block, clamped for stability.
//! - [`Tanh`]: elementwise hyperbolic tangent on a vector block.

pub mod sigmoid;
pub mod tanh;

pub use sigmoid::{sigmoid, sigmoid_op, Sigmoid, SIGMOID_CLAMP};
pub use tanh::{tanh_op, Tanh};

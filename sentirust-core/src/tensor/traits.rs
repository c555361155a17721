// src/tensor/traits.rs

use crate::error::SentiError;
use std::fmt::Debug;

/// A trait representing the value types that can flow through a block graph.
///
/// Implemented for scalars (`f64`), [`Vector`](super::Vector) and
/// [`Matrix`](super::Matrix). Gradients always have the same type (and shape)
/// as the value they are taken with respect to, so this single trait covers
/// both forward values and gradient accumulators.
pub trait Value: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Shape of the value: `[]` for scalars, `[n]` for vectors, `[rows, cols]` for matrices.
    fn shape(&self) -> Vec<usize>;

    /// A value of identical shape filled with zeros.
    fn zeros_like(&self) -> Self;

    /// Adds `other` into `self` elementwise.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if the shapes differ.
    fn add_assign_checked(&mut self, other: &Self, operation: &str) -> Result<(), SentiError>;

    /// Returns a copy multiplied elementwise by `factor`.
    fn scale(&self, factor: f64) -> Self;

    /// Sum of squared components.
    fn squared_norm(&self) -> f64;

    /// Flat, row-major view of the components.
    fn as_slice(&self) -> &[f64];

    /// Mutable flat, row-major view of the components.
    fn as_mut_slice(&mut self) -> &mut [f64];

    /// Number of scalar components.
    fn numel(&self) -> usize {
        self.as_slice().len()
    }
}

impl Value for f64 {
    fn shape(&self) -> Vec<usize> {
        Vec::new()
    }

    fn zeros_like(&self) -> Self {
        0.0
    }

    fn add_assign_checked(&mut self, other: &Self, _operation: &str) -> Result<(), SentiError> {
        *self += *other;
        Ok(())
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn squared_norm(&self) -> f64 {
        self * self
    }

    fn as_slice(&self) -> &[f64] {
        std::slice::from_ref(self)
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        std::slice::from_mut(self)
    }
}

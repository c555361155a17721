use crate::autograd::{Block, BlockRef, Pass};
use crate::error::SentiError;
use crate::tensor::{Matrix, Value, Vector};
use crate::utils::sync::{read_or_recover, write_or_recover};
use rand::Rng;
use std::fmt;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct ParamState<T> {
    value: T,
    grad: T,
}

#[derive(Debug)]
struct ParamInner<T> {
    name: String,
    trainable: bool,
    state: RwLock<ParamState<T>>,
}

/// A leaf block holding trainable (or fixed) state.
///
/// `Param` is a cheap handle: cloning it clones an `Arc`, so every clone (and
/// every [`BlockRef`] obtained through [`Param::block`]) aliases the same value
/// and gradient accumulator. Gradients **accumulate**: a parameter referenced
/// by several consumers, in one graph or many, receives the sum of all
/// contributions until [`Param::zero_grad`] is called by the optimizer.
///
/// Fixed parameters (e.g. pretrained embeddings) forward their value like any
/// other parameter but discard incoming gradients.
pub struct Param<T: Value> {
    inner: Arc<ParamInner<T>>,
}

/// A trainable or fixed vector leaf.
pub type VectorParam = Param<Vector>;
/// A trainable or fixed matrix leaf.
pub type MatrixParam = Param<Matrix>;

impl<T: Value> Param<T> {
    /// Creates a trainable parameter with the given initial value and a zero gradient.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self::build(name.into(), value, true)
    }

    /// Creates a parameter whose value is never updated by `backward`.
    pub fn fixed(name: impl Into<String>, value: T) -> Self {
        Self::build(name.into(), value, false)
    }

    fn build(name: String, value: T, trainable: bool) -> Self {
        let grad = value.zeros_like();
        Param {
            inner: Arc::new(ParamInner {
                name,
                trainable,
                state: RwLock::new(ParamState { value, grad }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_trainable(&self) -> bool {
        self.inner.trainable
    }

    pub fn shape(&self) -> Vec<usize> {
        read_or_recover(&self.inner.state, &self.inner.name).value.shape()
    }

    /// Returns a copy of the current value.
    pub fn value(&self) -> T {
        read_or_recover(&self.inner.state, &self.inner.name).value.clone()
    }

    /// Returns a copy of the accumulated gradient.
    pub fn grad(&self) -> T {
        read_or_recover(&self.inner.state, &self.inner.name).grad.clone()
    }

    /// Replaces the value, e.g. after an optimizer step.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `value` has a different shape.
    pub fn set_value(&self, value: T) -> Result<(), SentiError> {
        let mut state = write_or_recover(&self.inner.state, &self.inner.name);
        if state.value.shape() != value.shape() {
            return Err(SentiError::ShapeMismatch {
                expected: state.value.shape(),
                actual: value.shape(),
                operation: format!("set_value on {}", self.inner.name),
            });
        }
        state.value = value;
        Ok(())
    }

    /// Adds `grad` into the gradient accumulator. No-op for fixed parameters.
    pub fn accumulate_grad(&self, grad: &T) -> Result<(), SentiError> {
        if !self.inner.trainable {
            return Ok(());
        }
        let mut state = write_or_recover(&self.inner.state, &self.inner.name);
        state
            .grad
            .add_assign_checked(grad, &format!("gradient accumulation on {}", self.inner.name))
    }

    /// Resets the gradient accumulator to zero.
    pub fn zero_grad(&self) {
        let mut state = write_or_recover(&self.inner.state, &self.inner.name);
        state.grad = state.value.zeros_like();
    }

    /// `true` if both handles refer to the same parameter node.
    pub fn same_node(&self, other: &Param<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A graph handle aliasing this parameter's state.
    pub fn block(&self) -> BlockRef<T> {
        Arc::new(self.clone())
    }

    pub(crate) fn element(&self, index: usize) -> Option<f64> {
        read_or_recover(&self.inner.state, &self.inner.name)
            .value
            .as_slice()
            .get(index)
            .copied()
    }

    pub(crate) fn set_element(&self, index: usize, x: f64) -> Result<(), SentiError> {
        let mut state = write_or_recover(&self.inner.state, &self.inner.name);
        let len = state.value.numel();
        match state.value.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = x;
                Ok(())
            }
            None => Err(SentiError::IndexOutOfBounds { index, len }),
        }
    }
}

impl VectorParam {
    /// A trainable vector of `dim` small random components.
    pub fn random<R: Rng + ?Sized>(name: impl Into<String>, dim: usize, rng: &mut R) -> Self {
        Param::new(name, Vector::random(dim, rng))
    }

    /// A trainable vector of `dim` copies of `value` (e.g. a bias initialized to 1.0).
    pub fn constant(name: impl Into<String>, dim: usize, value: f64) -> Self {
        Param::new(name, Vector::filled(dim, value))
    }
}

impl MatrixParam {
    /// A trainable `rows × cols` matrix of small random components.
    pub fn random<R: Rng + ?Sized>(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Self {
        Param::new(name, Matrix::random(rows, cols, rng))
    }
}

impl<T: Value> Block<T> for Param<T> {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn eval(&self, _pass: Pass) -> Result<T, SentiError> {
        Ok(self.value())
    }

    fn backward(&self, grad: &T) -> Result<(), SentiError> {
        self.accumulate_grad(grad)
    }

    fn value(&self) -> Option<T> {
        Some(Param::value(self))
    }
}

impl<T: Value> Clone for Param<T> {
    /// Cloning a Param clones the handle, not the state.
    fn clone(&self) -> Self {
        Param {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Value> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read_or_recover(&self.inner.state, &self.inner.name);
        f.debug_struct("Param")
            .field("name", &self.inner.name)
            .field("trainable", &self.inner.trainable)
            .field("value", &state.value)
            .field("grad", &state.grad)
            .finish()
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;

use crate::autograd::{backward_input, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use num_traits::{clamp, Float};
use std::sync::Arc;

/// Inputs are clamped to `[-SIGMOID_CLAMP, SIGMOID_CLAMP]` before exponentiation.
pub const SIGMOID_CLAMP: f64 = 30.0;

/// Numerically stable logistic function.
pub fn sigmoid<F: Float>(x: F) -> F {
    let limit = F::from(SIGMOID_CLAMP).unwrap_or_else(F::max_value);
    let x = clamp(x, -limit, limit);
    if x >= F::zero() {
        F::one() / (F::one() + (-x).exp())
    } else {
        let e = x.exp();
        e / (F::one() + e)
    }
}

/// Logistic sigmoid of a scalar block.
///
/// Backward: `g · σ(x) · (1 − σ(x))`, computed from the cached output.
#[derive(Debug)]
pub struct Sigmoid {
    x: BlockRef<f64>,
    cache: PassCache<f64>,
}

impl Sigmoid {
    pub fn new(x: BlockRef<f64>) -> Self {
        Sigmoid {
            x,
            cache: PassCache::new(),
        }
    }
}

impl Block<f64> for Sigmoid {
    fn name(&self) -> &str {
        "Sigmoid"
    }

    fn eval(&self, pass: Pass) -> Result<f64, SentiError> {
        self.cache
            .get_or_try_insert(pass, || Ok(sigmoid(self.x.eval(pass)?)))
    }

    fn backward(&self, grad: &f64) -> Result<(), SentiError> {
        let (pass, s) = self.cache.require(self.name())?;
        backward_input(&self.x, &(grad * s * (1.0 - s)), pass)
    }

    fn value(&self) -> Option<f64> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`Sigmoid`] block.
pub fn sigmoid_op(x: BlockRef<f64>) -> BlockRef<f64> {
    Arc::new(Sigmoid::new(x))
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;

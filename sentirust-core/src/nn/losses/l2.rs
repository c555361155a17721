// sentirust-core/src/nn/losses/l2.rs

use crate::autograd::{backward_input, cached_input, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::Value;
use std::sync::Arc;

/// Squared-L2 penalty over a set of parameter blocks.
///
/// Forward: `strength · Σ‖pᵢ‖²`. Backward: `g · strength · 2·pᵢ` into each `pᵢ`.
///
/// A strength of zero still builds and evaluates the block: the forward
/// value is exactly `0.0` and every parameter receives a zero gradient, so
/// graphs keep the same shape whether or not regularization is active.
#[derive(Debug)]
pub struct L2Regularization<T: Value> {
    strength: f64,
    params: Vec<BlockRef<T>>,
    cache: PassCache<f64>,
}

impl<T: Value> L2Regularization<T> {
    /// # Errors
    /// Returns `SentiError::InvalidArgument` if `strength` is negative or not finite.
    pub fn new(strength: f64, params: Vec<BlockRef<T>>) -> Result<Self, SentiError> {
        if !strength.is_finite() || strength < 0.0 {
            return Err(SentiError::InvalidArgument(format!(
                "regularization strength must be finite and non-negative, got {}",
                strength
            )));
        }
        Ok(L2Regularization {
            strength,
            params,
            cache: PassCache::new(),
        })
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl<T: Value> Block<f64> for L2Regularization<T> {
    fn name(&self) -> &str {
        "L2Regularization"
    }

    fn eval(&self, pass: Pass) -> Result<f64, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let mut total = 0.0;
            for param in &self.params {
                total += param.eval(pass)?.squared_norm();
            }
            Ok(self.strength * total)
        })
    }

    fn backward(&self, grad: &f64) -> Result<(), SentiError> {
        let (pass, _) = self.cache.require(self.name())?;
        let factor = 2.0 * self.strength * grad;
        for param in &self.params {
            let value = cached_input(param, pass)?;
            backward_input(param, &value.scale(factor), pass)?;
        }
        Ok(())
    }

    fn value(&self) -> Option<f64> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds an [`L2Regularization`] block.
pub fn l2_regularization_op<T: Value>(
    strength: f64,
    params: Vec<BlockRef<T>>,
) -> Result<BlockRef<f64>, SentiError> {
    Ok(Arc::new(L2Regularization::new(strength, params)?))
}

#[cfg(test)]
#[path = "l2_test.rs"]
mod tests;

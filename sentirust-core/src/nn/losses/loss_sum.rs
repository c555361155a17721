// sentirust-core/src/nn/losses/loss_sum.rs

use crate::autograd::{backward_input, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use std::sync::Arc;

/// Sum of scalar loss terms, typically a likelihood loss plus a regularizer.
///
/// Backward passes the upstream gradient unchanged to every child.
#[derive(Debug)]
pub struct LossSum {
    terms: Vec<BlockRef<f64>>,
    cache: PassCache<f64>,
}

impl LossSum {
    /// # Errors
    /// Returns `SentiError::EmptyInput` if `terms` is empty.
    pub fn new(terms: Vec<BlockRef<f64>>) -> Result<Self, SentiError> {
        if terms.is_empty() {
            return Err(SentiError::EmptyInput {
                operation: "LossSum".to_string(),
            });
        }
        Ok(LossSum {
            terms,
            cache: PassCache::new(),
        })
    }

    /// The common binary form `a + b`.
    pub fn pair(a: BlockRef<f64>, b: BlockRef<f64>) -> Self {
        LossSum {
            terms: vec![a, b],
            cache: PassCache::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Block<f64> for LossSum {
    fn name(&self) -> &str {
        "LossSum"
    }

    fn eval(&self, pass: Pass) -> Result<f64, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let mut total = 0.0;
            for term in &self.terms {
                total += term.eval(pass)?;
            }
            Ok(total)
        })
    }

    fn backward(&self, grad: &f64) -> Result<(), SentiError> {
        let (pass, _) = self.cache.require(self.name())?;
        for term in &self.terms {
            backward_input(term, grad, pass)?;
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

/// Builds a [`LossSum`] over `terms`.
pub fn loss_sum_op(terms: Vec<BlockRef<f64>>) -> Result<BlockRef<f64>, SentiError> {
    Ok(Arc::new(LossSum::new(terms)?))
}

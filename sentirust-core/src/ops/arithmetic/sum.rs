use crate::autograd::{backward_input, check_grad_shape, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::{Value, Vector};
use std::sync::Arc;

/// Elementwise sum of one or more vector blocks.
///
/// Backward hands the upstream gradient, unchanged, to every input. An input
/// listed twice therefore receives it twice.
#[derive(Debug)]
pub struct Sum {
    inputs: Vec<BlockRef<Vector>>,
    cache: PassCache<Vector>,
}

impl Sum {
    /// # Errors
    /// Returns `SentiError::EmptyInput` if `inputs` is empty.
    pub fn new(inputs: Vec<BlockRef<Vector>>) -> Result<Self, SentiError> {
        if inputs.is_empty() {
            return Err(SentiError::EmptyInput {
                operation: "Sum".to_string(),
            });
        }
        Ok(Sum {
            inputs,
            cache: PassCache::new(),
        })
    }
}

impl Block<Vector> for Sum {
    fn name(&self) -> &str {
        "Sum"
    }

    fn eval(&self, pass: Pass) -> Result<Vector, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let mut acc = self.inputs[0].eval(pass)?;
            for input in &self.inputs[1..] {
                acc.add_assign_checked(&input.eval(pass)?, "Sum forward")?;
            }
            Ok(acc)
        })
    }

    fn backward(&self, grad: &Vector) -> Result<(), SentiError> {
        let (pass, output) = self.cache.require(self.name())?;
        check_grad_shape(&output, grad, self.name())?;
        for input in &self.inputs {
            backward_input(input, grad, pass)?;
        }
        Ok(())
    }

    fn value(&self) -> Option<Vector> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`Sum`] block over `inputs`.
pub fn sum_op(inputs: Vec<BlockRef<Vector>>) -> Result<BlockRef<Vector>, SentiError> {
    Ok(Arc::new(Sum::new(inputs)?))
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;

use crate::autograd::{backward_input, cached_input, check_grad_shape, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::Vector;
use std::sync::Arc;

/// Elementwise product of two vector blocks.
///
/// `∂/∂a = g ⊙ b` and `∂/∂b = g ⊙ a`. Longer products are built by chaining.
#[derive(Debug)]
pub struct VectorMul {
    a: BlockRef<Vector>,
    b: BlockRef<Vector>,
    cache: PassCache<Vector>,
}

impl VectorMul {
    pub fn new(a: BlockRef<Vector>, b: BlockRef<Vector>) -> Self {
        VectorMul {
            a,
            b,
            cache: PassCache::new(),
        }
    }
}

impl Block<Vector> for VectorMul {
    fn name(&self) -> &str {
        "VectorMul"
    }

    fn eval(&self, pass: Pass) -> Result<Vector, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let a = self.a.eval(pass)?;
            let b = self.b.eval(pass)?;
            a.hadamard(&b)
        })
    }

    fn backward(&self, grad: &Vector) -> Result<(), SentiError> {
        let (pass, output) = self.cache.require(self.name())?;
        check_grad_shape(&output, grad, self.name())?;
        let a = cached_input(&self.a, pass)?;
        let b = cached_input(&self.b, pass)?;
        backward_input(&self.a, &grad.hadamard(&b)?, pass)?;
        backward_input(&self.b, &grad.hadamard(&a)?, pass)
    }

    fn value(&self) -> Option<Vector> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`VectorMul`] block.
pub fn vector_mul_op(a: BlockRef<Vector>, b: BlockRef<Vector>) -> BlockRef<Vector> {
    Arc::new(VectorMul::new(a, b))
}

/// Chains [`VectorMul`] left to right over `inputs`: `((x1 ⊙ x2) ⊙ x3) ⊙ ...`.
///
/// # Errors
/// Returns `SentiError::EmptyInput` if `inputs` is empty.
pub fn product_op(inputs: Vec<BlockRef<Vector>>) -> Result<BlockRef<Vector>, SentiError> {
    let mut iter = inputs.into_iter();
    let first = iter.next().ok_or_else(|| SentiError::EmptyInput {
        operation: "product".to_string(),
    })?;
    Ok(iter.fold(first, vector_mul_op))
}

#[cfg(test)]
#[path = "vector_mul_test.rs"]
mod tests;

use crate::autograd::{backward_input, cached_input, check_grad_shape, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::{Matrix, Vector};
use std::sync::Arc;

/// Matrix-vector product `W·x`.
///
/// `W` is `rows × cols`, `x` has length `cols` and the output has length
/// `rows`. Backward: `∂/∂W = g ⊗ xᵗ` and `∂/∂x = Wᵗ·g`.
#[derive(Debug)]
pub struct Mul {
    w: BlockRef<Matrix>,
    x: BlockRef<Vector>,
    cache: PassCache<Vector>,
}

impl Mul {
    pub fn new(w: BlockRef<Matrix>, x: BlockRef<Vector>) -> Self {
        Mul {
            w,
            x,
            cache: PassCache::new(),
        }
    }
}

impl Block<Vector> for Mul {
    fn name(&self) -> &str {
        "Mul"
    }

    fn eval(&self, pass: Pass) -> Result<Vector, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let w = self.w.eval(pass)?;
            let x = self.x.eval(pass)?;
            w.mul_vec(&x)
        })
    }

    fn backward(&self, grad: &Vector) -> Result<(), SentiError> {
        let (pass, output) = self.cache.require(self.name())?;
        check_grad_shape(&output, grad, self.name())?;
        let w = cached_input(&self.w, pass)?;
        let x = cached_input(&self.x, pass)?;
        backward_input(&self.w, &grad.outer(&x), pass)?;
        backward_input(&self.x, &w.transpose_mul_vec(grad)?, pass)
    }

    fn value(&self) -> Option<Vector> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`Mul`] block computing `w·x`.
pub fn mul_op(w: BlockRef<Matrix>, x: BlockRef<Vector>) -> BlockRef<Vector> {
    Arc::new(Mul::new(w, x))
}

#[cfg(test)]
#[path = "mat_vec_test.rs"]
mod tests;

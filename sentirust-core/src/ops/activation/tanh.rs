use crate::autograd::{backward_input, check_grad_shape, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::Vector;
use std::sync::Arc;

/// Elementwise hyperbolic tangent of a vector block.
///
/// Backward: `g ⊙ (1 − tanh(x)²)`, computed from the cached output.
#[derive(Debug)]
pub struct Tanh {
    x: BlockRef<Vector>,
    cache: PassCache<Vector>,
}

impl Tanh {
    pub fn new(x: BlockRef<Vector>) -> Self {
        Tanh {
            x,
            cache: PassCache::new(),
        }
    }
}

impl Block<Vector> for Tanh {
    fn name(&self) -> &str {
        "Tanh"
    }

    fn eval(&self, pass: Pass) -> Result<Vector, SentiError> {
        self.cache
            .get_or_try_insert(pass, || Ok(self.x.eval(pass)?.map(f64::tanh)))
    }

    fn backward(&self, grad: &Vector) -> Result<(), SentiError> {
        let (pass, y) = self.cache.require(self.name())?;
        check_grad_shape(&y, grad, self.name())?;
        let local = y.map(|t| 1.0 - t * t);
        backward_input(&self.x, &grad.hadamard(&local)?, pass)
    }

    fn value(&self) -> Option<Vector> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`Tanh`] block.
pub fn tanh_op(x: BlockRef<Vector>) -> BlockRef<Vector> {
    Arc::new(Tanh::new(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::check_grad;
    use crate::nn::{Param, VectorParam};
    use crate::ops::linalg::dot_op;
    use approx::assert_relative_eq;

    #[test]
    fn test_tanh_forward() -> Result<(), SentiError> {
        let x = Param::new("x", Vector::new(vec![0.0, 1.0, -2.0]));
        let y = tanh_op(x.block()).forward()?;
        let expected = Vector::new(vec![0.0, 1.0f64.tanh(), (-2.0f64).tanh()]);
        assert_relative_eq!(y, expected, epsilon = 1e-15);
        Ok(())
    }

    #[test]
    fn test_tanh_backward_at_zero_is_identity() -> Result<(), SentiError> {
        let x = Param::new("x", Vector::zeros(3));
        let y = tanh_op(x.block());
        y.forward()?;
        y.backward(&Vector::new(vec![1.0, 2.0, -3.0]))?;
        assert_relative_eq!(x.grad(), Vector::new(vec![1.0, 2.0, -3.0]));
        Ok(())
    }

    #[test]
    fn test_tanh_saturates_without_nan() -> Result<(), SentiError> {
        let x = Param::new("x", Vector::new(vec![1e4, -1e4]));
        let y = tanh_op(x.block());
        assert_eq!(y.forward()?, Vector::new(vec![1.0, -1.0]));
        y.backward(&Vector::filled(2, 1.0))?;
        assert_eq!(x.grad(), Vector::zeros(2));
        Ok(())
    }

    #[test]
    fn test_tanh_grad_check() {
        let x = Param::new("x", Vector::new(vec![0.0, 0.5, -1.5, 2.5]));
        let w = VectorParam::constant("w", 4, 0.7);
        let root = dot_op(tanh_op(x.block()), w.block());
        check_grad(root.as_ref(), &[&x, &w], 1e-6, 1e-6).expect("gradients should match");
    }
}

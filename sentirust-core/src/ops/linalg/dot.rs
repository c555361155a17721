use crate::autograd::{backward_input, cached_input, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::{Value, Vector};
use std::sync::Arc;

/// Inner product of two vector blocks, producing a scalar.
///
/// With scalar upstream gradient `g`: `∂/∂a = g·b` and `∂/∂b = g·a`.
#[derive(Debug)]
pub struct Dot {
    a: BlockRef<Vector>,
    b: BlockRef<Vector>,
    cache: PassCache<f64>,
}

impl Dot {
    pub fn new(a: BlockRef<Vector>, b: BlockRef<Vector>) -> Self {
        Dot {
            a,
            b,
            cache: PassCache::new(),
        }
    }
}

impl Block<f64> for Dot {
    fn name(&self) -> &str {
        "Dot"
    }

    fn eval(&self, pass: Pass) -> Result<f64, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let a = self.a.eval(pass)?;
            let b = self.b.eval(pass)?;
            a.dot(&b)
        })
    }

    fn backward(&self, grad: &f64) -> Result<(), SentiError> {
        let (pass, _) = self.cache.require(self.name())?;
        let a = cached_input(&self.a, pass)?;
        let b = cached_input(&self.b, pass)?;
        backward_input(&self.a, &b.scale(*grad), pass)?;
        backward_input(&self.b, &a.scale(*grad), pass)
    }

    fn value(&self) -> Option<f64> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`Dot`] block.
pub fn dot_op(a: BlockRef<Vector>, b: BlockRef<Vector>) -> BlockRef<f64> {
    Arc::new(Dot::new(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::check_grad;
    use crate::nn::{Param, VectorParam};
    use crate::utils::testing::seeded_rng;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_forward() -> Result<(), SentiError> {
        let a = Param::new("a", Vector::new(vec![1.0, 2.0, 3.0]));
        let b = Param::new("b", Vector::new(vec![-1.0, 0.5, 2.0]));
        assert_relative_eq!(dot_op(a.block(), b.block()).forward()?, 6.0);
        Ok(())
    }

    #[test]
    fn test_dot_backward_scales_by_upstream() -> Result<(), SentiError> {
        let a = Param::new("a", Vector::new(vec![1.0, 2.0]));
        let b = Param::new("b", Vector::new(vec![3.0, 4.0]));
        let d = dot_op(a.block(), b.block());
        d.forward()?;
        d.backward(&2.0)?;
        assert_eq!(a.grad(), Vector::new(vec![6.0, 8.0]));
        assert_eq!(b.grad(), Vector::new(vec![2.0, 4.0]));
        Ok(())
    }

    #[test]
    fn test_dot_length_mismatch() {
        let a = Param::new("a", Vector::zeros(2));
        let b = Param::new("b", Vector::zeros(3));
        let result = dot_op(a.block(), b.block()).forward();
        assert!(matches!(result, Err(SentiError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_dot_backward_before_forward() {
        let a = Param::new("a", Vector::zeros(2));
        let d = dot_op(a.block(), a.block());
        assert!(matches!(d.backward(&1.0), Err(SentiError::Uninitialized { .. })));
    }

    #[test]
    fn test_dot_grad_check() {
        let mut rng = seeded_rng(21);
        let a = VectorParam::random("a", 5, &mut rng);
        let b = VectorParam::random("b", 5, &mut rng);
        let d = dot_op(a.block(), b.block());
        check_grad(d.as_ref(), &[&a, &b], 1e-6, 1e-6).expect("gradients should match");
    }
}

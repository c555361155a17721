use crate::autograd::{backward_input, check_grad_shape, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use crate::tensor::Vector;
use crate::utils::sync::lock_or_recover;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Inverted dropout on a vector block.
///
/// In training mode every forward pass samples a fresh mask: each component
/// is zeroed with probability `prob` and kept components are scaled by
/// `1 / (1 − prob)`. The mask is cached next to the output, and backward
/// multiplies the upstream gradient by exactly that mask.
///
/// In test mode the block is the identity in both directions.
///
/// [`set_mask_frozen`](Dropout::set_mask_frozen) pins the latest mask so that
/// repeated training passes see the same function, as finite-difference
/// checks require.
#[derive(Debug)]
pub struct Dropout {
    prob: f64,
    x: BlockRef<Vector>,
    test_time: bool,
    keep: Bernoulli,
    rng: Mutex<StdRng>,
    frozen: AtomicBool,
    /// `(output, mask)` of the latest pass.
    cache: PassCache<(Vector, Vector)>,
}

impl Dropout {
    /// Creates a dropout block seeded from OS entropy.
    ///
    /// # Errors
    /// Returns `SentiError::InvalidArgument` unless `0 <= prob < 1`.
    pub fn new(prob: f64, x: BlockRef<Vector>, test_time: bool) -> Result<Self, SentiError> {
        Self::with_rng(prob, x, test_time, StdRng::from_entropy())
    }

    /// Creates a dropout block with a reproducible mask sequence.
    pub fn with_seed(
        prob: f64,
        x: BlockRef<Vector>,
        test_time: bool,
        seed: u64,
    ) -> Result<Self, SentiError> {
        Self::with_rng(prob, x, test_time, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        prob: f64,
        x: BlockRef<Vector>,
        test_time: bool,
        rng: StdRng,
    ) -> Result<Self, SentiError> {
        if !(0.0..1.0).contains(&prob) {
            return Err(SentiError::InvalidArgument(format!(
                "dropout probability must be in [0, 1), got {}",
                prob
            )));
        }
        let keep = Bernoulli::new(1.0 - prob)
            .map_err(|e| SentiError::InvalidArgument(format!("dropout probability: {}", e)))?;
        Ok(Dropout {
            prob,
            x,
            test_time,
            keep,
            rng: Mutex::new(rng),
            frozen: AtomicBool::new(false),
            cache: PassCache::new(),
        })
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }

    pub fn is_test_time(&self) -> bool {
        self.test_time
    }

    /// The mask applied during the latest pass (all ones in test mode).
    pub fn mask(&self) -> Option<Vector> {
        self.cache.get().map(|(_, mask)| mask)
    }

    /// While frozen, training passes reuse the latest mask instead of sampling.
    /// A pass whose input length differs from the pinned mask samples anew.
    pub fn set_mask_frozen(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::SeqCst);
    }

    pub fn is_mask_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    fn next_mask(&self, len: usize) -> Vector {
        if self.is_mask_frozen() {
            if let Some(mask) = self.mask().filter(|mask| mask.len() == len) {
                return mask;
            }
        }
        self.sample_mask(len)
    }

    fn sample_mask(&self, len: usize) -> Vector {
        let scale = 1.0 / (1.0 - self.prob);
        let mut rng = lock_or_recover(&self.rng, "dropout rng");
        let mask = (0..len)
            .map(|_| if self.keep.sample(&mut *rng) { scale } else { 0.0 })
            .collect();
        Vector::new(mask)
    }
}

impl Block<Vector> for Dropout {
    fn name(&self) -> &str {
        "Dropout"
    }

    fn eval(&self, pass: Pass) -> Result<Vector, SentiError> {
        self.cache
            .get_or_try_insert(pass, || {
                let x = self.x.eval(pass)?;
                if self.test_time {
                    let mask = Vector::filled(x.len(), 1.0);
                    return Ok((x, mask));
                }
                let mask = self.next_mask(x.len());
                let out = x.hadamard(&mask)?;
                Ok((out, mask))
            })
            .map(|(out, _)| out)
    }

    fn backward(&self, grad: &Vector) -> Result<(), SentiError> {
        let (pass, (output, mask)) = self.cache.require(self.name())?;
        check_grad_shape(&output, grad, self.name())?;
        if self.test_time {
            return backward_input(&self.x, grad, pass);
        }
        backward_input(&self.x, &grad.hadamard(&mask)?, pass)
    }

    fn value(&self) -> Option<Vector> {
        self.cache.get().map(|(out, _)| out)
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`Dropout`] block seeded from OS entropy.
pub fn dropout_op(
    prob: f64,
    x: BlockRef<Vector>,
    test_time: bool,
) -> Result<BlockRef<Vector>, SentiError> {
    Ok(Arc::new(Dropout::new(prob, x, test_time)?))
}

#[cfg(test)]
#[path = "dropout_test.rs"]
mod tests;

// sentirust-core/src/nn/losses/nll.rs

use crate::autograd::{backward_input, cached_input, Block, BlockRef, Pass, PassCache};
use crate::error::SentiError;
use num_traits::clamp;
use std::sync::Arc;

/// Probabilities are clamped to `[PROBABILITY_EPSILON, 1 - PROBABILITY_EPSILON]`
/// before taking logarithms.
pub const PROBABILITY_EPSILON: f64 = 1e-12;

/// Binary negative log-likelihood of a probability-valued score block.
///
/// Forward: `-[t·ln(p) + (1 − t)·ln(1 − p)]` with `t ∈ {0, 1}`.
/// Backward: `g · -(t/p − (1 − t)/(1 − p))` into the score block.
///
/// Both directions use the clamped probability, so a saturated score yields
/// a large but finite loss and gradient.
#[derive(Debug)]
pub struct NegativeLogLikelihoodLoss {
    score: BlockRef<f64>,
    target: bool,
    cache: PassCache<f64>,
}

impl NegativeLogLikelihoodLoss {
    pub fn new(score: BlockRef<f64>, target: bool) -> Self {
        NegativeLogLikelihoodLoss {
            score,
            target,
            cache: PassCache::new(),
        }
    }

    pub fn target(&self) -> bool {
        self.target
    }

    fn target_value(&self) -> f64 {
        if self.target {
            1.0
        } else {
            0.0
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    clamp(p, PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON)
}

impl Block<f64> for NegativeLogLikelihoodLoss {
    fn name(&self) -> &str {
        "NegativeLogLikelihoodLoss"
    }

    fn eval(&self, pass: Pass) -> Result<f64, SentiError> {
        self.cache.get_or_try_insert(pass, || {
            let p = clamp_probability(self.score.eval(pass)?);
            let t = self.target_value();
            Ok(-(t * p.ln() + (1.0 - t) * (1.0 - p).ln()))
        })
    }

    fn backward(&self, grad: &f64) -> Result<(), SentiError> {
        let (pass, _) = self.cache.require(self.name())?;
        let p = clamp_probability(cached_input(&self.score, pass)?);
        let t = self.target_value();
        let local = -(t / p - (1.0 - t) / (1.0 - p));
        backward_input(&self.score, &(grad * local), pass)
    }

    fn value(&self) -> Option<f64> {
        self.cache.get()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.cache.pass()
    }
}

/// Builds a [`NegativeLogLikelihoodLoss`] block.
pub fn nll_loss_op(score: BlockRef<f64>, target: bool) -> BlockRef<f64> {
    Arc::new(NegativeLogLikelihoodLoss::new(score, target))
}

#[cfg(test)]
#[path = "nll_test.rs"]
mod tests;

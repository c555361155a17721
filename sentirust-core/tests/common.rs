use rand::rngs::StdRng;
use rand::SeedableRng;
use sentirust_core::autograd::{Block, BlockRef, Pass};
use sentirust_core::{SentiError, Vector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[allow(dead_code)]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Wraps a block and counts how many times its input is actually evaluated.
///
/// No memoization of its own: every `eval` reaches the wrapped block, so the
/// counter measures how often consumers call through.
#[derive(Debug)]
pub struct CountingBlock {
    inner: BlockRef<Vector>,
    evals: AtomicUsize,
}

#[allow(dead_code)]
impl CountingBlock {
    pub fn new(inner: BlockRef<Vector>) -> Arc<Self> {
        Arc::new(CountingBlock {
            inner,
            evals: AtomicUsize::new(0),
        })
    }

    pub fn evals(&self) -> usize {
        self.evals.load(Ordering::SeqCst)
    }
}

impl Block<Vector> for CountingBlock {
    fn name(&self) -> &str {
        "CountingBlock"
    }

    fn eval(&self, pass: Pass) -> Result<Vector, SentiError> {
        self.evals.fetch_add(1, Ordering::SeqCst);
        self.inner.eval(pass)
    }

    fn backward(&self, grad: &Vector) -> Result<(), SentiError> {
        self.inner.backward(grad)
    }

    fn value(&self) -> Option<Vector> {
        self.inner.value()
    }

    fn cached_pass(&self) -> Option<Pass> {
        self.inner.cached_pass()
    }
}

// sentirust-data/src/samplers/traits.rs

use std::fmt::Debug;

/// Defines the order in which dataset indices are visited during an epoch.
pub trait Sampler: Debug + Send + Sync {
    /// Returns an iterator over indices in `0..dataset_len`.
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync>;

    /// Number of indices [`iter`](Self::iter) will yield.
    fn len(&self, dataset_len: usize) -> usize;
}

use crate::error::SentiError;
use crate::utils::sync::{read_or_recover, write_or_recover};
use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

static NEXT_PASS: AtomicU64 = AtomicU64::new(1);

/// Identifier of one forward evaluation.
///
/// Ids are unique for the lifetime of the process, so caches belonging to
/// different graphs (or different passes over the same graph) never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pass(u64);

impl Pass {
    /// Allocates a new, never-before-seen pass id.
    pub fn next() -> Pass {
        let id = NEXT_PASS.fetch_add(1, Ordering::Relaxed);
        trace!("Allocated forward pass {}", id);
        Pass(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Per-node memo of the value computed during the latest pass.
///
/// The cache is private to the node that owns it: intermediate values are
/// never shared between graphs, only parameter nodes are.
#[derive(Debug)]
pub struct PassCache<T> {
    slot: RwLock<Option<(Pass, T)>>,
}

impl<T: Clone> PassCache<T> {
    pub fn new() -> Self {
        PassCache {
            slot: RwLock::new(None),
        }
    }

    /// Returns the value cached for `pass`, computing and storing it first if needed.
    ///
    /// No lock is held while `compute` runs, so `compute` is free to evaluate
    /// inputs that share structure with this node.
    pub fn get_or_try_insert<F>(&self, pass: Pass, compute: F) -> Result<T, SentiError>
    where
        F: FnOnce() -> Result<T, SentiError>,
    {
        {
            let guard = read_or_recover(&self.slot, "pass cache");
            if let Some((cached_pass, value)) = guard.as_ref() {
                if *cached_pass == pass {
                    return Ok(value.clone());
                }
            }
        }
        let value = compute()?;
        *write_or_recover(&self.slot, "pass cache") = Some((pass, value.clone()));
        Ok(value)
    }

    /// The most recently cached value, regardless of pass.
    pub fn get(&self) -> Option<T> {
        read_or_recover(&self.slot, "pass cache")
            .as_ref()
            .map(|(_, value)| value.clone())
    }

    /// The cached value together with the pass that produced it.
    ///
    /// Backward uses the pass to check that every input it reads was
    /// evaluated in the same forward pass as this node.
    ///
    /// # Errors
    /// Returns `SentiError::Uninitialized` when nothing has been cached yet.
    pub fn require(&self, block: &str) -> Result<(Pass, T), SentiError> {
        read_or_recover(&self.slot, "pass cache")
            .clone()
            .ok_or_else(|| SentiError::Uninitialized {
                block: block.to_string(),
            })
    }

    /// The pass that produced the cached value, if any.
    pub fn pass(&self) -> Option<Pass> {
        read_or_recover(&self.slot, "pass cache")
            .as_ref()
            .map(|(pass, _)| *pass)
    }
}

impl<T: Clone> Default for PassCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_pass_ids_are_unique_and_increasing() {
        let a = Pass::next();
        let b = Pass::next();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_cache_memoizes_within_a_pass() -> Result<(), SentiError> {
        let cache = PassCache::new();
        let calls = Cell::new(0);
        let pass = Pass::next();
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(42.0f64)
        };
        assert_eq!(cache.get_or_try_insert(pass, compute)?, 42.0);
        assert_eq!(cache.get_or_try_insert(pass, compute)?, 42.0);
        assert_eq!(calls.get(), 1);

        cache.get_or_try_insert(Pass::next(), compute)?;
        assert_eq!(calls.get(), 2);
        Ok(())
    }

    #[test]
    fn test_cache_require_empty_is_uninitialized() {
        let cache: PassCache<f64> = PassCache::new();
        assert_eq!(
            cache.require("Dot"),
            Err(SentiError::Uninitialized {
                block: "Dot".to_string()
            })
        );
        assert!(cache.pass().is_none());
    }

    #[test]
    fn test_cache_failed_compute_keeps_previous_value() -> Result<(), SentiError> {
        let cache = PassCache::new();
        cache.get_or_try_insert(Pass::next(), || Ok(1.0f64))?;
        let failed = cache.get_or_try_insert(Pass::next(), || {
            Err(SentiError::InvalidArgument("boom".to_string()))
        });
        assert!(failed.is_err());
        assert_eq!(cache.get(), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_cache_require_reports_producing_pass() -> Result<(), SentiError> {
        let cache = PassCache::new();
        let first = Pass::next();
        cache.get_or_try_insert(first, || Ok(1.0f64))?;
        assert_eq!(cache.require("Tanh")?, (first, 1.0));

        let second = Pass::next();
        cache.get_or_try_insert(second, || Ok(2.0f64))?;
        assert_eq!(cache.require("Tanh")?, (second, 2.0));
        assert_eq!(cache.pass(), Some(second));
        Ok(())
    }
}

//! Poison-tolerant lock access.
//!
//! Poisoned locks are recovered with a warning: guarded state is plain numbers
//! or RNG state, which a panicking holder cannot leave half-updated.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub fn read_or_recover<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        log::warn!("RwLock for {} was poisoned. Recovering reader guard.", what);
        poisoned.into_inner()
    })
}

pub fn write_or_recover<'a, T>(
    lock: &'a RwLock<T>,
    what: &str,
) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        log::warn!("RwLock for {} was poisoned. Recovering writer guard.", what);
        poisoned.into_inner()
    })
}

pub fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        log::warn!("Mutex for {} was poisoned. Recovering.", what);
        poisoned.into_inner()
    })
}

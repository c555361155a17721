//! Helpers shared by every SentiRust crate.

pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

//! # Block graph engine
//!
//! The [`Block`] trait is the forward/backward contract every node implements.
//! A forward pass is identified by a [`Pass`] id; each operation node owns a
//! [`PassCache`] so that a node shared by several consumers is evaluated once
//! per pass. Backward is recursive: each node transforms the upstream gradient
//! and calls `backward` on its inputs until parameter leaves accumulate it.
//!
//! [`grad_check`] compares analytical gradients with finite differences.

pub mod block;
pub mod grad_check;
pub mod pass;

pub use block::{Block, BlockRef};
pub(crate) use block::{backward_input, cached_input, check_grad_shape};
pub use pass::{Pass, PassCache};

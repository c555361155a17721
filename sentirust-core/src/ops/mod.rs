//! # Operation blocks
//!
//! Each operation lives in its own file and comes as a struct implementing
//! [`Block`](crate::autograd::Block) plus an `xxx_op` constructor returning a
//! shared [`BlockRef`](crate::autograd::BlockRef):
//!
//! - [`arithmetic`]: elementwise [`Sum`](arithmetic::Sum) and
//!   [`VectorMul`](arithmetic::VectorMul) (chained by [`product_op`](arithmetic::product_op)).
//! - [`linalg`]: [`Dot`](linalg::Dot) and matrix-vector [`Mul`](linalg::Mul).
//! - [`activation`]: scalar [`Sigmoid`](activation::Sigmoid) and elementwise [`Tanh`](activation::Tanh).
//! - [`dropout`]: inverted dropout with a cached mask.
//! - [`constant`]: gradient-free leaves.

pub mod activation;
pub mod arithmetic;
pub mod constant;
pub mod dropout;
pub mod linalg;

pub use constant::{constant_op, Constant};
pub use dropout::{dropout_op, Dropout};

// src/nn/losses/mod.rs

//! Scalar loss blocks. A loss is the root of a training graph: `forward()`
//! yields the objective and `backward(&1.0)` seeds every gradient below it.

pub mod l2;
pub mod loss_sum;
pub mod nll;

pub use l2::{l2_regularization_op, L2Regularization};
pub use loss_sum::{loss_sum_op, LossSum};
pub use nll::{nll_loss_op, NegativeLogLikelihoodLoss, PROBABILITY_EPSILON};

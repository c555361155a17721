// src/nn/mod.rs
// Parameter leaves, the word lookup table and the loss blocks.

pub mod lookup_table;
pub mod losses;
pub mod parameter;

pub use lookup_table::LookupTable;
pub use losses::{L2Regularization, LossSum, NegativeLogLikelihoodLoss};
pub use parameter::{MatrixParam, Param, VectorParam};

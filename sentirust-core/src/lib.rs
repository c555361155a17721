// Core engine of SentiRust: numeric containers, the block contract,
// parameter leaves, operation and loss blocks.

pub mod autograd;
pub mod ops;
pub mod tensor;

pub mod nn;
pub mod utils;

pub mod error;
pub use error::SentiError;

// Re-export the types every graph builder touches.
pub use autograd::{Block, BlockRef, Pass};
pub use nn::{LookupTable, MatrixParam, Param, VectorParam};
pub use tensor::{Matrix, Value, Vector};
// Re-export traits required by public functions
pub use num_traits;

//! Sentence composition strategies.

pub mod product;
pub mod recurrent;
pub mod sum;

pub use product::ProductOfWordVectorsModel;
pub use recurrent::RecurrentModel;
pub use sum::SumOfWordVectorsModel;

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

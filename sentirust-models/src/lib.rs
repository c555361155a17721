//! Sentence-level sentiment models built from SentiRust blocks.
//!
//! A model maps each token of a sentence to a word vector through a shared
//! [`LookupTable`](sentirust_core::LookupTable), composes the vectors into a
//! sentence vector, and scores it with `sigmoid(param_w · s)`. Three
//! composition strategies are provided in [`models`].

pub mod config;
pub mod evaluate;
pub mod model;
pub mod models;

pub use config::ModelConfig;
pub use model::{ModelBase, SentimentModel, DEFAULT_THRESHOLD, SCORING_PARAM};
pub use models::{ProductOfWordVectorsModel, RecurrentModel, SumOfWordVectorsModel};

//! Labelled sentence datasets and the samplers that order them.

pub mod datasets;
pub mod samplers;

// Re-export main components
pub use datasets::{Dataset, LabeledSentence, SentenceDataset};
pub use samplers::{RandomSampler, Sampler, SequentialSampler};

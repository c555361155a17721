pub mod sentence_dataset;
pub mod traits;

pub use sentence_dataset::{LabeledSentence, SentenceDataset};
pub use traits::Dataset;

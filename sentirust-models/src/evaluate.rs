// sentirust-models/src/evaluate.rs

use crate::model::SentimentModel;
use log::debug;
use sentirust_core::{Block, SentiError};
use sentirust_data::{Dataset, LabeledSentence};

/// Fraction of sentences in `dataset` whose prediction at `threshold` matches the label.
///
/// # Errors
/// Returns `SentiError::EmptyInput` for an empty dataset, and propagates any
/// error raised while building or evaluating a sentence graph.
pub fn accuracy<M, D>(model: &M, dataset: &D, threshold: f64) -> Result<f64, SentiError>
where
    M: SentimentModel,
    D: Dataset<Item = LabeledSentence>,
{
    if dataset.is_empty() {
        return Err(SentiError::EmptyInput {
            operation: "accuracy".to_string(),
        });
    }
    let mut correct = 0usize;
    for index in 0..dataset.len() {
        let sentence = dataset.get(index)?;
        if model.predict(&sentence.tokens, threshold)? == sentence.label {
            correct += 1;
        }
    }
    let accuracy = correct as f64 / dataset.len() as f64;
    debug!("Accuracy {}/{} = {:.4}", correct, dataset.len(), accuracy);
    Ok(accuracy)
}

/// Mean training loss (likelihood plus regularizer) over `dataset`.
///
/// Only forward passes are run. With dropout configured, the value varies
/// from call to call.
pub fn average_loss<M, D>(model: &M, dataset: &D) -> Result<f64, SentiError>
where
    M: SentimentModel,
    D: Dataset<Item = LabeledSentence>,
{
    if dataset.is_empty() {
        return Err(SentiError::EmptyInput {
            operation: "average_loss".to_string(),
        });
    }
    let mut total = 0.0;
    for index in 0..dataset.len() {
        let sentence = dataset.get(index)?;
        total += model.loss(&sentence.tokens, sentence.label)?.forward()?;
    }
    Ok(total / dataset.len() as f64)
}

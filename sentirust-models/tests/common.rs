use sentirust_core::{LookupTable, SentiError, Value};
use sentirust_data::{LabeledSentence, SentenceDataset};

#[allow(dead_code)]
pub fn init_logger() {
    // Only the first initialization takes effect.
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A tiny, linearly separable sentiment corpus.
#[allow(dead_code)]
pub fn toy_dataset() -> SentenceDataset {
    SentenceDataset::new(vec![
        LabeledSentence::new(["great"], true),
        LabeledSentence::new(["good", "fun"], true),
        LabeledSentence::new(["loved", "it"], true),
        LabeledSentence::new(["fun", "and", "great"], true),
        LabeledSentence::new(["bad"], false),
        LabeledSentence::new(["boring", "plot"], false),
        LabeledSentence::new(["awful", "and", "dull"], false),
        LabeledSentence::new(["dull", "it"], false),
    ])
}

/// One plain gradient-descent step over every trainable parameter of `table`,
/// followed by a gradient reset.
#[allow(dead_code)]
pub fn sgd_step(table: &LookupTable, learning_rate: f64) -> Result<(), SentiError> {
    for param in table.trainable_params().into_iter().chain(table.vector_params()) {
        let step = param.grad().scale(-learning_rate);
        param.set_value(param.value().add(&step)?)?;
    }
    for param in table.matrix_params() {
        let step = param.grad().scale(-learning_rate);
        param.set_value(param.value().add(&step)?)?;
    }
    table.zero_grads();
    Ok(())
}

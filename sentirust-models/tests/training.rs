use sentirust_core::{Block, LookupTable, SentiError};
use sentirust_data::{Dataset, RandomSampler, Sampler};
use sentirust_models::evaluate::{accuracy, average_loss};
use sentirust_models::{
    ModelConfig, ProductOfWordVectorsModel, RecurrentModel, SentimentModel, SumOfWordVectorsModel,
    DEFAULT_THRESHOLD,
};
use std::sync::Arc;

mod common;
use common::{init_logger, sgd_step, toy_dataset};

fn train<M: SentimentModel>(
    model: &M,
    table: &LookupTable,
    epochs: usize,
    learning_rate: f64,
) -> Result<(f64, f64), SentiError> {
    let dataset = toy_dataset();
    let sampler = RandomSampler::with_seed(false, None, 5);
    let before = average_loss(model, &dataset)?;
    for _ in 0..epochs {
        for index in sampler.iter(dataset.len()) {
            let sentence = dataset.get(index)?;
            let loss = model.loss(&sentence.tokens, sentence.label)?;
            loss.forward()?;
            loss.backward(&1.0)?;
            sgd_step(table, learning_rate)?;
        }
    }
    let after = average_loss(model, &dataset)?;
    Ok((before, after))
}

#[test]
fn test_sum_model_learns_toy_corpus() -> Result<(), SentiError> {
    init_logger();
    let table = Arc::new(LookupTable::with_seed(7));
    let config = ModelConfig::default().with_embedding_size(4);
    let model = SumOfWordVectorsModel::new(config, table.clone())?;

    let (before, after) = train(&model, &table, 200, 0.5)?;
    assert!(after < before, "loss went from {} to {}", before, after);
    assert_eq!(accuracy(&model, &toy_dataset(), DEFAULT_THRESHOLD)?, 1.0);
    Ok(())
}

#[test]
fn test_product_model_training_reduces_loss() -> Result<(), SentiError> {
    init_logger();
    let table = Arc::new(LookupTable::with_seed(8));
    let config = ModelConfig::default().with_embedding_size(4);
    let model = ProductOfWordVectorsModel::new(config, table.clone())?;

    let (before, after) = train(&model, &table, 100, 0.3)?;
    assert!(after < before, "loss went from {} to {}", before, after);
    Ok(())
}

#[test]
fn test_recurrent_model_training_reduces_loss() -> Result<(), SentiError> {
    init_logger();
    let table = Arc::new(LookupTable::with_seed(9));
    let config = ModelConfig::default()
        .with_embedding_size(4)
        .with_hidden_size(3);
    let model = RecurrentModel::new(config, table.clone())?;

    let (before, after) = train(&model, &table, 100, 0.2)?;
    assert!(after < before, "loss went from {} to {}", before, after);
    Ok(())
}

#[test]
fn test_evaluate_rejects_empty_dataset() -> Result<(), SentiError> {
    let table = Arc::new(LookupTable::with_seed(1));
    let model = SumOfWordVectorsModel::new(ModelConfig::default(), table)?;
    let empty = sentirust_data::SentenceDataset::default();
    assert!(matches!(
        accuracy(&model, &empty, DEFAULT_THRESHOLD),
        Err(SentiError::EmptyInput { .. })
    ));
    Ok(())
}

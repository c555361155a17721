// sentirust-models/src/models/sum.rs

use crate::config::ModelConfig;
use crate::model::{ModelBase, SentimentModel};
use log::debug;
use sentirust_core::ops::arithmetic::sum_op;
use sentirust_core::{BlockRef, LookupTable, SentiError, Vector, VectorParam};
use std::sync::Arc;

/// Bag-of-words model: the sentence vector is the sum of its word vectors.
#[derive(Debug)]
pub struct SumOfWordVectorsModel {
    base: ModelBase,
}

impl SumOfWordVectorsModel {
    pub fn new(config: ModelConfig, table: Arc<LookupTable>) -> Result<Self, SentiError> {
        let dim = config.embedding_size;
        let base = ModelBase::new(config, table, dim)?;
        debug!("Built SumOfWordVectorsModel with embedding size {}", dim);
        Ok(SumOfWordVectorsModel { base })
    }

    pub fn with_seed(config: ModelConfig, table: Arc<LookupTable>, seed: u64) -> Result<Self, SentiError> {
        let dim = config.embedding_size;
        let base = ModelBase::with_seed(config, table, dim, seed)?;
        Ok(SumOfWordVectorsModel { base })
    }
}

impl SentimentModel for SumOfWordVectorsModel {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn word_vectors_to_sentence_vector(
        &self,
        words: &[VectorParam],
    ) -> Result<BlockRef<Vector>, SentiError> {
        sum_op(words.iter().map(|w| w.block()).collect())
    }
}

// sentirust-models/src/models/product.rs

use crate::config::ModelConfig;
use crate::model::{ModelBase, SentimentModel};
use log::debug;
use sentirust_core::ops::arithmetic::{product_op, sum_op};
use sentirust_core::{BlockRef, LookupTable, SentiError, Vector, VectorParam};
use std::sync::Arc;

/// Sum of word vectors plus their elementwise product:
/// `(w₁ + … + wₙ) + (w₁ ⊙ … ⊙ wₙ)`.
///
/// The product term lets the model capture interactions such as negation
/// that a plain sum cannot express.
#[derive(Debug)]
pub struct ProductOfWordVectorsModel {
    base: ModelBase,
}

impl ProductOfWordVectorsModel {
    pub fn new(config: ModelConfig, table: Arc<LookupTable>) -> Result<Self, SentiError> {
        let dim = config.embedding_size;
        let base = ModelBase::new(config, table, dim)?;
        debug!("Built ProductOfWordVectorsModel with embedding size {}", dim);
        Ok(ProductOfWordVectorsModel { base })
    }

    pub fn with_seed(config: ModelConfig, table: Arc<LookupTable>, seed: u64) -> Result<Self, SentiError> {
        let dim = config.embedding_size;
        let base = ModelBase::with_seed(config, table, dim, seed)?;
        Ok(ProductOfWordVectorsModel { base })
    }
}

impl SentimentModel for ProductOfWordVectorsModel {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn word_vectors_to_sentence_vector(
        &self,
        words: &[VectorParam],
    ) -> Result<BlockRef<Vector>, SentiError> {
        let blocks: Vec<BlockRef<Vector>> = words.iter().map(|w| w.block()).collect();
        let total = sum_op(blocks.clone())?;
        let product = product_op(blocks)?;
        sum_op(vec![total, product])
    }
}

// sentirust-data/src/datasets/sentence_dataset.rs

use super::traits::Dataset;
use log::{debug, warn};
use sentirust_core::SentiError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A tokenized sentence with its binary sentiment label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSentence {
    pub tokens: Vec<String>,
    pub label: bool,
}

impl LabeledSentence {
    pub fn new<S: Into<String>>(tokens: impl IntoIterator<Item = S>, label: bool) -> Self {
        LabeledSentence {
            tokens: tokens.into_iter().map(Into::into).collect(),
            label,
        }
    }
}

/// An in-memory list of labelled sentences.
#[derive(Debug, Clone, Default)]
pub struct SentenceDataset {
    sentences: Vec<LabeledSentence>,
}

impl SentenceDataset {
    pub fn new(sentences: Vec<LabeledSentence>) -> Self {
        SentenceDataset { sentences }
    }

    /// Reads a dataset file. See [`from_reader`](Self::from_reader) for the format.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SentiError> {
        let path = path.as_ref();
        debug!("Loading sentence dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses lines of the form `<0|1>\t<whitespace-separated tokens>`.
    ///
    /// Tokens are lowercased. Blank lines are ignored, and a labelled line
    /// without any token is skipped with a warning.
    ///
    /// # Errors
    /// * `SentiError::Format` if a line has no tab or its label is not `0` or `1`
    ///   (`line` is 1-based).
    /// * `SentiError::Io` if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SentiError> {
        let mut sentences = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let (label, text) = line.split_once('\t').ok_or_else(|| SentiError::Format {
                line: line_no,
                message: "expected '<label>\\t<sentence>'".to_string(),
            })?;
            let label = match label.trim() {
                "1" => true,
                "0" => false,
                other => {
                    return Err(SentiError::Format {
                        line: line_no,
                        message: format!("label must be 0 or 1, got '{}'", other),
                    })
                }
            };
            let tokens: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
            if tokens.is_empty() {
                warn!("Skipping line {}: sentence has no tokens", line_no);
                continue;
            }
            sentences.push(LabeledSentence { tokens, label });
        }
        debug!("Parsed {} labelled sentences", sentences.len());
        Ok(SentenceDataset { sentences })
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledSentence> {
        self.sentences.iter()
    }

    pub fn sentences(&self) -> &[LabeledSentence] {
        &self.sentences
    }

    /// Number of sentences labelled positive.
    pub fn positive_count(&self) -> usize {
        self.sentences.iter().filter(|s| s.label).count()
    }
}

impl Dataset for SentenceDataset {
    type Item = LabeledSentence;

    fn get(&self, index: usize) -> Result<Self::Item, SentiError> {
        self.sentences
            .get(index)
            .cloned()
            .ok_or(SentiError::IndexOutOfBounds {
                index,
                len: self.sentences.len(),
            })
    }

    fn len(&self) -> usize {
        self.sentences.len()
    }
}

impl From<Vec<LabeledSentence>> for SentenceDataset {
    fn from(sentences: Vec<LabeledSentence>) -> Self {
        SentenceDataset::new(sentences)
    }
}

#[cfg(test)]
#[path = "sentence_dataset_test.rs"]
mod tests;

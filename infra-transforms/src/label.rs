use std::sync::Arc;

use speechprep_domain::{DomainError, Label, Sample, Transform, Vocabulary};

/// Replaces each label symbol with its vocabulary index.
///
/// Symbols missing from the vocabulary are dropped, so the resulting label can
/// be shorter than the input.
pub struct LabelIndexer {
    vocab: Arc<Vocabulary>,
}

impl LabelIndexer {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }
}

impl Transform for LabelIndexer {
    fn name(&self) -> &'static str {
        "label_indexer"
    }

    fn apply(&self, sample: Sample) -> Result<Sample, DomainError> {
        let Sample { features, label } = sample;
        let symbols = match label {
            Label::Symbols(symbols) => symbols,
            Label::Indices(_) => {
                return Err(DomainError::invalid_argument(
                    "label_indexer expects a symbol label, got indices",
                ));
            }
        };

        let indices: Vec<i64> = symbols
            .iter()
            .filter_map(|symbol| self.vocab.index_of(*symbol))
            .map(|index| index as i64)
            .collect();

        let dropped = symbols.len() - indices.len();
        if dropped > 0 {
            tracing::trace!(
                input_len = symbols.len(),
                output_len = indices.len(),
                dropped,
                "dropped out-of-vocabulary symbols"
            );
        }

        Ok(Sample::new(features, Label::Indices(indices)))
    }
}

pub struct LabelPadding {
    max_word_length: usize,
    padding_value: i64,
}

impl LabelPadding {
    pub fn new(max_word_length: usize, padding_value: i64) -> Self {
        Self {
            max_word_length,
            padding_value,
        }
    }
}

impl Transform for LabelPadding {
    fn name(&self) -> &'static str {
        "label_padding"
    }

    fn apply(&self, sample: Sample) -> Result<Sample, DomainError> {
        let Sample { features, label } = sample;
        let mut indices = match label {
            Label::Indices(indices) => indices,
            Label::Symbols(_) => {
                return Err(DomainError::invalid_argument(
                    "label_padding expects an index label; run label_indexer first",
                ));
            }
        };

        if indices.len() > self.max_word_length {
            return Err(DomainError::shape(format!(
                "label length {} exceeds max_word_length {}",
                indices.len(),
                self.max_word_length
            )));
        }

        indices.resize(self.max_word_length, self.padding_value);
        Ok(Sample::new(features, Label::Indices(indices)))
    }
}
